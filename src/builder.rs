//! Builds the cross-reference index from the three Orphanet catalogs.
//!
//! The passes must run in order: phenotype, inheritance, genotype. The later
//! two only touch disorders the phenotype pass already put in the index, so
//! running them early would silently drop data. [`IndexBuilder`] tracks the
//! stage it is at and rejects passes run out of order.

use crate::error::XrefError;
use crate::index::CrossReferenceIndex;
use crate::types::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BuildStage {
    Empty,
    Phenotype,
    Inheritance,
    Genotype,
}

impl BuildStage {
    fn name(&self) -> &'static str {
        match self {
            BuildStage::Empty => "empty",
            BuildStage::Phenotype => "phenotype",
            BuildStage::Inheritance => "inheritance",
            BuildStage::Genotype => "genotype",
        }
    }
}

/// Output of a complete build.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceBuild {
    pub index: CrossReferenceIndex,
    /// Phenotype id -> every inheritance label seen for disorders carrying it.
    pub inheritance_by_phenotype: HashMap<String, Vec<InheritancePattern>>,
    pub stats: BuildStats,
}

#[derive(Debug)]
pub struct IndexBuilder {
    index: CrossReferenceIndex,
    inheritance_by_phenotype: HashMap<String, Vec<InheritancePattern>>,
    stats: BuildStats,
    stage: BuildStage,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            index: CrossReferenceIndex::new(),
            inheritance_by_phenotype: HashMap::new(),
            stats: BuildStats::default(),
            stage: BuildStage::Empty,
        }
    }

    fn advance(&mut self, from: BuildStage, to: BuildStage) -> Result<(), XrefError> {
        if self.stage != from {
            return Err(XrefError::PassOrder {
                pass: to.name(),
                stage: self.stage.name(),
            });
        }
        self.stage = to;
        Ok(())
    }

    /// Record every OMIM reference of each disorder as a phenotype id.
    ///
    /// This is the only pass that creates records.
    pub fn phenotype_pass(&mut self, disorders: &[Disorder]) -> Result<&mut Self, XrefError> {
        self.advance(BuildStage::Empty, BuildStage::Phenotype)?;

        for disorder in disorders {
            self.stats.phenotype_disorders += 1;
            for omim in disorder.omim_references() {
                if !is_numeric_id(omim) || !is_numeric_id(&disorder.orpha_number) {
                    log::error!("Malformed OMIM or Orphanum at {}", disorder.orpha_number);
                    self.stats.malformed_ids += 1;
                }
                self.index
                    .get_or_create(&disorder.orpha_number)
                    .phenotype_ids
                    .push(omim.to_string());
            }
        }

        log::info!(
            "Phenotype pass: {} disorders, {} records",
            self.stats.phenotype_disorders,
            self.index.len()
        );
        Ok(self)
    }

    /// Attach inheritance patterns to records created by the phenotype pass.
    ///
    /// Disorders without a record are skipped. A label outside the closed set
    /// aborts the build.
    pub fn inheritance_pass(&mut self, disorders: &[Disorder]) -> Result<&mut Self, XrefError> {
        self.advance(BuildStage::Phenotype, BuildStage::Inheritance)?;

        for disorder in disorders {
            self.stats.inheritance_disorders += 1;
            let Some(record) = self.index.get_mut(&disorder.orpha_number) else {
                self.stats.inheritance_skipped += 1;
                continue;
            };

            for label in &disorder.inheritance {
                let pattern = InheritancePattern::from_label(label).ok_or_else(|| {
                    XrefError::UnrecognizedInheritance {
                        label: label.clone(),
                        orpha_number: Some(disorder.orpha_number.clone()),
                    }
                })?;

                record.inheritance_patterns.push(pattern);
                for phenotype_id in &record.phenotype_ids {
                    self.inheritance_by_phenotype
                        .entry(phenotype_id.clone())
                        .or_default()
                        .push(pattern);
                }
            }
        }

        log::info!(
            "Inheritance pass: {} disorders, {} without a phenotype entry",
            self.stats.inheritance_disorders,
            self.stats.inheritance_skipped
        );
        Ok(self)
    }

    /// Record OMIM references as genotype ids of existing records.
    ///
    /// References are taken at any depth of the disorder, so the gene-level
    /// ids of the genes-associated-with-disorders catalog are included.
    /// A disorder with no record yet is counted as unmatched and none of its
    /// references are kept.
    pub fn genotype_pass(&mut self, disorders: &[Disorder]) -> Result<&mut Self, XrefError> {
        self.advance(BuildStage::Inheritance, BuildStage::Genotype)?;

        for disorder in disorders {
            self.stats.genotype_disorders += 1;
            for omim in disorder.all_omim_references() {
                if !is_numeric_id(omim) {
                    log::error!("Malformed OMIM {}", omim);
                    self.stats.malformed_ids += 1;
                }

                match self.index.get_mut(&disorder.orpha_number) {
                    Some(record) => record.genotype_ids.push(omim.to_string()),
                    None => {
                        self.stats.unmatched += 1;
                        break;
                    }
                }
            }
        }

        log::warn!(
            "{} Disorders were unmatched to a phenotypic omim",
            self.stats.unmatched
        );
        Ok(self)
    }

    pub fn finish(self) -> CrossReferenceBuild {
        CrossReferenceBuild {
            index: self.index,
            inheritance_by_phenotype: self.inheritance_by_phenotype,
            stats: self.stats,
        }
    }
}

/// Run all three passes in their required order.
pub fn build_index(
    lookup: &[Disorder],
    inheritance: &[Disorder],
    geno_pheno: &[Disorder],
) -> Result<CrossReferenceBuild, XrefError> {
    let mut builder = IndexBuilder::new();
    builder
        .phenotype_pass(lookup)?
        .inheritance_pass(inheritance)?
        .genotype_pass(geno_pheno)?;
    Ok(builder.finish())
}

fn is_numeric_id(value: &str) -> bool {
    value.parse::<u64>().is_ok()
}
