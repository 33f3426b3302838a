use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::XrefError;

// ============================================================================
// Configuration
// ============================================================================

/// Settings for narrowing the cross-reference index to the curated index.
#[derive(Debug, Clone, Default)]
pub struct ResolutionConfig {
    /// Inheritance patterns a curated record may carry.
    /// `None` keeps every pattern.
    pub accepted_inheritance: Option<HashSet<InheritancePattern>>,
}

impl ResolutionConfig {
    pub fn with_inheritance<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = InheritancePattern>,
    {
        Self {
            accepted_inheritance: Some(patterns.into_iter().collect()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(accepted) = &self.accepted_inheritance {
            if accepted.is_empty() {
                anyhow::bail!("accepted inheritance restriction must name at least one pattern");
            }
        }

        Ok(())
    }
}

/// How the inserted variant is picked from the tail of a patient file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    /// The last variant line only.
    #[default]
    Dominant,
    /// The last two variant lines, or only the last one when it is homozygous.
    Recessive,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationConfig {
    pub target_mode: TargetMode,
    /// Extension of patient variant files.
    pub variant_extension: String,
    /// Extension of ranking engine output files.
    pub ranking_extension: String,
}

impl AnnotationConfig {
    pub fn new(target_mode: TargetMode) -> Self {
        Self {
            target_mode,
            variant_extension: "vcf".to_string(),
            ranking_extension: "ezr".to_string(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.variant_extension.is_empty() || self.ranking_extension.is_empty() {
            anyhow::bail!("patient and ranking file extensions must not be empty");
        }

        if self.variant_extension == self.ranking_extension {
            anyhow::bail!(
                "patient and ranking files cannot share the extension '{}'",
                self.variant_extension
            );
        }

        Ok(())
    }
}

// ============================================================================
// Inheritance Patterns
// ============================================================================

/// The closed set of inheritance labels used by the Orphanet catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InheritancePattern {
    #[serde(rename = "X-linked dominant")]
    XLinkedDominant,
    #[serde(rename = "Mitochondrial inheritance")]
    Mitochondrial,
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Autosomal recessive")]
    AutosomalRecessive,
    #[serde(rename = "Multigenic/multifactorial")]
    Multigenic,
    #[serde(rename = "X-linked recessive")]
    XLinkedRecessive,
    #[serde(rename = "Sporadic")]
    Sporadic,
    #[serde(rename = "Autosomal dominant")]
    AutosomalDominant,
    #[serde(rename = "No data available")]
    NoDataAvailable,
}

impl InheritancePattern {
    pub const ALL: [InheritancePattern; 9] = [
        InheritancePattern::XLinkedDominant,
        InheritancePattern::Mitochondrial,
        InheritancePattern::Unknown,
        InheritancePattern::AutosomalRecessive,
        InheritancePattern::Multigenic,
        InheritancePattern::XLinkedRecessive,
        InheritancePattern::Sporadic,
        InheritancePattern::AutosomalDominant,
        InheritancePattern::NoDataAvailable,
    ];

    /// Catalog label, exactly as written in the XML.
    pub fn label(&self) -> &'static str {
        match self {
            InheritancePattern::XLinkedDominant => "X-linked dominant",
            InheritancePattern::Mitochondrial => "Mitochondrial inheritance",
            InheritancePattern::Unknown => "Unknown",
            InheritancePattern::AutosomalRecessive => "Autosomal recessive",
            InheritancePattern::Multigenic => "Multigenic/multifactorial",
            InheritancePattern::XLinkedRecessive => "X-linked recessive",
            InheritancePattern::Sporadic => "Sporadic",
            InheritancePattern::AutosomalDominant => "Autosomal dominant",
            InheritancePattern::NoDataAvailable => "No data available",
        }
    }

    /// Parse a catalog label. Anything outside the closed set is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.label() == label)
    }

    /// Short codes accepted on the command line.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "AD" => Some(InheritancePattern::AutosomalDominant),
            "AR" => Some(InheritancePattern::AutosomalRecessive),
            "XLD" => Some(InheritancePattern::XLinkedDominant),
            "XLR" => Some(InheritancePattern::XLinkedRecessive),
            "MT" => Some(InheritancePattern::Mitochondrial),
            _ => None,
        }
    }
}

impl fmt::Display for InheritancePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InheritancePattern {
    type Err = XrefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| XrefError::UnrecognizedInheritance {
                label: s.to_string(),
                orpha_number: None,
            })
    }
}

// ============================================================================
// Orphanet Catalog Entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub source: String,
    pub reference: String,
}

impl ExternalReference {
    pub fn is_omim(&self) -> bool {
        self.source == "OMIM"
    }
}

/// One `Disorder` element of an Orphanet catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Disorder {
    pub orpha_number: String,
    /// The disorder's own `ExternalReferenceList`.
    pub external_references: Vec<ExternalReference>,
    /// References deeper in the disorder, such as the gene-level lists under
    /// `DisorderGeneAssociationList`. Nested `Disorder` elements are not searched.
    pub nested_references: Vec<ExternalReference>,
    /// Raw labels; validated by the inheritance pass.
    pub inheritance: Vec<String>,
}

impl Disorder {
    pub fn omim_references(&self) -> impl Iterator<Item = &str> {
        self.external_references
            .iter()
            .filter(|r| r.is_omim())
            .map(|r| r.reference.as_str())
    }

    /// OMIM references at any depth: the disorder's own, then the nested ones.
    pub fn all_omim_references(&self) -> impl Iterator<Item = &str> {
        self.external_references
            .iter()
            .chain(&self.nested_references)
            .filter(|r| r.is_omim())
            .map(|r| r.reference.as_str())
    }
}

// ============================================================================
// Disease Records
// ============================================================================

/// Everything known about one Orphanet disorder after the catalog passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub id: String,
    pub phenotype_ids: Vec<String>,
    pub genotype_ids: Vec<String>,
    pub inheritance_patterns: Vec<InheritancePattern>,
}

impl DiseaseRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Exactly one phenotype id, one genotype id and one inheritance pattern.
    pub fn is_ideal(&self) -> bool {
        self.phenotype_ids.len() == 1
            && self.genotype_ids.len() == 1
            && self.inheritance_patterns.len() == 1
    }

    pub fn phenotype_id(&self) -> Option<&str> {
        single(&self.phenotype_ids).map(String::as_str)
    }

    pub fn genotype_id(&self) -> Option<&str> {
        single(&self.genotype_ids).map(String::as_str)
    }

    pub fn inheritance(&self) -> Option<InheritancePattern> {
        single(&self.inheritance_patterns).copied()
    }
}

fn single<T>(items: &[T]) -> Option<&T> {
    match items {
        [only] => Some(only),
        _ => None,
    }
}

// ============================================================================
// External Datasets
// ============================================================================

/// A known disease-causing variant from the mutation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEntry {
    pub chromosome: String,
    pub locus: String,
    pub disease_id: String,
}

/// One row of the phenotype annotation table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhenotypeAnnotation {
    pub source: String,
    pub disease_id: String,
}

// ============================================================================
// Per-Patient Results
// ============================================================================

/// 1-based position of the inserted variant within the ranking output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Found(usize),
    NotFound,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Found(k) => write!(f, "{}", k),
            Rank::NotFound => f.write_str("Not found"),
        }
    }
}

/// Identifiers recovered for a patient from the curated index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredIds {
    pub orpha_number: String,
    pub genotype_id: String,
    pub phenotype_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientAnnotation {
    pub rank: Rank,
    pub variant_lines: Vec<String>,
    pub recovered: Option<RecoveredIds>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters collected while running the catalog passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub phenotype_disorders: usize,
    pub inheritance_disorders: usize,
    pub genotype_disorders: usize,
    pub malformed_ids: usize,
    /// Disorders dropped by the inheritance pass for lack of a phenotype entry.
    pub inheritance_skipped: usize,
    /// Disorders whose genotype references had no phenotype entry to attach to.
    pub unmatched: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientStats {
    pub processed: usize,
    pub ranked: usize,
    pub not_found: usize,
    pub recovered: usize,
    pub recovery_failed: usize,
    /// Patients whose files could not be read or annotated.
    pub failed: usize,
}

impl PatientStats {
    pub fn merge(&mut self, other: &PatientStats) {
        self.processed += other.processed;
        self.ranked += other.ranked;
        self.not_found += other.not_found;
        self.recovered += other.recovered;
        self.recovery_failed += other.recovery_failed;
        self.failed += other.failed;
    }
}
