use crate::filters::{filter_genotype, filter_ideal, filter_inheritance, filter_phenotype};
use crate::index::CrossReferenceIndex;
use crate::mutation::ReverseMutationIndex;
use crate::types::ResolutionConfig;
use std::collections::HashSet;

/// Record counts left after each resolution stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub input: usize,
    pub ideal: usize,
    pub inheritance: usize,
    pub phenotype: usize,
    pub genotype: usize,
}

/// Narrow the cross-reference index to records usable for annotation.
///
/// Stages run in order: ideal, inheritance, phenotype, genotype. Each one
/// builds a new index from the previous one; the input is never modified.
pub fn resolve_index(
    index: &CrossReferenceIndex,
    annotated_phenotypes: &HashSet<String>,
    mutations: &ReverseMutationIndex,
    config: &ResolutionConfig,
) -> (CrossReferenceIndex, ResolutionReport) {
    let ideal = filter_ideal(index);
    let by_inheritance = filter_inheritance(&ideal, config.accepted_inheritance.as_ref());
    let by_phenotype = filter_phenotype(&by_inheritance, annotated_phenotypes);
    let curated = filter_genotype(&by_phenotype, mutations);

    let report = ResolutionReport {
        input: index.len(),
        ideal: ideal.len(),
        inheritance: by_inheritance.len(),
        phenotype: by_phenotype.len(),
        genotype: curated.len(),
    };

    log::info!(
        "Resolution: {} records -> {} ideal -> {} inheritance -> {} phenotype -> {} genotype",
        report.input,
        report.ideal,
        report.inheritance,
        report.phenotype,
        report.genotype
    );

    (curated, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiseaseRecord, InheritancePattern, MutationEntry};

    fn ideal_record(
        index: &mut CrossReferenceIndex,
        id: &str,
        phenotype: &str,
        genotype: &str,
        pattern: InheritancePattern,
    ) {
        let record = index.get_or_create(id);
        record.phenotype_ids.push(phenotype.to_string());
        record.genotype_ids.push(genotype.to_string());
        record.inheritance_patterns.push(pattern);
    }

    fn fixtures() -> (CrossReferenceIndex, HashSet<String>, ReverseMutationIndex) {
        let mut index = CrossReferenceIndex::new();
        ideal_record(&mut index, "1", "101", "201", InheritancePattern::AutosomalDominant);
        ideal_record(&mut index, "2", "102", "202", InheritancePattern::AutosomalRecessive);
        // Phenotype not annotated
        ideal_record(&mut index, "3", "103", "203", InheritancePattern::AutosomalDominant);
        // No known variant
        ideal_record(&mut index, "4", "104", "204", InheritancePattern::AutosomalDominant);
        // Not ideal
        index.get_or_create("5").phenotype_ids.push("105".to_string());

        let annotated: HashSet<String> = ["101", "102", "104", "105"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let entries: Vec<MutationEntry> = ["201", "202", "203"]
            .iter()
            .map(|id| MutationEntry {
                chromosome: "1".to_string(),
                locus: "1000".to_string(),
                disease_id: id.to_string(),
            })
            .collect();

        (index, annotated, ReverseMutationIndex::from_entries(&entries))
    }

    #[test]
    fn test_resolve_all_stages() {
        let (index, annotated, mutations) = fixtures();
        let (curated, report) =
            resolve_index(&index, &annotated, &mutations, &ResolutionConfig::default());

        let ids: Vec<&String> = curated.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(
            report,
            ResolutionReport {
                input: 5,
                ideal: 4,
                inheritance: 4,
                phenotype: 3,
                genotype: 2,
            }
        );
    }

    #[test]
    fn test_resolve_with_inheritance_restriction() {
        let (index, annotated, mutations) = fixtures();
        let config = ResolutionConfig::with_inheritance([InheritancePattern::AutosomalDominant]);
        let (curated, report) = resolve_index(&index, &annotated, &mutations, &config);

        assert_eq!(curated.len(), 1);
        assert!(curated.contains("1"));
        assert_eq!(report.inheritance, 3);
    }

    #[test]
    fn test_curated_is_subset_and_satisfies_every_stage() {
        let (index, annotated, mutations) = fixtures();
        let (curated, _) =
            resolve_index(&index, &annotated, &mutations, &ResolutionConfig::default());

        for (id, record) in &curated {
            assert_eq!(index.get(id), Some(record));
            assert!(record.is_ideal());
            assert!(annotated.contains(record.phenotype_id().unwrap()));
            assert!(mutations.contains(record.genotype_id().unwrap()));
        }
    }

    #[test]
    fn test_breaking_any_stage_removes_record() {
        let (index, annotated, mutations) = fixtures();
        let config = ResolutionConfig::default();

        let mut extra_pattern = index.clone();
        extra_pattern
            .get_or_create("1")
            .inheritance_patterns
            .push(InheritancePattern::Sporadic);
        let (curated, _) = resolve_index(&extra_pattern, &annotated, &mutations, &config);
        assert!(!curated.contains("1"));

        let mut unannotated = annotated.clone();
        unannotated.remove("101");
        let (curated, _) = resolve_index(&index, &unannotated, &mutations, &config);
        assert!(!curated.contains("1"));

        let no_variants = ReverseMutationIndex::from_entries(&Vec::<MutationEntry>::new());
        let (curated, _) = resolve_index(&index, &annotated, &no_variants, &config);
        assert!(curated.is_empty());
    }

    #[test]
    fn test_records_are_not_modified() {
        let (index, annotated, mutations) = fixtures();
        let before: Vec<DiseaseRecord> = index.records().cloned().collect();
        let _ = resolve_index(&index, &annotated, &mutations, &ResolutionConfig::default());
        let after: Vec<DiseaseRecord> = index.records().cloned().collect();
        assert_eq!(before, after);
    }
}
