use crate::index::CrossReferenceIndex;
use crate::mutation::ReverseMutationIndex;

/// Stage 4: keep records with at least one known causative variant.
pub fn filter_genotype(
    index: &CrossReferenceIndex,
    mutations: &ReverseMutationIndex,
) -> CrossReferenceIndex {
    index.retain_cloned(|record| record.genotype_id().is_some_and(|id| mutations.contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MutationEntry;

    #[test]
    fn test_filter_genotype() {
        let mut index = CrossReferenceIndex::new();
        index.get_or_create("1").genotype_ids.push("607427".to_string());
        index.get_or_create("2").genotype_ids.push("300000".to_string());
        index.get_or_create("3");

        let mutations = ReverseMutationIndex::from_entries(&[MutationEntry {
            chromosome: "1".to_string(),
            locus: "100".to_string(),
            disease_id: "607427".to_string(),
        }]);

        let narrowed = filter_genotype(&index, &mutations);
        assert_eq!(narrowed.len(), 1);
        assert!(narrowed.contains("1"));
    }
}
