use crate::index::CrossReferenceIndex;

/// Stage 1: keep records with exactly one phenotype id, genotype id and
/// inheritance pattern.
pub fn filter_ideal(index: &CrossReferenceIndex) -> CrossReferenceIndex {
    index.retain_cloned(|record| record.is_ideal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InheritancePattern;

    #[test]
    fn test_filter_ideal() {
        let mut index = CrossReferenceIndex::new();

        let ideal = index.get_or_create("1");
        ideal.phenotype_ids.push("10".to_string());
        ideal.genotype_ids.push("11".to_string());
        ideal
            .inheritance_patterns
            .push(InheritancePattern::AutosomalDominant);

        let two_patterns = index.get_or_create("2");
        two_patterns.phenotype_ids.push("20".to_string());
        two_patterns.genotype_ids.push("21".to_string());
        two_patterns.inheritance_patterns.extend([
            InheritancePattern::AutosomalDominant,
            InheritancePattern::AutosomalDominant,
        ]);

        let no_genotype = index.get_or_create("3");
        no_genotype.phenotype_ids.push("30".to_string());
        no_genotype
            .inheritance_patterns
            .push(InheritancePattern::AutosomalRecessive);

        let narrowed = filter_ideal(&index);
        assert_eq!(narrowed.len(), 1);
        assert!(narrowed.contains("1"));
        assert_eq!(index.len(), 3);
    }
}
