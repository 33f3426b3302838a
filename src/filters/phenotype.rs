use crate::index::CrossReferenceIndex;
use crate::types::PhenotypeAnnotation;
use std::collections::HashSet;

/// Source tag of annotation rows that describe OMIM diseases.
pub const OMIM_SOURCE: &str = "OMIM";

/// Disease ids that have independent phenotype annotation.
pub fn omim_phenotype_ids(annotations: &[PhenotypeAnnotation]) -> HashSet<String> {
    annotations
        .iter()
        .filter(|a| a.source == OMIM_SOURCE)
        .map(|a| a.disease_id.clone())
        .collect()
}

/// Stage 3: keep records whose phenotype id is annotated.
pub fn filter_phenotype(
    index: &CrossReferenceIndex,
    annotated: &HashSet<String>,
) -> CrossReferenceIndex {
    index.retain_cloned(|record| {
        record
            .phenotype_id()
            .is_some_and(|id| annotated.contains(id))
    })
}
