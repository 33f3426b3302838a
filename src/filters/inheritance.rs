use crate::index::CrossReferenceIndex;
use crate::types::InheritancePattern;
use std::collections::HashSet;

/// Stage 2: keep records whose inheritance pattern is accepted.
///
/// `None` accepts everything and returns the input unchanged.
pub fn filter_inheritance(
    index: &CrossReferenceIndex,
    accepted: Option<&HashSet<InheritancePattern>>,
) -> CrossReferenceIndex {
    match accepted {
        Some(accepted) => index.retain_cloned(|record| {
            record
                .inheritance_patterns
                .iter()
                .any(|pattern| accepted.contains(pattern))
        }),
        None => index.clone(),
    }
}
