use crate::types::MutationEntry;
use std::collections::HashMap;

/// Genotype id -> the first mutation database entry annotated with it.
#[derive(Debug, Clone, Default)]
pub struct ReverseMutationIndex {
    by_disease: HashMap<String, MutationEntry>,
}

impl ReverseMutationIndex {
    /// Later entries sharing a disease id never replace the first one.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a MutationEntry>,
    {
        let mut by_disease = HashMap::new();
        for entry in entries {
            by_disease
                .entry(entry.disease_id.clone())
                .or_insert_with(|| entry.clone());
        }
        Self { by_disease }
    }

    pub fn get(&self, genotype_id: &str) -> Option<&MutationEntry> {
        self.by_disease.get(genotype_id)
    }

    pub fn contains(&self, genotype_id: &str) -> bool {
        self.by_disease.contains_key(genotype_id)
    }

    pub fn len(&self) -> usize {
        self.by_disease.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_disease.is_empty()
    }
}
