use crate::types::DiseaseRecord;
use serde::Serialize;
use std::collections::btree_map::{Entry, Iter};
use std::collections::BTreeMap;

/// Orphanet number -> disease record.
///
/// Records are only ever created through [`CrossReferenceIndex::get_or_create`]
/// and are never removed; filtering builds a new, smaller index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrossReferenceIndex {
    records: BTreeMap<String, DiseaseRecord>,
}

impl CrossReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `id`, inserting an empty one first if absent.
    pub fn get_or_create(&mut self, id: &str) -> &mut DiseaseRecord {
        match self.records.entry(id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(DiseaseRecord::new(id)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DiseaseRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DiseaseRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, DiseaseRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &DiseaseRecord> {
        self.records.values()
    }

    /// A new index holding clones of the records matching `keep`.
    pub fn retain_cloned<F>(&self, mut keep: F) -> CrossReferenceIndex
    where
        F: FnMut(&DiseaseRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|(_, record)| keep(record))
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect()
    }

    pub fn summary(&self, unmatched: usize) -> IndexSummary {
        let mut summary = IndexSummary {
            missing_phenotype: unmatched,
            ..Default::default()
        };

        for record in self.records.values() {
            if record.is_ideal() {
                summary.ideal += 1;
            }
            if record.inheritance_patterns.is_empty() {
                summary.missing_inheritance += 1;
            }
            match record.phenotype_ids.len() {
                0 => {}
                1 => summary.one_phenotype += 1,
                _ => summary.many_phenotypes += 1,
            }
            match record.genotype_ids.len() {
                0 => summary.missing_genotype += 1,
                1 => summary.one_genotype += 1,
                _ => summary.many_genotypes += 1,
            }
        }

        summary
    }
}

impl FromIterator<(String, DiseaseRecord)> for CrossReferenceIndex {
    fn from_iter<T: IntoIterator<Item = (String, DiseaseRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CrossReferenceIndex {
    type Item = (&'a String, &'a DiseaseRecord);
    type IntoIter = Iter<'a, String, DiseaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Completeness counts over an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub missing_phenotype: usize,
    pub one_phenotype: usize,
    pub many_phenotypes: usize,
    pub missing_inheritance: usize,
    pub missing_genotype: usize,
    pub one_genotype: usize,
    pub many_genotypes: usize,
    pub ideal: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InheritancePattern;

    #[test]
    fn test_get_or_create_never_overwrites() {
        let mut index = CrossReferenceIndex::new();
        index.get_or_create("58").phenotype_ids.push("100".to_string());
        index.get_or_create("58").phenotype_ids.push("101".to_string());

        assert_eq!(index.len(), 1);
        let record = index.get("58").unwrap();
        assert_eq!(record.id, "58");
        assert_eq!(record.phenotype_ids, vec!["100", "101"]);
    }

    #[test]
    fn test_get_does_not_create() {
        let index = CrossReferenceIndex::new();
        assert!(index.get("58").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_retain_cloned_leaves_source_untouched() {
        let mut index = CrossReferenceIndex::new();
        index.get_or_create("1").phenotype_ids.push("10".to_string());
        index.get_or_create("2");

        let narrowed = index.retain_cloned(|r| !r.phenotype_ids.is_empty());
        assert_eq!(narrowed.len(), 1);
        assert!(narrowed.contains("1"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_summary_counts() {
        let mut index = CrossReferenceIndex::new();
        let ideal = index.get_or_create("1");
        ideal.phenotype_ids.push("10".to_string());
        ideal.genotype_ids.push("11".to_string());
        ideal
            .inheritance_patterns
            .push(InheritancePattern::AutosomalRecessive);

        let partial = index.get_or_create("2");
        partial.phenotype_ids.extend(["20".to_string(), "21".to_string()]);

        let summary = index.summary(4);
        assert_eq!(summary.missing_phenotype, 4);
        assert_eq!(summary.one_phenotype, 1);
        assert_eq!(summary.many_phenotypes, 1);
        assert_eq!(summary.missing_inheritance, 1);
        assert_eq!(summary.missing_genotype, 1);
        assert_eq!(summary.one_genotype, 1);
        assert_eq!(summary.ideal, 1);
    }
}
