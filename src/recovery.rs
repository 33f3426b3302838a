//! Recovers a patient's disease identifiers from the name of their variant file.
//!
//! Simulated patient files are named `<...>_<orphanumber>_<suffix>.vcf`; the
//! second-to-last underscore-delimited token is the Orphanet number of the
//! disease whose variant was inserted.

use crate::error::RecoveryError;
use crate::index::CrossReferenceIndex;
use crate::types::RecoveredIds;
use std::path::Path;

/// Extract the Orphanet number from a patient file name.
pub fn orpha_number_from_file_name(file_name: &str) -> Result<&str, RecoveryError> {
    let malformed = || RecoveryError::MalformedFileName(file_name.to_string());

    let mut tokens = file_name.rsplit('_');
    tokens.next().ok_or_else(malformed)?;
    let orpha_number = tokens.next().ok_or_else(malformed)?;

    if orpha_number.is_empty() {
        return Err(malformed());
    }
    Ok(orpha_number)
}

/// Look up the genotype and phenotype ids for a patient file.
pub fn recover_by_name(
    path: &Path,
    curated: &CrossReferenceIndex,
) -> Result<RecoveredIds, RecoveryError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| RecoveryError::MalformedFileName(path.display().to_string()))?;

    let orpha_number = orpha_number_from_file_name(file_name)?;
    let record = curated
        .get(orpha_number)
        .ok_or_else(|| RecoveryError::NotCurated(orpha_number.to_string()))?;

    match (record.genotype_id(), record.phenotype_id()) {
        (Some(genotype_id), Some(phenotype_id)) => Ok(RecoveredIds {
            orpha_number: orpha_number.to_string(),
            genotype_id: genotype_id.to_string(),
            phenotype_id: phenotype_id.to_string(),
        }),
        // Only reachable with an index that skipped the ideal stage
        _ => Err(RecoveryError::NotCurated(orpha_number.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InheritancePattern;
    use std::path::PathBuf;

    fn curated() -> CrossReferenceIndex {
        let mut index = CrossReferenceIndex::new();
        let record = index.get_or_create("166024");
        record.phenotype_ids.push("607426".to_string());
        record.genotype_ids.push("607427".to_string());
        record
            .inheritance_patterns
            .push(InheritancePattern::AutosomalDominant);
        index
    }

    #[test]
    fn test_orpha_number_from_file_name() {
        assert_eq!(
            orpha_number_from_file_name("patient_12_166024_AD.vcf"),
            Ok("166024")
        );
        assert_eq!(orpha_number_from_file_name("166024_x.vcf"), Ok("166024"));
    }

    #[test]
    fn test_file_name_without_underscores_is_malformed() {
        assert_eq!(
            orpha_number_from_file_name("patient.vcf"),
            Err(RecoveryError::MalformedFileName("patient.vcf".to_string()))
        );
        assert!(orpha_number_from_file_name("patient__x.vcf").is_err());
    }

    #[test]
    fn test_recover_by_name() {
        let path = PathBuf::from("/data/patients/sim_3_166024_AD.vcf");
        let ids = recover_by_name(&path, &curated()).unwrap();
        assert_eq!(
            ids,
            RecoveredIds {
                orpha_number: "166024".to_string(),
                genotype_id: "607427".to_string(),
                phenotype_id: "607426".to_string(),
            }
        );
    }

    #[test]
    fn test_recover_unknown_id() {
        let path = PathBuf::from("sim_3_558_AD.vcf");
        assert_eq!(
            recover_by_name(&path, &curated()),
            Err(RecoveryError::NotCurated("558".to_string()))
        );
    }
}
