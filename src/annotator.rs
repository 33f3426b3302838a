use crate::error::PatientError;
use crate::index::CrossReferenceIndex;
use crate::rank::{get_rank, read_data_lines, select_target};
use crate::recovery::recover_by_name;
use crate::types::*;
use crate::writer::write_patient_report;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A patient variant file and the ranking engine output computed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientFiles {
    pub variants: PathBuf,
    pub ranking: PathBuf,
}

impl PatientFiles {
    /// `<stem>.txt` next to the variant file.
    pub fn report_path(&self) -> PathBuf {
        self.variants.with_extension("txt")
    }
}

/// Pair every patient file in `dir` with the ranking file sharing its stem.
///
/// Patient files without a ranking file are skipped. Pairs come back sorted
/// by patient file name.
pub fn discover_patient_files(dir: &Path, config: &AnnotationConfig) -> Result<Vec<PatientFiles>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;

    let mut pairs = Vec::new();
    let mut unpaired = 0;

    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        if !path.is_file() || !has_extension(&path, &config.variant_extension) {
            continue;
        }

        let ranking = path.with_extension(&config.ranking_extension);
        if ranking.is_file() {
            pairs.push(PatientFiles {
                variants: path,
                ranking,
            });
        } else {
            log::debug!("No ranking output for {}", path.display());
            unpaired += 1;
        }
    }

    if unpaired > 0 {
        log::warn!("{} patient files have no ranking output and were skipped", unpaired);
    }

    pairs.sort_by(|a, b| a.variants.cmp(&b.variants));
    Ok(pairs)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Rank the inserted variant and recover the patient's disease identifiers.
pub fn annotate_patient(
    files: &PatientFiles,
    curated: &CrossReferenceIndex,
    config: &AnnotationConfig,
) -> Result<PatientAnnotation> {
    let patient_lines = read_data_lines(&files.variants)?;
    let target = select_target(&patient_lines, config.target_mode);
    if target.is_empty() {
        return Err(PatientError::EmptyVariantFile(files.variants.display().to_string()).into());
    }

    let ranking = read_data_lines(&files.ranking)?;
    let rank = get_rank(target, &ranking);

    let recovered = match recover_by_name(&files.variants, curated) {
        Ok(ids) => Some(ids),
        Err(err) => {
            log::error!(
                "Name not found or incorrectly formatted {}: {}",
                files.variants.display(),
                err
            );
            None
        }
    };

    Ok(PatientAnnotation {
        rank,
        variant_lines: target.to_vec(),
        recovered,
    })
}

/// Annotate one patient and write its report, returning its counters.
pub fn process_patient(
    files: &PatientFiles,
    curated: &CrossReferenceIndex,
    config: &AnnotationConfig,
) -> Result<PatientStats> {
    let annotation = annotate_patient(files, curated, config)?;
    write_patient_report(&files.report_path(), &annotation)?;

    let mut stats = PatientStats {
        processed: 1,
        ..Default::default()
    };
    match annotation.rank {
        Rank::Found(_) => stats.ranked += 1,
        Rank::NotFound => stats.not_found += 1,
    }
    if annotation.recovered.is_some() {
        stats.recovered += 1;
    } else {
        stats.recovery_failed += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_discover_pairs_by_stem() -> Result<()> {
        let temp_dir = TempDir::new()?;
        write(temp_dir.path(), "b_1_58_AD.vcf", "");
        write(temp_dir.path(), "b_1_58_AD.ezr", "");
        write(temp_dir.path(), "a_2_59_AD.vcf", "");
        write(temp_dir.path(), "a_2_59_AD.ezr", "");
        write(temp_dir.path(), "c_3_60_AD.vcf", "");
        write(temp_dir.path(), "notes.txt", "");

        let pairs = discover_patient_files(temp_dir.path(), &AnnotationConfig::new(TargetMode::Dominant))?;
        let names: Vec<_> = pairs
            .iter()
            .map(|p| p.variants.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a_2_59_AD.vcf", "b_1_58_AD.vcf"]);
        assert_eq!(pairs[0].ranking, temp_dir.path().join("a_2_59_AD.ezr"));
        assert_eq!(pairs[0].report_path(), temp_dir.path().join("a_2_59_AD.txt"));
        Ok(())
    }

    #[test]
    fn test_annotate_empty_patient_file_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let files = PatientFiles {
            variants: write(temp_dir.path(), "p_1_58_AD.vcf", "#CHROM\tPOS\n"),
            ranking: write(temp_dir.path(), "p_1_58_AD.ezr", "chr1\t100\n"),
        };

        let err = annotate_patient(
            &files,
            &CrossReferenceIndex::new(),
            &AnnotationConfig::new(TargetMode::Dominant),
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<PatientError>(),
            Some(&PatientError::EmptyVariantFile(files.variants.display().to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_process_patient_without_curated_entry() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let files = PatientFiles {
            variants: write(temp_dir.path(), "p_1_58_AD.vcf", "#CHROM\n1\t100\t0/1\n"),
            ranking: write(temp_dir.path(), "p_1_58_AD.ezr", "#header\nchr1\t100\n"),
        };

        let stats = process_patient(
            &files,
            &CrossReferenceIndex::new(),
            &AnnotationConfig::new(TargetMode::Dominant),
        )?;
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.ranked, 1);
        assert_eq!(stats.recovery_failed, 1);

        let report = fs::read_to_string(files.report_path())?;
        assert_eq!(
            report,
            "Rank of inserted variant: 1\nVariant: 1\t100\t0/1\n"
        );
        Ok(())
    }
}
