use crate::index::CrossReferenceIndex;
use crate::types::{DiseaseRecord, PatientAnnotation};
use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render a patient report in the line-oriented `Key: value` layout.
pub fn format_patient_report(annotation: &PatientAnnotation) -> String {
    let mut report = format!("Rank of inserted variant: {}\n", annotation.rank);
    for line in &annotation.variant_lines {
        report.push_str(&format!("Variant: {}\n", line.trim()));
    }
    if let Some(ids) = &annotation.recovered {
        report.push_str(&format!("Genotypic OMIM: {}\n", ids.genotype_id));
        report.push_str(&format!("Phenotypic OMIM: {}\n", ids.phenotype_id));
        report.push_str(&format!("Orphanum: {}\n", ids.orpha_number));
    }
    report
}

pub fn write_patient_report(path: &Path, annotation: &PatientAnnotation) -> Result<()> {
    fs::write(path, format_patient_report(annotation))
        .with_context(|| format!("Failed to write patient report: {}", path.display()))
}

/// One curated-index row.
#[derive(Debug, Clone, Serialize)]
pub struct CuratedRow<'a> {
    pub orpha_number: &'a str,
    pub phenotype_id: &'a str,
    pub genotype_id: &'a str,
    pub inheritance: String,
}

impl<'a> CuratedRow<'a> {
    /// `None` for records that are not ideal.
    pub fn from_record(record: &'a DiseaseRecord) -> Option<Self> {
        Some(Self {
            orpha_number: &record.id,
            phenotype_id: record.phenotype_id()?,
            genotype_id: record.genotype_id()?,
            inheritance: record.inheritance()?.to_string(),
        })
    }
}

pub struct CuratedIndexWriter {
    writer: Writer<File>,
    records_written: usize,
}

impl CuratedIndexWriter {
    pub fn new(output_path: &Path) -> Result<Self> {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

        // Header comes from the serde field names on the first serialize()
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    pub fn write_record(&mut self, record: &DiseaseRecord) -> Result<()> {
        let Some(row) = CuratedRow::from_record(record) else {
            log::warn!("Skipping non-ideal record ORPHA:{}", record.id);
            return Ok(());
        };
        self.writer
            .serialize(row)
            .context("Failed to write curated index row")?;
        self.records_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")?;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

pub fn write_curated_index(index: &CrossReferenceIndex, output_path: &Path) -> Result<usize> {
    let mut writer = CuratedIndexWriter::new(output_path)?;
    for record in index.records() {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(writer.records_written())
}

/// Dump the full cross-reference index as a JSON object keyed by Orphanet number.
pub fn write_index_json(index: &CrossReferenceIndex, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, index)
        .context("Failed to serialize cross-reference index")?;
    writer.flush().context("Failed to flush index dump")?;
    Ok(())
}
