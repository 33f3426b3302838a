use thiserror::Error;

/// Fatal errors while reading the catalogs or building the index.
#[derive(Error, Debug)]
pub enum XrefError {
    #[error("catalog element <{parent}> is missing required child <{element}>")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("unrecognized inheritance pattern '{label}'{}", orpha_suffix(.orpha_number))]
    UnrecognizedInheritance {
        label: String,
        orpha_number: Option<String>,
    },

    #[error("{pass} pass run out of order (index already at stage '{stage}')")]
    PassOrder {
        pass: &'static str,
        stage: &'static str,
    },

    #[error("mutation database line {line} has {columns} columns, expected at least 8")]
    MutationLine { line: usize, columns: usize },
}

fn orpha_suffix(orpha_number: &Option<String>) -> String {
    orpha_number
        .as_ref()
        .map(|n| format!(" (ORPHA:{})", n))
        .unwrap_or_default()
}

/// A patient that cannot be annotated. The run logs it, counts it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatientError {
    #[error("patient file {0} contains no variant lines")]
    EmptyVariantFile(String),
}

/// Per-patient failures to recover disease identifiers. Never fatal for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("file name '{0}' does not carry an Orphanet number")]
    MalformedFileName(String),

    #[error("ORPHA:{0} is not in the curated index")]
    NotCurated(String),
}
