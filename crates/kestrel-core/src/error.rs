use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line} is neither valid UTF-8 nor windows-1251")]
    Decode { line: usize },

    #[error("Failed to serialize report rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No lines processed, nothing to report")]
    EmptyInput,

    #[error("{errors} of {lines} lines failed, error rate reached threshold {threshold}")]
    ErrorThreshold {
        errors: usize,
        lines: usize,
        threshold: f64,
    },

    #[error("Report template is missing the {0} placeholder")]
    Template(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
