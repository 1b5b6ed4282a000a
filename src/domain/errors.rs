use thiserror::Error;

/// Failures opening or persisting the registry file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("registry file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid registry file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Failures writing a CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not write CSV: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
