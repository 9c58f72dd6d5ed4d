use station_types::validation::ValidationError;
use thiserror::Error;

/// Why an import file was rejected. The repository is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The file has the right shape but missing or malformed fields.
    #[error("{0}")]
    Invalid(String),
    /// The file kind or JSON structure is not one we read.
    #[error("{0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No user with id {0}")]
    UnknownUser(String),

    #[error("No channel with id {0}")]
    UnknownChannel(String),

    #[error("Failed to encode roster: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
