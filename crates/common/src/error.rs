use thiserror::Error;

/// Problems with local input: uploads, form values and settings
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Unsupported file type: {0} (expected .xlsx or .xls)")]
    UnsupportedFileType(String),

    #[error("No file uploaded")]
    MissingFile,

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;
