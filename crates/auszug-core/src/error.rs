use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AuszugError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("malformed amount '{0}'")]
    MalformedAmount(String),

    #[error("malformed transaction line: {0}")]
    MalformedLine(String),

    #[error("no transaction table found for format '{format}'")]
    HeaderNotFound { format: String },

    #[error("no transactions found in statement (format '{format}')")]
    NoTransactionsFound { format: String },

    #[error("could not determine the statement format: no supported format produced any transactions")]
    FormatUndetermined,

    #[error("unsupported format '{0}'. Supported: auto, sparkasse, ing, deutsche_bank")]
    UnsupportedFormat(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
