use thiserror::Error;

/// Reasons a dataset load attempt fails.
///
/// A load failure is terminal for that attempt: nothing is retried and no
/// partial dataset is returned. Bad field values inside an otherwise
/// well-formed file are not errors; they parse to absent values.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The CSV document could not be read (e.g. no header row).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a list of rows.
    #[error("unexpected document shape: {0}")]
    Shape(String),
}
