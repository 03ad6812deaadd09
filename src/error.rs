//! Failures that can end a poll cycle before a status message is produced.
use thiserror::Error;

/// One variant per stage failure of fetch → validate → translate.
///
/// The `Display` text is what the user receives after `"Program failure: "`,
/// so it has to stay stable between cycles for deduplication to work.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("endpoint {endpoint} is unreachable: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("endpoint {endpoint} is unavailable. API response code: {status}")]
    HttpStatus { endpoint: String, status: u16 },
    #[error("endpoint {endpoint} returned a body that is not JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected data type for {what}: {found}")]
    Shape { what: &'static str, found: &'static str },
    #[error("missing key \"{0}\"")]
    MissingKey(&'static str),
    #[error("review status is empty")]
    EmptyStatus,
    #[error("unexpected review status \"{0}\"")]
    UnknownStatus(String),
}

impl CycleError {
    /// Short machine-friendly tag, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Transport { .. } => "transport",
            CycleError::HttpStatus { .. } => "http_status",
            CycleError::Decode { .. } => "decode",
            CycleError::Shape { .. } => "shape",
            CycleError::MissingKey(_) => "missing_key",
            CycleError::EmptyStatus => "empty_status",
            CycleError::UnknownStatus(_) => "unknown_status",
        }
    }
}
