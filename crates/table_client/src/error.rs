use shared::domain::FilterKind;
use thiserror::Error;

use crate::{export::ExportError, transport::TransportError};

/// Everything that can go wrong while loading a page or an export. These
/// never escape the controller; they end up as the banner message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request was cancelled")]
    Cancelled,
    #[error("no access token is available for the table request")]
    MissingToken,
    #[error("failed to encode table request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request failed with status {status} ({status_text})")]
    Status { status: u16, status_text: String },
    #[error("failed to decode table response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to save export: {0}")]
    Export(#[from] ExportError),
}

impl LoadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
    #[error("filter '{name}' expects {expected} input")]
    InputMismatch { name: String, expected: FilterKind },
    #[error("invalid number '{input}' for filter '{name}'")]
    InvalidNumber { name: String, input: String },
    #[error("invalid date '{input}' for filter '{name}', expected YYYY-MM-DD")]
    InvalidDate { name: String, input: String },
}
