//! Ingestion error types

use contracts::ContractError;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Payload lacks the shape its kind requires
    #[error("malformed {kind} event: {message}")]
    MalformedEvent {
        /// Declared payload kind (or "unknown")
        kind: String,
        /// What is missing or wrong
        message: String,
    },

    /// Payload kind is neither a form submission nor an edit
    #[error("unsupported event kind '{kind}'")]
    UnsupportedEventKind {
        /// Kind as found in the payload
        kind: String,
    },

    /// Store failed while snapshotting the edited row
    #[error("store error: {0}")]
    Store(#[from] ContractError),
}

impl IngestionError {
    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedEvent {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedEvent { .. } => "malformed",
            Self::UnsupportedEventKind { .. } => "unsupported_kind",
            Self::Store(_) => "store",
        }
    }
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;
