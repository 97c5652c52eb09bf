//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::{ContractError, EventKind};
use dispatcher::DispatcherError;
use ingestion::IngestionError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded or validated
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ContractError),

    /// Workbook snapshot could not be loaded
    #[error("Failed to load workbook {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: ContractError,
    },

    /// Dispatcher could not be built
    #[error("Failed to build dispatcher: {0}")]
    Setup(#[from] DispatcherError),

    /// Payload rejected during normalization
    #[error("Invalid trigger payload: {0}")]
    Ingestion(#[from] IngestionError),

    /// Interpretation failed for a normalized event
    #[error("Failed to handle {kind} event: {source}")]
    Dispatch {
        kind: EventKind,
        #[source]
        source: DispatcherError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Event kind, when the payload got far enough to have one
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Self::Dispatch { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Pipeline stage that failed (metrics label)
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Ingestion(_) => "ingestion",
            Self::Dispatch { .. } => "interpretation",
            Self::Io(_) => "io",
            Self::ConfigNotFound { .. } | Self::Config(_) | Self::Store { .. } | Self::Setup(_) => {
                "setup"
            }
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
