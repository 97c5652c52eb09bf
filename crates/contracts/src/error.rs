//! Layered error definitions
//!
//! Categorized by source: config / store / interpretation

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Store Errors =====
    /// Cell reference is not valid A1 notation
    #[error("invalid cell reference '{reference}': {message}")]
    InvalidCellRef { reference: String, message: String },

    /// Sheet does not exist in the store
    #[error("sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    // ===== Interpretation Errors =====
    /// Rule value could not be resolved from the store
    #[error("cannot resolve rule '{rule}' from {location}: {message}")]
    RuleResolution {
        rule: String,
        location: String,
        message: String,
    },

    /// Configured column lies outside the edited row
    #[error("{role} column {column} is outside the row snapshot (width {width})")]
    InvalidColumnConfig {
        role: &'static str,
        column: usize,
        width: usize,
    },

    /// Strategy was handed an event of another kind
    #[error("strategy for {expected} events cannot interpret a {actual} event")]
    StrategyMismatch {
        expected: crate::EventKind,
        actual: crate::EventKind,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid cell reference error
    pub fn invalid_cell_ref(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCellRef {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create sheet not found error
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        Self::SheetNotFound {
            sheet: sheet.into(),
        }
    }

    /// Create rule resolution error
    pub fn rule_resolution(
        rule: impl Into<String>,
        location: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self::RuleResolution {
            rule: rule.into(),
            location: location.to_string(),
            message: message.into(),
        }
    }
}
