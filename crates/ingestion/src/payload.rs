//! Raw trigger payloads as delivered by the host
//!
//! Every accessor is optional at the serde level so a missing piece surfaces as
//! `MalformedEvent` rather than a generic parse error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IngestionError, Result};

/// Payload kind tag for a form submission
pub const FORM_SUBMIT_KIND: &str = "form_submit";
/// Payload kind tag for a cell edit
pub const EDIT_KIND: &str = "edit";

/// Raw trigger, discriminated by its `kind` field
#[derive(Debug, Clone, PartialEq)]
pub enum RawTrigger {
    FormSubmit(RawFormSubmit),
    Edit(RawEdit),
}

impl RawTrigger {
    /// Parse from a JSON value
    ///
    /// # Errors
    /// - `MalformedEvent` if the payload is not an object, has no `kind`, or the
    ///   body does not match its kind
    /// - `UnsupportedEventKind` for any other `kind`
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = value
            .as_object()
            .ok_or_else(|| IngestionError::malformed("unknown", "payload is not a JSON object"))?
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| IngestionError::malformed("unknown", "missing 'kind'"))?
            .to_string();

        match kind.as_str() {
            FORM_SUBMIT_KIND => serde_json::from_value(value)
                .map(Self::FormSubmit)
                .map_err(|e| IngestionError::malformed(kind, e.to_string())),
            EDIT_KIND => serde_json::from_value(value)
                .map(Self::Edit)
                .map_err(|e| IngestionError::malformed(kind, e.to_string())),
            _ => Err(IngestionError::UnsupportedEventKind { kind }),
        }
    }

    /// Parse from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| IngestionError::malformed("unknown", format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// The `kind` tag of this payload
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FormSubmit(_) => FORM_SUBMIT_KIND,
            Self::Edit(_) => EDIT_KIND,
        }
    }
}

/// Form submission trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFormSubmit {
    #[serde(default)]
    pub response: Option<RawFormResponse>,
}

/// The submitted form response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFormResponse {
    #[serde(default)]
    pub item_responses: Option<Vec<RawItemResponse>>,
}

/// One answered form item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItemResponse {
    /// Item title (the field label)
    pub title: String,
    /// Answer
    #[serde(default)]
    pub response: ResponseValue,
}

/// Answer to a form item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Text, paragraph, choice, date...
    Text(String),
    /// Checkbox items
    Choices(Vec<String>),
    /// Scale and other scalars
    Scalar(Value),
    #[default]
    Empty,
}

impl ResponseValue {
    /// Flatten to the text used in messages
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Choices(items) => items.join(", "),
            Self::Scalar(Value::String(s)) => s.clone(),
            Self::Scalar(Value::Null) | Self::Empty => String::new(),
            Self::Scalar(other) => other.to_string(),
        }
    }
}

/// Cell edit trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEdit {
    /// Name of the edited sheet
    #[serde(default)]
    pub sheet: Option<String>,
    /// Edited range
    #[serde(default)]
    pub range: Option<RawRange>,
}

/// Edited range, 1-based
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRange {
    #[serde(default)]
    pub row: Option<usize>,
    #[serde(default)]
    pub column: Option<usize>,
    #[serde(default)]
    pub num_rows: Option<usize>,
    #[serde(default)]
    pub num_columns: Option<usize>,
}
