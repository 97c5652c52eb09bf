//! # Ingestion
//!
//! Change event normalization.
//!
//! Responsibilities:
//! - Parse host trigger payloads (`form_submit` / `edit`)
//! - Reduce form item responses into a label -> response mapping
//! - Snapshot the edited row from the store
//! - Reject malformed payloads and unknown kinds
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::EventNormalizer;
//!
//! let event = EventNormalizer::normalize_json(payload, &store)?;
//! dispatcher.dispatch(&event, &store).await?;
//! ```

mod error;
mod normalizer;
mod payload;

// Re-exports
pub use contracts::ChangeEvent;
pub use error::{IngestionError, Result};
pub use normalizer::EventNormalizer;
pub use payload::{
    RawEdit, RawFormResponse, RawFormSubmit, RawItemResponse, RawRange, RawTrigger,
    ResponseValue, EDIT_KIND, FORM_SUBMIT_KIND,
};
