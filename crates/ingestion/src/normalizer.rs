//! Raw trigger -> ChangeEvent

use std::num::NonZeroUsize;

use contracts::{ChangeEvent, FieldResponses, TabularStore};
use metrics::counter;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{IngestionError, Result};
use crate::payload::{RawEdit, RawFormSubmit, RawTrigger, EDIT_KIND, FORM_SUBMIT_KIND};

/// Converts host payloads into normalized change events.
///
/// Stateless; the store is only read to snapshot an edited row.
pub struct EventNormalizer;

impl EventNormalizer {
    /// Normalize JSON text
    pub fn normalize_json(content: &str, store: &dyn TabularStore) -> Result<ChangeEvent> {
        count_rejection(
            RawTrigger::from_json(content).and_then(|raw| Self::normalize(raw, store)),
        )
    }

    /// Normalize a JSON value
    pub fn normalize_value(value: Value, store: &dyn TabularStore) -> Result<ChangeEvent> {
        count_rejection(RawTrigger::from_value(value).and_then(|raw| Self::normalize(raw, store)))
    }

    /// Normalize a parsed trigger
    #[instrument(name = "normalize_event", skip_all, fields(kind = raw.kind()))]
    pub fn normalize(raw: RawTrigger, store: &dyn TabularStore) -> Result<ChangeEvent> {
        match raw {
            RawTrigger::FormSubmit(submit) => Self::form_submission(submit),
            RawTrigger::Edit(edit) => Self::edit(edit, store),
        }
    }

    /// Reduce item responses into a label -> response mapping.
    ///
    /// Duplicate labels collapse with the last response winning.
    pub fn form_submission(raw: RawFormSubmit) -> Result<ChangeEvent> {
        let items = raw
            .response
            .ok_or_else(|| IngestionError::malformed(FORM_SUBMIT_KIND, "missing 'response'"))?
            .item_responses
            .ok_or_else(|| {
                IngestionError::malformed(FORM_SUBMIT_KIND, "missing 'response.item_responses'")
            })?;

        let mut responses = FieldResponses::with_capacity(items.len());
        for item in items {
            let text = item.response.to_text();
            if let Some(previous) = responses.insert(item.title.clone(), text) {
                counter!("sheet_notifier_duplicate_form_labels_total").increment(1);
                debug!(
                    label = %item.title,
                    replaced = %previous,
                    "Duplicate form label, keeping last response"
                );
            }
        }

        debug!(fields = responses.len(), "Form submission normalized");
        Ok(ChangeEvent::created(responses))
    }

    /// Extract the edited cell and snapshot its whole row.
    ///
    /// Multi-cell ranges are reduced to their top-left cell.
    pub fn edit(raw: RawEdit, store: &dyn TabularStore) -> Result<ChangeEvent> {
        let sheet = raw
            .sheet
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IngestionError::malformed(EDIT_KIND, "missing 'sheet'"))?;
        let range = raw
            .range
            .ok_or_else(|| IngestionError::malformed(EDIT_KIND, "missing 'range'"))?;

        let row = range
            .row
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| IngestionError::malformed(EDIT_KIND, "'range.row' must be >= 1"))?;
        let column = range
            .column
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| IngestionError::malformed(EDIT_KIND, "'range.column' must be >= 1"))?;

        // A cleared trailing cell shrinks the data range; still cover the edited cell
        let width = store.last_column(&sheet)?.max(column.get());
        let row_snapshot = store.get_row(&sheet, row.get(), width)?;

        debug!(
            sheet = %sheet,
            row = row.get(),
            column = column.get(),
            width,
            "Edit normalized"
        );
        Ok(ChangeEvent::edited(sheet, row, column, row_snapshot))
    }
}

fn count_rejection(result: Result<ChangeEvent>) -> Result<ChangeEvent> {
    if let Err(e) = &result {
        warn!(error = %e, "Trigger payload rejected");
        counter!("sheet_notifier_payloads_rejected_total", "reason" => e.reason()).increment(1);
    }
    result
}
