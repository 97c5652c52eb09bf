//! UpdateRecordStrategy - notifies when the status column of a record is edited

use std::sync::Arc;

use contracts::{
    ChangeEvent, ContractError, EditedCell, EventKind, InterpretationStrategy, Message,
    MessageTemplates, StatusEditRule, StatusEditRuleConfig, TabularStore,
};
use tracing::{debug, instrument};

use crate::rules::resolve_status_edit;

/// Compose the message for an edit.
///
/// # Errors
/// `InvalidColumnConfig` when the target or label column lies outside the row
/// snapshot. That is a misconfiguration and is never reported as "no message".
pub fn compose_status_change(
    edit: &EditedCell,
    rule: &StatusEditRule,
    templates: &MessageTemplates,
) -> Result<Option<Message>, ContractError> {
    if edit.column() != rule.target_column {
        return Ok(None);
    }

    let width = edit.row_snapshot().len();
    let label = edit
        .value_at(rule.label_column)
        .ok_or(ContractError::InvalidColumnConfig {
            role: "label",
            column: rule.label_column,
            width,
        })?;
    let status = edit
        .value_at(rule.target_column)
        .ok_or(ContractError::InvalidColumnConfig {
            role: "target",
            column: rule.target_column,
            width,
        })?;

    Ok(Message::new(
        templates.status_change(&label.to_string(), &status.to_string()),
    ))
}

/// Strategy for [`EventKind::Edited`]
pub struct UpdateRecordStrategy {
    config: StatusEditRuleConfig,
    templates: Arc<MessageTemplates>,
}

impl UpdateRecordStrategy {
    pub fn new(config: StatusEditRuleConfig, templates: Arc<MessageTemplates>) -> Self {
        Self { config, templates }
    }
}

impl InterpretationStrategy for UpdateRecordStrategy {
    fn name(&self) -> &str {
        "update_record"
    }

    fn kind(&self) -> EventKind {
        EventKind::Edited
    }

    #[instrument(name = "update_record_interpret", skip_all)]
    fn interpret(
        &self,
        event: &ChangeEvent,
        store: &dyn TabularStore,
    ) -> Result<Option<Message>, ContractError> {
        let ChangeEvent::Edited(edit) = event else {
            return Err(ContractError::StrategyMismatch {
                expected: EventKind::Edited,
                actual: event.kind(),
            });
        };

        let rule = resolve_status_edit(&self.config, store)?;
        let message = compose_status_change(edit, &rule, &self.templates)?;

        if message.is_none() {
            debug!(
                edited_column = edit.column(),
                target_column = rule.target_column,
                "Edit outside target column, skipping"
            );
        }
        Ok(message)
    }
}
