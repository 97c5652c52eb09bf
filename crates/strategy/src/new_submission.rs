//! NewSubmissionStrategy - notifies on form submissions carrying the interest field

use std::sync::Arc;

use contracts::{
    ChangeEvent, ContractError, CreatedRecord, EventKind, InterpretationStrategy, Message,
    MessageTemplates, NewSubmissionRule, NewSubmissionRuleConfig, TabularStore,
};
use tracing::{debug, instrument};

use crate::rules::resolve_new_submission;

/// Compose the message for a new submission.
///
/// Only a missing interest key suppresses the message; an empty answer is
/// still reported. An empty category answer drops the category suffix.
pub fn compose_new_submission(
    record: &CreatedRecord,
    rule: &NewSubmissionRule,
    templates: &MessageTemplates,
) -> Option<Message> {
    let body = record.response(&rule.interest_label)?;
    let category = rule
        .category_label
        .as_deref()
        .and_then(|label| record.response(label))
        .filter(|category| !category.is_empty());

    Message::new(templates.new_report(body, category))
}

/// Strategy for [`EventKind::Created`]
pub struct NewSubmissionStrategy {
    config: NewSubmissionRuleConfig,
    templates: Arc<MessageTemplates>,
}

impl NewSubmissionStrategy {
    pub fn new(config: NewSubmissionRuleConfig, templates: Arc<MessageTemplates>) -> Self {
        Self { config, templates }
    }
}

impl InterpretationStrategy for NewSubmissionStrategy {
    fn name(&self) -> &str {
        "new_submission"
    }

    fn kind(&self) -> EventKind {
        EventKind::Created
    }

    #[instrument(name = "new_submission_interpret", skip_all)]
    fn interpret(
        &self,
        event: &ChangeEvent,
        store: &dyn TabularStore,
    ) -> Result<Option<Message>, ContractError> {
        let ChangeEvent::Created(record) = event else {
            return Err(ContractError::StrategyMismatch {
                expected: EventKind::Created,
                actual: event.kind(),
            });
        };

        let rule = resolve_new_submission(&self.config, store)?;
        let message = compose_new_submission(record, &rule, &self.templates);

        if message.is_none() {
            debug!(
                interest_label = %rule.interest_label,
                "Submission has no interest field, skipping"
            );
        }
        Ok(message)
    }
}
