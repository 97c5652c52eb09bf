//! # Strategy
//!
//! Interpretation strategies: decide whether a change event deserves a
//! notification and compose its text.
//!
//! - [`NewSubmissionStrategy`] for form submissions
//! - [`UpdateRecordStrategy`] for status edits
//!
//! Both read their rule from the store on every call and never write to it.

mod new_submission;
mod rules;
mod update_record;

use std::sync::Arc;

use contracts::{ContractError, MessageTemplates, RulesConfig, StrategyRegistry};

pub use new_submission::{compose_new_submission, NewSubmissionStrategy};
pub use rules::{resolve_new_submission, resolve_status_edit};
pub use update_record::{compose_status_change, UpdateRecordStrategy};

/// Build the registry holding both shipped strategies
pub fn default_registry(
    rules: &RulesConfig,
    templates: MessageTemplates,
) -> Result<StrategyRegistry, ContractError> {
    let templates = Arc::new(templates);
    StrategyRegistry::new(
        Arc::new(NewSubmissionStrategy::new(
            rules.new_submission.clone(),
            Arc::clone(&templates),
        )),
        Arc::new(UpdateRecordStrategy::new(
            rules.status_edit.clone(),
            templates,
        )),
    )
}
