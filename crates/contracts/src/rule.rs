//! InterestRule - values resolved from the store at interpretation time

use serde::{Deserialize, Serialize};

/// Which new submissions are worth a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmissionRule {
    /// Label of the form field that marks the topic of interest
    pub interest_label: String,

    /// Label of the form field holding the category, if any
    pub category_label: Option<String>,
}

/// Which edits are worth a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEditRule {
    /// 1-based column whose edits notify
    pub target_column: usize,

    /// 1-based column holding the record's display label
    pub label_column: usize,
}

/// Resolved rule for either event kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterestRule {
    NewSubmission(NewSubmissionRule),
    StatusEdit(StatusEditRule),
}
