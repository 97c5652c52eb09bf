//! NotifierBlueprint - Config Loader output
//!
//! Describes where rules live in the store, how messages read, and who receives them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{CellLocation, CellRef, MessageTemplates};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Store snapshot location
    pub store: StoreConfig,

    /// Where the interest rules are read from
    pub rules: RulesConfig,

    /// Localized message markers
    #[serde(default)]
    pub templates: MessageTemplates,

    /// Notification receivers
    #[serde(default)]
    pub subscribers: Vec<SubscriberConfig>,
}

/// Store adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Workbook snapshot file (JSON). Relative paths resolve against the config file.
    pub path: PathBuf,
}

/// Rule locations for both event kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub new_submission: NewSubmissionRuleConfig,
    pub status_edit: StatusEditRuleConfig,
}

/// Cells holding the new-submission rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmissionRuleConfig {
    /// Sheet holding the rule cells
    pub sheet: String,

    /// Cell containing the interest field label
    pub interest_label_cell: CellRef,

    /// Cell containing the category field label (optional)
    #[serde(default)]
    pub category_label_cell: Option<CellRef>,
}

impl NewSubmissionRuleConfig {
    pub fn interest_location(&self) -> CellLocation {
        CellLocation::new(&self.sheet, self.interest_label_cell)
    }

    pub fn category_location(&self) -> Option<CellLocation> {
        self.category_label_cell
            .map(|cell| CellLocation::new(&self.sheet, cell))
    }
}

/// Cells holding the status-edit rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEditRuleConfig {
    /// Sheet holding the rule cells
    pub sheet: String,

    /// Cell containing the 1-based target column index
    pub target_column_cell: CellRef,

    /// Cell containing the 1-based label column index
    pub label_column_cell: CellRef,
}

impl StatusEditRuleConfig {
    pub fn target_location(&self) -> CellLocation {
        CellLocation::new(&self.sheet, self.target_column_cell)
    }

    pub fn label_location(&self) -> CellLocation {
        CellLocation::new(&self.sheet, self.label_column_cell)
    }
}

/// Subscriber configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberConfig {
    /// Subscriber name
    pub name: String,

    /// Subscriber type
    pub subscriber_type: SubscriberType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Subscriber type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberType {
    /// LINE Messaging API push to one group/user
    Line,
    /// Log via tracing
    Log,
}
