//! Message - Strategy output
//!
//! Notification text plus the localized markers used to compose it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty notification text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Message(String);

impl Message {
    /// Wrap text, `None` if it is empty
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.is_empty()).then_some(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Message {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "message text cannot be empty".to_string())
    }
}

impl From<Message> for String {
    fn from(message: Message) -> Self {
        message.0
    }
}

/// Localized markers injected into composed messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    /// Prefix of a new-submission message
    #[serde(default = "default_new_report")]
    pub new_report: String,

    /// Label inside the category suffix
    #[serde(default = "default_category")]
    pub category: String,

    /// Prefix of a status-change message
    #[serde(default = "default_status_change")]
    pub status_change: String,

    /// Joins record label and new status
    #[serde(default = "default_to")]
    pub to: String,
}

fn default_new_report() -> String {
    "New report".to_string()
}

fn default_category() -> String {
    "Category".to_string()
}

fn default_status_change() -> String {
    "Status changed".to_string()
}

fn default_to() -> String {
    "to".to_string()
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            new_report: default_new_report(),
            category: default_category(),
            status_change: default_status_change(),
            to: default_to(),
        }
    }
}

impl MessageTemplates {
    /// `"<new_report>: <body>"`, with `" (<category>: <cat>)"` appended when given
    pub fn new_report(&self, body: &str, category: Option<&str>) -> String {
        let mut text = format!("{}: {}", self.new_report, body);
        if let Some(category) = category {
            text.push_str(&format!(" ({}: {})", self.category, category));
        }
        text
    }

    /// `"<status_change>: <label> <to> <status>"`
    pub fn status_change(&self, label: &str, status: &str) -> String {
        format!("{}: {} {} {}", self.status_change, label, self.to, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_rejected() {
        assert!(Message::new("").is_none());
        assert_eq!(Message::new("hi").unwrap().as_str(), "hi");
    }

    #[test]
    fn test_message_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<Message>(r#""""#).is_err());
        let msg: Message = serde_json::from_str(r#""ok""#).unwrap();
        assert_eq!(msg.as_str(), "ok");
    }

    #[test]
    fn test_templates_compose() {
        let t = MessageTemplates::default();
        assert_eq!(t.new_report("Disk full", None), "New report: Disk full");
        assert_eq!(
            t.new_report("Disk full", Some("IT")),
            "New report: Disk full (Category: IT)"
        );
        assert_eq!(
            t.status_change("Ticket#42", "resolved"),
            "Status changed: Ticket#42 to resolved"
        );
    }
}
