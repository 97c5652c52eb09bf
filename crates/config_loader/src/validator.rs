//! Configuration validation
//!
//! Rules:
//! - rule sheets are named
//! - template markers are non-empty
//! - store path is set
//! - subscriber names are non-empty and unique
//! - `line` subscribers carry a `destination` param

use std::collections::HashSet;

use contracts::{ContractError, NotifierBlueprint, SubscriberType};

/// Validate a NotifierBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    validate_store(blueprint)?;
    validate_rules(blueprint)?;
    validate_templates(blueprint)?;
    validate_subscribers(blueprint)?;
    Ok(())
}

fn validate_store(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    if blueprint.store.path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "store.path",
            "store path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_rules(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    let rules = &blueprint.rules;
    if rules.new_submission.sheet.trim().is_empty() {
        return Err(ContractError::config_validation(
            "rules.new_submission.sheet",
            "sheet name cannot be empty",
        ));
    }
    if rules.status_edit.sheet.trim().is_empty() {
        return Err(ContractError::config_validation(
            "rules.status_edit.sheet",
            "sheet name cannot be empty",
        ));
    }
    if rules.status_edit.target_column_cell == rules.status_edit.label_column_cell {
        return Err(ContractError::config_validation(
            "rules.status_edit",
            "target_column_cell and label_column_cell must be different cells",
        ));
    }
    Ok(())
}

fn validate_templates(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    let t = &blueprint.templates;
    for (field, value) in [
        ("templates.new_report", &t.new_report),
        ("templates.category", &t.category),
        ("templates.status_change", &t.status_change),
        ("templates.to", &t.to),
    ] {
        if value.is_empty() {
            return Err(ContractError::config_validation(
                field,
                "template marker cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_subscribers(blueprint: &NotifierBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, subscriber) in blueprint.subscribers.iter().enumerate() {
        if subscriber.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("subscribers[{}].name", idx),
                "subscriber name cannot be empty",
            ));
        }
        if !seen.insert(&subscriber.name) {
            return Err(ContractError::config_validation(
                format!("subscribers[name={}]", subscriber.name),
                "duplicate subscriber name",
            ));
        }
        if subscriber.subscriber_type == SubscriberType::Line
            && subscriber
                .params
                .get("destination")
                .is_none_or(|d| d.trim().is_empty())
        {
            return Err(ContractError::config_validation(
                format!("subscribers[{}].params.destination", subscriber.name),
                "line subscriber requires a destination",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, MessageTemplates, NewSubmissionRuleConfig, RulesConfig,
        StatusEditRuleConfig, StoreConfig, SubscriberConfig,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> NotifierBlueprint {
        NotifierBlueprint {
            version: ConfigVersion::V1,
            store: StoreConfig {
                path: "workbook.json".into(),
            },
            rules: RulesConfig {
                new_submission: NewSubmissionRuleConfig {
                    sheet: "Config".into(),
                    interest_label_cell: "B1".parse().unwrap(),
                    category_label_cell: Some("B2".parse().unwrap()),
                },
                status_edit: StatusEditRuleConfig {
                    sheet: "Config".into(),
                    target_column_cell: "B3".parse().unwrap(),
                    label_column_cell: "B4".parse().unwrap(),
                },
            },
            templates: MessageTemplates::default(),
            subscribers: vec![SubscriberConfig {
                name: "ops".into(),
                subscriber_type: SubscriberType::Line,
                params: HashMap::from([("destination".to_string(), "C123".to_string())]),
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_duplicate_subscriber_name() {
        let mut bp = minimal_blueprint();
        bp.subscribers.push(bp.subscribers[0].clone());
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate subscriber name"), "got: {err}");
    }

    #[test]
    fn test_empty_subscriber_name() {
        let mut bp = minimal_blueprint();
        bp.subscribers[0].name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_line_without_destination() {
        let mut bp = minimal_blueprint();
        bp.subscribers[0].params.clear();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("requires a destination"), "got: {err}");
    }

    #[test]
    fn test_log_subscriber_needs_no_params() {
        let mut bp = minimal_blueprint();
        bp.subscribers[0].subscriber_type = SubscriberType::Log;
        bp.subscribers[0].params.clear();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_empty_template_marker() {
        let mut bp = minimal_blueprint();
        bp.templates.to = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("templates.to"), "got: {err}");
    }

    #[test]
    fn test_same_cell_for_both_columns() {
        let mut bp = minimal_blueprint();
        bp.rules.status_edit.label_column_cell = bp.rules.status_edit.target_column_cell;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("must be different"), "got: {err}");
    }

    #[test]
    fn test_empty_rule_sheet() {
        let mut bp = minimal_blueprint();
        bp.rules.new_submission.sheet = " ".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("rules.new_submission.sheet"), "got: {err}");
    }
}
