//! Rule resolution
//!
//! Rule *locations* come from configuration; rule *values* are read from the
//! store on every interpretation so edits to the rules sheet apply immediately.

use contracts::{
    CellLocation, CellValue, ContractError, NewSubmissionRule, NewSubmissionRuleConfig,
    StatusEditRule, StatusEditRuleConfig, TabularStore,
};

/// Read the new-submission rule.
///
/// An empty category cell means "no category field".
///
/// # Errors
/// `RuleResolution` if the interest label cell is empty, plus any store error.
pub fn resolve_new_submission(
    config: &NewSubmissionRuleConfig,
    store: &dyn TabularStore,
) -> Result<NewSubmissionRule, ContractError> {
    let interest_location = config.interest_location();
    let interest = store.get_location(&interest_location)?;
    if interest.is_empty() {
        return Err(ContractError::rule_resolution(
            "interest_label",
            &interest_location,
            "cell is empty",
        ));
    }

    let category_label = match config.category_location() {
        Some(location) => Some(store.get_location(&location)?)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string()),
        None => None,
    };

    Ok(NewSubmissionRule {
        interest_label: interest.to_string(),
        category_label,
    })
}

/// Read the status-edit rule.
///
/// # Errors
/// `RuleResolution` if either cell does not hold a positive integer.
pub fn resolve_status_edit(
    config: &StatusEditRuleConfig,
    store: &dyn TabularStore,
) -> Result<StatusEditRule, ContractError> {
    Ok(StatusEditRule {
        target_column: read_column(store, "target_column", &config.target_location())?,
        label_column: read_column(store, "label_column", &config.label_location())?,
    })
}

fn read_column(
    store: &dyn TabularStore,
    rule: &str,
    location: &CellLocation,
) -> Result<usize, ContractError> {
    let value = store.get_location(location)?;
    value.as_positive_index().ok_or_else(|| {
        let found = match &value {
            CellValue::Empty => "an empty cell".to_string(),
            other => format!("'{other}'"),
        };
        ContractError::rule_resolution(
            rule,
            location,
            format!("expected a positive column index, found {found}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::WorkbookStore;

    fn new_submission_config(category: Option<&str>) -> NewSubmissionRuleConfig {
        NewSubmissionRuleConfig {
            sheet: "Config".into(),
            interest_label_cell: "B1".parse().unwrap(),
            category_label_cell: category.map(|c| c.parse().unwrap()),
        }
    }

    fn status_edit_config() -> StatusEditRuleConfig {
        StatusEditRuleConfig {
            sheet: "Config".into(),
            target_column_cell: "B3".parse().unwrap(),
            label_column_cell: "B4".parse().unwrap(),
        }
    }

    fn config_sheet(rows: Vec<Vec<CellValue>>) -> WorkbookStore {
        WorkbookStore::new().with_sheet("Config", rows)
    }

    #[test]
    fn test_resolve_new_submission() {
        let store = config_sheet(vec![
            vec!["Interest".into(), "Error Type".into()],
            vec!["Category".into(), "Department".into()],
        ]);
        let rule = resolve_new_submission(&new_submission_config(Some("B2")), &store).unwrap();
        assert_eq!(rule.interest_label, "Error Type");
        assert_eq!(rule.category_label.as_deref(), Some("Department"));

        let rule = resolve_new_submission(&new_submission_config(None), &store).unwrap();
        assert_eq!(rule.category_label, None);
    }

    #[test]
    fn test_empty_category_cell_means_no_category() {
        let store = config_sheet(vec![vec!["Interest".into(), "Error Type".into()]]);
        let rule = resolve_new_submission(&new_submission_config(Some("B2")), &store).unwrap();
        assert_eq!(rule.category_label, None);
    }

    #[test]
    fn test_empty_interest_cell_is_an_error() {
        let store = config_sheet(vec![]);
        let err = resolve_new_submission(&new_submission_config(None), &store).unwrap_err();
        assert!(matches!(err, ContractError::RuleResolution { .. }));
        assert!(err.to_string().contains("Config!B1"), "got: {err}");
    }

    #[test]
    fn test_resolve_status_edit() {
        let store = config_sheet(vec![
            vec![],
            vec![],
            vec!["Target".into(), CellValue::Number(3.0)],
            vec!["Label".into(), "1".into()],
        ]);
        let rule = resolve_status_edit(&status_edit_config(), &store).unwrap();
        assert_eq!(rule.target_column, 3);
        assert_eq!(rule.label_column, 1);
    }

    #[test]
    fn test_non_numeric_column_cell() {
        let store = config_sheet(vec![
            vec![],
            vec![],
            vec!["Target".into(), "Status".into()],
            vec!["Label".into(), CellValue::Number(1.0)],
        ]);
        let err = resolve_status_edit(&status_edit_config(), &store).unwrap_err();
        assert!(err.to_string().contains("'Status'"), "got: {err}");
    }

    #[test]
    fn test_missing_rules_sheet() {
        let store = WorkbookStore::new();
        let err = resolve_status_edit(&status_edit_config(), &store).unwrap_err();
        assert!(matches!(err, ContractError::SheetNotFound { .. }));
    }
}
