//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{InterestRule, NotifierBlueprint, SubscriberType};
use dispatcher::sinks::DEFAULT_TOKEN_ENV;
use serde::Serialize;
use store::WorkbookStore;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    store_path: String,
    subscriber_count: usize,
    line_subscribers: usize,
    log_subscribers: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resolved_rules: Vec<InterestRule>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let mut warnings = collect_warnings(&blueprint);
            let resolved_rules = check_rules(&blueprint, &mut warnings);
            let count = |kind: SubscriberType| {
                blueprint
                    .subscribers
                    .iter()
                    .filter(|s| s.subscriber_type == kind)
                    .count()
            };

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    store_path: blueprint.store.path.display().to_string(),
                    subscriber_count: blueprint.subscribers.len(),
                    line_subscribers: count(SubscriberType::Line),
                    log_subscribers: count(SubscriberType::Log),
                    resolved_rules,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &NotifierBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.subscribers.is_empty() {
        warnings.push("No subscribers configured - messages will not be delivered".to_string());
    }

    if blueprint.rules.new_submission.category_label_cell.is_none() {
        warnings.push(
            "rules.new_submission.category_label_cell not set - messages carry no category"
                .to_string(),
        );
    }

    for subscriber in &blueprint.subscribers {
        if subscriber.subscriber_type != SubscriberType::Line {
            continue;
        }
        let token_env = subscriber
            .params
            .get("token_env")
            .map(String::as_str)
            .unwrap_or(DEFAULT_TOKEN_ENV);
        if std::env::var_os(token_env).is_none() {
            warnings.push(format!(
                "Subscriber '{}': environment variable '{}' is not set",
                subscriber.name, token_env
            ));
        }
    }

    warnings
}

/// Resolve both rules against the current workbook; failures are warnings
fn check_rules(blueprint: &NotifierBlueprint, warnings: &mut Vec<String>) -> Vec<InterestRule> {
    let store = match WorkbookStore::load_from_path(&blueprint.store.path) {
        Ok(store) => store,
        Err(e) => {
            warnings.push(format!(
                "Workbook {} could not be loaded: {}",
                blueprint.store.path.display(),
                e
            ));
            return Vec::new();
        }
    };

    let mut resolved = Vec::new();
    match strategy::resolve_new_submission(&blueprint.rules.new_submission, &store) {
        Ok(rule) => resolved.push(InterestRule::NewSubmission(rule)),
        Err(e) => warnings.push(e.to_string()),
    }
    match strategy::resolve_status_edit(&blueprint.rules.status_edit, &store) {
        Ok(rule) => resolved.push(InterestRule::StatusEdit(rule)),
        Err(e) => warnings.push(e.to_string()),
    }
    resolved
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Workbook: {}", summary.store_path);
            println!(
                "  Subscribers: {} ({} line, {} log)",
                summary.subscriber_count, summary.line_subscribers, summary.log_subscribers
            );
            for rule in &summary.resolved_rules {
                match rule {
                    InterestRule::NewSubmission(rule) => println!(
                        "  New submissions: field '{}'{}",
                        rule.interest_label,
                        rule.category_label
                            .as_ref()
                            .map(|c| format!(", category '{c}'"))
                            .unwrap_or_default()
                    ),
                    InterestRule::StatusEdit(rule) => println!(
                        "  Status edits: column {} (label column {})",
                        rule.target_column, rule.label_column
                    ),
                }
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
