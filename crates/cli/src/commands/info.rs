//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{MessageTemplates, NotifierBlueprint};
use serde::Serialize;
use tracing::info;

use super::input::load_blueprint;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    store_path: String,
    rules: RulesInfo,
    templates: MessageTemplates,
    subscribers: Vec<SubscriberInfo>,
}

#[derive(Serialize)]
struct RulesInfo {
    interest_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_label: Option<String>,
    target_column: String,
    label_column: String,
}

#[derive(Serialize)]
struct SubscriberInfo {
    name: String,
    subscriber_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)?;
    let info = build_config_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &NotifierBlueprint) -> ConfigInfo {
    let new_submission = &blueprint.rules.new_submission;
    let status_edit = &blueprint.rules.status_edit;

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        store_path: blueprint.store.path.display().to_string(),
        rules: RulesInfo {
            interest_label: new_submission.interest_location().to_string(),
            category_label: new_submission.category_location().map(|l| l.to_string()),
            target_column: status_edit.target_location().to_string(),
            label_column: status_edit.label_location().to_string(),
        },
        templates: blueprint.templates.clone(),
        subscribers: blueprint
            .subscribers
            .iter()
            .map(|s| SubscriberInfo {
                name: s.name.clone(),
                subscriber_type: format!("{:?}", s.subscriber_type),
                destination: s.params.get("destination").cloned(),
            })
            .collect(),
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("Sheet Notifier Configuration ({})\n", info.version);
    println!("Workbook: {}", info.store_path);

    println!("\nRules (cells read at trigger time)");
    println!("   ├─ Interest label: {}", info.rules.interest_label);
    println!(
        "   ├─ Category label: {}",
        info.rules.category_label.as_deref().unwrap_or("(none)")
    );
    println!("   ├─ Target column: {}", info.rules.target_column);
    println!("   └─ Label column: {}", info.rules.label_column);

    println!("\nTemplates");
    println!("   ├─ New report: {}", info.templates.new_report);
    println!("   ├─ Category: {}", info.templates.category);
    println!("   ├─ Status change: {}", info.templates.status_change);
    println!("   └─ To: {}", info.templates.to);

    println!("\nSubscribers ({})", info.subscribers.len());
    for (i, subscriber) in info.subscribers.iter().enumerate() {
        let prefix = if i == info.subscribers.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        match &subscriber.destination {
            Some(destination) => println!(
                "   {} {} ({} -> {})",
                prefix, subscriber.name, subscriber.subscriber_type, destination
            ),
            None => println!(
                "   {} {} ({})",
                prefix, subscriber.name, subscriber.subscriber_type
            ),
        }
    }

    println!();
}
