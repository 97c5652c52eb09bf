//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract smoke tests
//! - Trigger payload -> normalizer -> strategy -> dispatcher -> subscribers
//! - Configuration file -> running dispatcher

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use contracts::{
        CellRef, CellValue, DeliveryError, Message, MessageTemplates, NewSubmissionRuleConfig,
        RulesConfig, StatusEditRuleConfig, Subscriber, TabularStore,
    };
    use dispatcher::{DispatchOutcome, Dispatcher, DispatcherBuilder};
    use ingestion::{EventNormalizer, IngestionError};
    use observability::DispatchStats;
    use parking_lot::Mutex;
    use serde_json::json;
    use store::WorkbookStore;

    struct Recording {
        name: String,
        received: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                received: Mutex::default(),
            })
        }

        fn received(&self) -> Vec<String> {
            self.received.lock().clone()
        }
    }

    #[async_trait]
    impl Subscriber for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        async fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
            self.received.lock().push(message.to_string());
            Ok(())
        }
    }

    /// Always answers like a channel that rejected the token
    struct Unauthorized;

    #[async_trait]
    impl Subscriber for Unauthorized {
        fn name(&self) -> &str {
            "unauthorized"
        }

        async fn deliver(&self, _message: &Message) -> Result<(), DeliveryError> {
            Err(DeliveryError::rejected(
                "unauthorized",
                401,
                r#"{"message":"Authentication failed"}"#,
            ))
        }
    }

    fn cell(a1: &str) -> CellRef {
        a1.parse().unwrap()
    }

    fn rules() -> RulesConfig {
        RulesConfig {
            new_submission: NewSubmissionRuleConfig {
                sheet: "Config".into(),
                interest_label_cell: cell("B1"),
                category_label_cell: Some(cell("B2")),
            },
            status_edit: StatusEditRuleConfig {
                sheet: "Config".into(),
                target_column_cell: cell("B3"),
                label_column_cell: cell("B4"),
            },
        }
    }

    fn thai_templates() -> MessageTemplates {
        MessageTemplates {
            new_report: "ได้รับแจ้งข้อผิดพลาดใหม่".into(),
            category: "แผนก".into(),
            status_change: "มีการเปลี่ยนแปลงสถานะของ".into(),
            to: "เป็นสถานะ".into(),
        }
    }

    fn workbook() -> WorkbookStore {
        WorkbookStore::new()
            .with_sheet(
                "Config",
                vec![
                    vec!["Interest field".into(), "Error Type".into()],
                    vec!["Category field".into(), "Department".into()],
                    vec!["Target column".into(), CellValue::Number(3.0)],
                    vec!["Label column".into(), CellValue::Number(1.0)],
                ],
            )
            .with_sheet(
                "Tickets",
                vec![
                    vec!["Ticket".into(), "Opened".into(), "Status".into()],
                    vec!["Ticket#42".into(), "open".into(), "resolved".into()],
                ],
            )
    }

    fn build_dispatcher(templates: MessageTemplates) -> Dispatcher {
        let registry = strategy::default_registry(&rules(), templates).unwrap();
        DispatcherBuilder::new(registry).build().unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> serde_json::Value {
        let items: Vec<_> = pairs
            .iter()
            .map(|(title, response)| json!({ "title": title, "response": response }))
            .collect();
        json!({ "kind": "form_submit", "response": { "item_responses": items } })
    }

    fn edit(row: usize, column: usize) -> serde_json::Value {
        json!({ "kind": "edit", "sheet": "Tickets", "range": { "row": row, "column": column } })
    }

    /// End-to-end: form payload -> normalizer -> NewSubmissionStrategy -> subscribers
    #[tokio::test]
    async fn test_e2e_form_submission() {
        let store = workbook();
        let dispatcher = build_dispatcher(MessageTemplates::default());
        let group = Recording::new("group");
        dispatcher.subscribe(group.clone());

        let event = EventNormalizer::normalize_value(
            form(&[("Error Type", "Network down"), ("Department", "IT")]),
            &store,
        )
        .unwrap();
        let outcome = dispatcher.dispatch(&event, &store).await.unwrap();

        assert_eq!(
            outcome.message().map(Message::as_str),
            Some("New report: Network down (Category: IT)")
        );
        assert_eq!(group.received(), vec!["New report: Network down (Category: IT)"]);
    }

    #[tokio::test]
    async fn test_e2e_form_without_interest_field_is_silent() {
        let store = workbook();
        let dispatcher = build_dispatcher(MessageTemplates::default());
        let group = Recording::new("group");
        dispatcher.subscribe(group.clone());

        let event =
            EventNormalizer::normalize_value(form(&[("Department", "IT")]), &store).unwrap();
        let outcome = dispatcher.dispatch(&event, &store).await.unwrap();

        assert!(matches!(outcome, DispatchOutcome::Silent));
        assert!(group.received().is_empty());
    }

    /// End-to-end: edit payload -> row snapshot -> UpdateRecordStrategy -> subscribers
    #[tokio::test]
    async fn test_e2e_status_edit_with_thai_templates() {
        let store = workbook();
        let dispatcher = build_dispatcher(thai_templates());
        let group = Recording::new("group");
        dispatcher.subscribe(group.clone());

        let event = EventNormalizer::normalize_value(edit(2, 3), &store).unwrap();
        dispatcher.dispatch(&event, &store).await.unwrap();

        let other = EventNormalizer::normalize_value(edit(2, 2), &store).unwrap();
        let outcome = dispatcher.dispatch(&other, &store).await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Silent));

        assert_eq!(
            group.received(),
            vec!["มีการเปลี่ยนแปลงสถานะของ: Ticket#42 เป็นสถานะ resolved"]
        );
    }

    /// Rule values live in the store and apply to the next trigger
    #[tokio::test]
    async fn test_e2e_rule_change_in_store_applies_immediately() {
        let store = workbook();
        let dispatcher = build_dispatcher(MessageTemplates::default());
        let group = Recording::new("group");
        dispatcher.subscribe(group.clone());

        store
            .set_cell_value("Config", cell("B3"), CellValue::Number(2.0))
            .unwrap();

        let event = EventNormalizer::normalize_value(edit(2, 2), &store).unwrap();
        dispatcher.dispatch(&event, &store).await.unwrap();

        assert_eq!(group.received(), vec!["Status changed: Ticket#42 to open"]);
    }

    #[tokio::test]
    async fn test_e2e_partial_delivery_is_reported() {
        let store = workbook();
        let dispatcher = build_dispatcher(MessageTemplates::default());
        let group = Recording::new("group");
        dispatcher.subscribe(Arc::new(Unauthorized));
        dispatcher.subscribe(group.clone());

        let event = EventNormalizer::normalize_value(edit(2, 3), &store).unwrap();
        let outcome = dispatcher.dispatch(&event, &store).await.unwrap();

        let report = outcome.report().unwrap();
        assert_eq!(report.delivered, vec!["group"]);
        assert!(matches!(
            report.failures[0],
            DeliveryError::Rejected { status: 401, .. }
        ));
        assert_eq!(group.received().len(), 1);

        let mut stats = DispatchStats::new();
        stats.record_broadcast(
            contracts::EventKind::Edited,
            report.delivered.len(),
            report.failures.iter().map(|f| f.subscriber()),
            1.0,
        );
        assert_eq!(stats.summary().deliveries_failed, 1);
    }

    #[tokio::test]
    async fn test_e2e_unknown_payload_kind() {
        let store = workbook();
        let err = EventNormalizer::normalize_value(json!({ "kind": "open" }), &store).unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedEventKind { .. }));
    }

    #[tokio::test]
    async fn test_e2e_misconfigured_label_column() {
        let store = workbook();
        store
            .set_cell_value("Config", cell("B4"), CellValue::Number(9.0))
            .unwrap();
        let dispatcher = build_dispatcher(MessageTemplates::default());

        let event = EventNormalizer::normalize_value(edit(2, 3), &store).unwrap();
        let err = dispatcher.dispatch(&event, &store).await.unwrap_err();

        assert!(err.to_string().contains("label column 9"), "got: {err}");
    }

    /// Configuration file -> blueprint -> dispatcher with log subscribers
    #[tokio::test]
    async fn test_e2e_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("workbook.json"), workbook().to_json().unwrap()).unwrap();
        let config_path = dir.path().join("notifier.toml");
        std::fs::write(
            &config_path,
            r#"
[store]
path = "workbook.json"

[rules.new_submission]
sheet = "Config"
interest_label_cell = "B1"
category_label_cell = "B2"

[rules.status_edit]
sheet = "Config"
target_column_cell = "B3"
label_column_cell = "B4"

[templates]
new_report = "ได้รับแจ้งข้อผิดพลาดใหม่"
category = "แผนก"
status_change = "มีการเปลี่ยนแปลงสถานะของ"
to = "เป็นสถานะ"

[[subscribers]]
name = "audit"
subscriber_type = "log"
"#,
        )
        .unwrap();

        let blueprint = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        let store = WorkbookStore::load_from_path(&blueprint.store.path).unwrap();
        let registry =
            strategy::default_registry(&blueprint.rules, blueprint.templates.clone()).unwrap();
        let group = Recording::new("group");
        let dispatcher = DispatcherBuilder::new(registry)
            .with_subscriber_configs(blueprint.subscribers.clone())
            .with_subscriber(group.clone())
            .build()
            .unwrap();

        let event = EventNormalizer::normalize_value(
            form(&[("Error Type", "Printer jam"), ("Department", "HR")]),
            &store,
        )
        .unwrap();
        let outcome = dispatcher.dispatch(&event, &store).await.unwrap();

        assert_eq!(outcome.report().unwrap().delivered, vec!["audit", "group"]);
        assert_eq!(
            group.received(),
            vec!["ได้รับแจ้งข้อผิดพลาดใหม่: Printer jam (แผนก: HR)"]
        );
    }
}
