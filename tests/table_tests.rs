//! Table runtime tests: columns, layout persistence, selection and actions

use std::cell::RefCell;

use async_trait::async_trait;
use schema_forms_sdk::{
    ActionContext, ActionController, ActionError, ActionKind, CellContent, EntityActions,
    FieldMetadata, LayoutStore, MemoryLayoutStore, MutationError, NotificationLevel, ObjectSchema,
    Row, SchemaNode, SelectionState, SortDirection, TableBuilder,
};
use serde_json::{Map, Value, json};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn order_metadata() -> FieldMetadata {
    let schema = ObjectSchema::new()
        .field("id", SchemaNode::number())
        .field("customer", SchemaNode::string())
        .field("paid", SchemaNode::boolean())
        .field("placed_at", SchemaNode::date().optional())
        .into_node();
    FieldMetadata::of_object(&schema).unwrap()
}

fn order_row(id: i64, customer: &str, paid: bool, placed_at: Option<&str>) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), json!(id));
    row.insert("customer".to_string(), json!(customer));
    row.insert("paid".to_string(), json!(paid));
    row.insert(
        "placed_at".to_string(),
        placed_at.map_or(Value::Null, |at| json!(at)),
    );
    row
}

mod column_tests {
    use super::*;

    #[test]
    fn test_columns_derive_in_declaration_order_with_mapped_headers() {
        let table = TableBuilder::new("orders", order_metadata())
            .header_mapper(|name| name.replace('_', " ").to_uppercase())
            .omit("id")
            .build(MemoryLayoutStore::new());

        let headers: Vec<&str> = table
            .ordered_columns()
            .iter()
            .map(|c| c.header.as_str())
            .collect();
        assert_eq!(headers, vec!["CUSTOMER", "PAID", "PLACED AT"]);
    }

    #[test]
    fn test_default_cell_formatting() {
        let table = TableBuilder::new("orders", order_metadata()).build(MemoryLayoutStore::new());
        let row = order_row(7, "Ada", true, Some("2026-08-04T10:30:00Z"));

        let paid = table.column("paid").unwrap();
        assert_eq!(paid.cell(row.get("paid")), CellContent::Badge("Yes".to_string()));

        let placed = table.column("placed_at").unwrap();
        assert_eq!(
            placed.cell(row.get("placed_at")),
            CellContent::Text("2026-08-04 10:30".to_string())
        );

        // null and missing values both collapse to the sentinel
        assert_eq!(
            placed.cell(Some(&Value::Null)),
            CellContent::Text("N/A".to_string())
        );
        assert_eq!(placed.cell(None), CellContent::Text("N/A".to_string()));
    }

    #[test]
    fn test_custom_cell_renderer_overrides_default_formatting() {
        let table = TableBuilder::new("orders", order_metadata())
            .cell_renderer("customer", |value| {
                CellContent::Custom(format!("<b>{}</b>", value.as_str().unwrap_or("?")))
            })
            .build(MemoryLayoutStore::new());

        let row = order_row(7, "Ada", false, None);
        let customer = table.column("customer").unwrap();
        assert_eq!(
            customer.cell(row.get("customer")),
            CellContent::Custom("<b>Ada</b>".to_string())
        );
    }
}

mod layout_tests {
    use super::*;

    #[test]
    fn test_layout_survives_a_rebuild_over_the_same_store() {
        let mut table =
            TableBuilder::new("orders", order_metadata()).build(MemoryLayoutStore::new());
        table.move_column("paid", 0);
        table.set_column_hidden("placed_at", true);

        let rebuilt = TableBuilder::new("orders", order_metadata()).build(table.into_store());
        let ordered: Vec<&str> = rebuilt
            .ordered_columns()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(ordered, vec!["paid", "id", "customer", "placed_at"]);
        assert!(rebuilt.is_column_hidden("placed_at"));
    }

    #[test]
    fn test_missing_columns_are_appended_and_stale_ones_dropped() {
        let mut store = MemoryLayoutStore::new();
        // persisted before "paid"/"placed_at" existed, with a removed column
        let persisted = json!({
            "order": ["customer", "discount", "id"],
            "hidden": ["discount"]
        });
        store.save("orders", &persisted.to_string()).unwrap();

        let table = TableBuilder::new("orders", order_metadata()).build(store);
        let ordered: Vec<&str> = table
            .ordered_columns()
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(ordered, vec!["customer", "id", "paid", "placed_at"]);
        assert!(!table.is_column_hidden("discount"));
    }

    #[test]
    fn test_layouts_are_partitioned_by_technical_table_name() {
        let mut orders =
            TableBuilder::new("orders", order_metadata()).build(MemoryLayoutStore::new());
        orders.set_column_hidden("customer", true);

        let cars = TableBuilder::new("cars", order_metadata()).build(orders.into_store());
        assert!(!cars.is_column_hidden("customer"));
    }
}

mod selection_and_sort_tests {
    use super::*;

    fn populated() -> schema_forms_sdk::TableRuntime<MemoryLayoutStore> {
        let mut table =
            TableBuilder::new("orders", order_metadata()).build(MemoryLayoutStore::new());
        table.set_rows(vec![
            order_row(1, "Ada", true, Some("2026-03-01T09:00:00Z")),
            order_row(2, "Grace", false, None),
            order_row(3, "Edsger", true, Some("2026-01-15T12:00:00Z")),
        ]);
        table
    }

    #[test]
    fn test_select_all_reflects_tri_state() {
        let mut table = populated();
        assert_eq!(table.selection_state(), SelectionState::None);

        table.toggle_row(&json!(2));
        assert_eq!(table.selection_state(), SelectionState::Some);
        assert!(table.is_selected(&json!(2)));

        table.toggle_all();
        assert_eq!(table.selection_state(), SelectionState::All);

        table.toggle_row(&json!(1));
        assert_eq!(table.selection_state(), SelectionState::Some);

        table.toggle_all();
        assert_eq!(table.selection_state(), SelectionState::All);
    }

    #[test]
    fn test_single_column_sort_with_nulls_last() {
        let mut table = populated();
        table.sort_by("placed_at", SortDirection::Ascending);

        let customers: Vec<&Value> = table.rows().iter().map(|r| &r["customer"]).collect();
        assert_eq!(
            customers,
            vec![&json!("Edsger"), &json!("Ada"), &json!("Grace")]
        );

        table.toggle_sort("placed_at");
        let customers: Vec<&Value> = table.rows().iter().map(|r| &r["customer"]).collect();
        assert_eq!(
            customers,
            vec![&json!("Ada"), &json!("Edsger"), &json!("Grace")]
        );
    }

    #[test]
    fn test_toggle_sort_switches_columns_starting_ascending() {
        let mut table = populated();
        table.toggle_sort("customer");
        assert_eq!(table.sort().unwrap().direction, SortDirection::Ascending);

        table.toggle_sort("id");
        let spec = table.sort().unwrap();
        assert_eq!(spec.field, "id");
        assert_eq!(spec.direction, SortDirection::Ascending);
    }
}

mod action_tests {
    use super::*;

    /// Entity callbacks recording every invocation
    struct FakeActions {
        fail: bool,
        created: RefCell<Vec<Map<String, Value>>>,
        updated: RefCell<Vec<Map<String, Value>>>,
        deleted: RefCell<Vec<Value>>,
    }

    impl FakeActions {
        fn new() -> Self {
            Self {
                fail: false,
                created: RefCell::new(Vec::new()),
                updated: RefCell::new(Vec::new()),
                deleted: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait(?Send)]
    impl EntityActions for FakeActions {
        async fn create(&self, values: Map<String, Value>) -> Result<(), MutationError> {
            if self.fail {
                return Err(MutationError::Rejected("create failed".to_string()));
            }
            self.created.borrow_mut().push(values);
            Ok(())
        }

        async fn update(&self, values: Map<String, Value>) -> Result<(), MutationError> {
            if self.fail {
                return Err(MutationError::Rejected("update failed".to_string()));
            }
            self.updated.borrow_mut().push(values);
            Ok(())
        }

        async fn delete(&self, id: &Value) -> Result<(), MutationError> {
            if self.fail {
                return Err(MutationError::Rejected("delete failed".to_string()));
            }
            self.deleted.borrow_mut().push(id.clone());
            Ok(())
        }

        async fn fetch_details(&self, id: &Value) -> Result<Value, MutationError> {
            if self.fail {
                return Err(MutationError::NotFound(id.to_string()));
            }
            Ok(json!({"id": id, "customer": "Ada"}))
        }
    }

    fn controller(actions: FakeActions) -> ActionController<FakeActions> {
        ActionController::new(actions).with_context(ActionContext::new())
    }

    fn selected_context() -> ActionContext {
        let mut context = ActionContext::new();
        context.select_row(order_row(7, "Ada", true, None));
        context
    }

    #[test]
    fn test_create_success_closes_the_dialog() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller = controller(FakeActions::new());
            controller.context_mut().unwrap().begin(
                ActionKind::Create,
            );

            let mut values = Map::new();
            values.insert("customer".to_string(), json!("Grace"));
            controller.run_create(values).await.unwrap();

            let context = controller.context().unwrap();
            assert!(!context.is_dialog_open());
            assert!(!context.is_in_flight());
            assert_eq!(
                context.notifications()[0].level,
                NotificationLevel::Success
            );
        });
    }

    #[test]
    fn test_create_failure_keeps_the_dialog_open() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller = controller(FakeActions::failing());
            controller
                .context_mut()
                .unwrap()
                .begin(ActionKind::Create);

            controller.run_create(Map::new()).await.unwrap();

            let context = controller.context().unwrap();
            assert!(context.is_dialog_open());
            assert_eq!(context.notifications()[0].level, NotificationLevel::Error);
        });
    }

    #[test]
    fn test_update_injects_the_selected_row_id() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller =
                ActionController::new(FakeActions::new()).with_context(selected_context());

            let mut values = Map::new();
            values.insert("customer".to_string(), json!("Grace"));
            controller.run_update(values).await.unwrap();

            assert!(!controller.context().unwrap().is_dialog_open());

            let updated = controller.actions().updated.borrow();
            assert_eq!(updated.len(), 1);
            assert_eq!(updated[0].get("id"), Some(&json!(7)));
            assert_eq!(updated[0].get("customer"), Some(&json!("Grace")));
        });
    }

    #[test]
    fn test_delete_dialog_closes_on_success_and_failure() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller =
                ActionController::new(FakeActions::new()).with_context(selected_context());
            controller
                .context_mut()
                .unwrap()
                .begin(ActionKind::Delete);
            controller.run_delete().await.unwrap();
            let context = controller.context().unwrap();
            assert!(!context.is_dialog_open());
            assert!(context.selected_row().is_none());

            let mut controller =
                ActionController::new(FakeActions::failing()).with_context(selected_context());
            controller
                .context_mut()
                .unwrap()
                .begin(ActionKind::Delete);
            controller.run_delete().await.unwrap();
            let context = controller.context().unwrap();
            // closed even though the mutation was rejected
            assert!(!context.is_dialog_open());
            assert_eq!(context.notifications()[0].level, NotificationLevel::Error);
            // the selection survives a failed delete
            assert!(context.selected_row().is_some());
        });
    }

    #[test]
    fn test_details_payload_lands_on_the_context() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller =
                ActionController::new(FakeActions::new()).with_context(selected_context());
            controller.run_details().await.unwrap();

            let context = controller.context().unwrap();
            assert_eq!(
                context.details(),
                Some(&json!({"id": 7, "customer": "Ada"}))
            );
        });
    }

    #[test]
    fn test_controller_without_context_fails_its_precondition() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller = ActionController::new(FakeActions::new());
            assert_eq!(
                controller.run_create(Map::new()).await,
                Err(ActionError::MissingContext)
            );
            assert_eq!(controller.context().err(), Some(ActionError::MissingContext));
        });
    }

    #[test]
    fn test_update_without_a_selected_row_is_rejected() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller = controller(FakeActions::new());
            assert_eq!(
                controller.run_update(Map::new()).await,
                Err(ActionError::NoRowSelected)
            );
        });
    }

    #[test]
    fn test_failed_mutations_only_queue_notifications() {
        let rt = runtime();
        rt.block_on(async {
            let mut controller =
                ActionController::new(FakeActions::failing()).with_context(selected_context());
            controller.run_details().await.unwrap();
            controller.run_update(Map::new()).await.unwrap();

            let context = controller.context_mut().unwrap();
            assert!(context.details().is_none());
            assert!(context.selected_row().is_some());
            let drained = context.drain_notifications();
            assert_eq!(drained.len(), 2);
            assert!(context.notifications().is_empty());
        });
    }
}
