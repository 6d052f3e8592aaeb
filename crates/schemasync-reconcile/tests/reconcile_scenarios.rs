use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use schemasync_core::{ColumnKind, ColumnSpec, Error, Result, SchemaSnapshot, TableSpec};
use schemasync_introspect::StoreAdapter;
use schemasync_reconcile::{diff, reconcile, OperationStatus, ReconcileOptions};

/// In-memory store: applies DDL to a mutable snapshot and records the
/// order operations arrived in.
struct FakeStore {
    state: Mutex<SchemaSnapshot>,
    log: Mutex<Vec<String>>,
    fail_tables: HashSet<String>,
    fail_introspect: bool,
}

impl FakeStore {
    fn new(initial: SchemaSnapshot) -> Self {
        Self {
            state: Mutex::new(initial),
            log: Mutex::new(Vec::new()),
            fail_tables: HashSet::new(),
            fail_introspect: false,
        }
    }

    fn with_unreadable_catalog() -> Self {
        let mut store = Self::new(SchemaSnapshot::empty());
        store.fail_introspect = true;
        store
    }

    fn failing_on(initial: SchemaSnapshot, tables: &[&str]) -> Self {
        let mut store = Self::new(initial);
        store.fail_tables = tables.iter().map(|table| table.to_string()).collect();
        store
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn check_failure(&self, table: &str) -> Result<()> {
        if self.fail_tables.contains(table) {
            return Err(Error::Operation(format!("permission denied for {table}")));
        }
        Ok(())
    }

    fn snapshot(&self) -> SchemaSnapshot {
        self.state.lock().unwrap().clone()
    }

    fn log_entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoreAdapter for FakeStore {
    fn engine(&self) -> &'static str {
        "fake"
    }

    async fn introspect(&self) -> Result<SchemaSnapshot> {
        if self.fail_introspect {
            return Err(Error::Introspection("catalog unreadable".to_string()));
        }
        Ok(self.snapshot())
    }

    async fn create_table(&self, table: &TableSpec) -> Result<()> {
        self.check_failure(&table.name)?;
        self.record(format!("create {}", table.name));
        self.state
            .lock()
            .unwrap()
            .tables
            .insert(table.name.clone(), table.clone());
        Ok(())
    }

    async fn add_column(&self, table: &str, column: &ColumnSpec) -> Result<()> {
        self.check_failure(table)?;
        self.record(format!("add {}.{}", table, column.name));
        let mut state = self.state.lock().unwrap();
        let table = state
            .tables
            .get_mut(table)
            .ok_or_else(|| Error::Operation(format!("no such table: {table}")))?;
        table.columns.insert(column.name.clone(), column.clone());
        Ok(())
    }

    async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        self.check_failure(table)?;
        self.record(format!("drop {table}.{column}"));
        let mut state = self.state.lock().unwrap();
        let table = state
            .tables
            .get_mut(table)
            .ok_or_else(|| Error::Operation(format!("no such table: {table}")))?;
        table.columns.remove(column);
        Ok(())
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        self.check_failure(table)?;
        self.record(format!("drop {table}"));
        self.state.lock().unwrap().tables.remove(table);
        Ok(())
    }
}

fn table(name: &str, columns: &[&str]) -> TableSpec {
    TableSpec::new(
        name,
        columns
            .iter()
            .map(|column| ColumnSpec::new(*column, ColumnKind::Text))
            .collect(),
    )
    .expect("table")
}

fn snapshot(tables: Vec<TableSpec>) -> SchemaSnapshot {
    SchemaSnapshot::from_tables(tables).expect("snapshot")
}

fn destructive() -> ReconcileOptions {
    ReconcileOptions {
        allow_destructive: true,
        ..ReconcileOptions::default()
    }
}

#[tokio::test]
async fn adds_missing_column_and_becomes_idempotent() {
    let store = FakeStore::new(snapshot(vec![table("artists", &["id", "name"])]));
    let declared = snapshot(vec![table("artists", &["id", "name", "phone"])]);

    let outcome = reconcile(&store, &declared, &ReconcileOptions::default())
        .await
        .expect("reconcile");
    assert!(outcome.succeeded());
    assert_eq!(outcome.diff.tables_to_create.len(), 0);
    assert_eq!(outcome.diff.tables_to_drop.len(), 0);

    let artists = store.snapshot();
    let columns: Vec<&str> = artists
        .table("artists")
        .expect("artists")
        .columns
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(columns, vec!["id", "name", "phone"]);

    let rediff = diff(&declared, &store.introspect().await.expect("introspect"));
    assert!(rediff.is_empty());
}

#[tokio::test]
async fn drops_undeclared_table_when_destructive_allowed() {
    let store = FakeStore::new(snapshot(vec![
        table("artists", &["id"]),
        table("legacy_events", &["id", "title"]),
    ]));
    let declared = snapshot(vec![table("artists", &["id"])]);

    let outcome = reconcile(&store, &declared, &destructive())
        .await
        .expect("reconcile");
    assert!(outcome.succeeded());
    assert_eq!(outcome.diff.tables_to_drop, vec!["legacy_events".to_string()]);
    assert!(store.snapshot().table("legacy_events").is_none());
}

#[tokio::test]
async fn destructive_operations_skip_by_default() {
    let store = FakeStore::new(snapshot(vec![
        table("artists", &["id", "badge"]),
        table("legacy_events", &["id"]),
    ]));
    let declared = snapshot(vec![table("artists", &["id"])]);

    let outcome = reconcile(&store, &declared, &ReconcileOptions::default())
        .await
        .expect("reconcile");

    assert!(outcome.succeeded());
    assert!(outcome
        .results
        .iter()
        .all(|result| matches!(result.status, OperationStatus::Skipped(_))));
    assert!(store.snapshot().table("legacy_events").is_some());
    assert!(store
        .snapshot()
        .table("artists")
        .expect("artists")
        .column("badge")
        .is_some());
}

#[tokio::test]
async fn creates_new_table_with_all_columns() {
    let store = FakeStore::new(snapshot(vec![]));
    let declared = snapshot(vec![table("packs_v2", &["id", "title"])]);

    let outcome = reconcile(&store, &declared, &ReconcileOptions::default())
        .await
        .expect("reconcile");
    assert!(outcome.succeeded());

    let live = store.snapshot();
    let packs = live.table("packs_v2").expect("packs_v2");
    assert_eq!(packs.columns.len(), 2);
    assert!(packs.column("id").is_some());
    assert!(packs.column("title").is_some());
}

#[tokio::test]
async fn identical_schemas_are_a_silent_no_op() {
    let declared = snapshot(vec![table("artists", &["id", "name"])]);
    let store = FakeStore::new(declared.clone());

    let outcome = reconcile(&store, &declared, &destructive())
        .await
        .expect("reconcile");
    assert!(outcome.diff.is_empty());
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.report, "");
    assert!(store.log_entries().is_empty());
}

#[tokio::test]
async fn creates_run_before_drops() {
    let store = FakeStore::new(snapshot(vec![
        table("artists", &["id"]),
        table("legacy_events", &["id"]),
    ]));
    let declared = snapshot(vec![
        table("artists", &["id", "phone"]),
        table("packs_v2", &["id"]),
    ]);

    let outcome = reconcile(&store, &declared, &destructive())
        .await
        .expect("reconcile");
    assert!(outcome.succeeded());

    let log = store.log_entries();
    assert_eq!(
        log,
        vec![
            "create packs_v2".to_string(),
            "add artists.phone".to_string(),
            "drop legacy_events".to_string(),
        ]
    );
}

#[tokio::test]
async fn one_failure_does_not_abort_siblings() {
    let store = FakeStore::failing_on(snapshot(vec![]), &["events"]);
    let declared = snapshot(vec![table("artists", &["id"]), table("events", &["id"])]);

    let outcome = reconcile(&store, &declared, &ReconcileOptions::default())
        .await
        .expect("reconcile");

    assert!(!outcome.succeeded());
    assert!(store.snapshot().table("artists").is_some());
    assert!(store.snapshot().table("events").is_none());

    let statuses: Vec<bool> = outcome.results.iter().map(|result| result.failed()).collect();
    assert_eq!(statuses.iter().filter(|failed| **failed).count(), 1);
    assert!(outcome.report.contains("FAILED: 1 of 2 operations failed"));
    assert!(outcome.report.contains("permission denied for events"));
}

#[tokio::test]
async fn unreadable_catalog_aborts_before_any_ddl() {
    let store = FakeStore::with_unreadable_catalog();
    let declared = snapshot(vec![table("artists", &["id"])]);

    let result = reconcile(&store, &declared, &destructive()).await;

    assert!(matches!(result, Err(Error::Introspection(_))));
    assert!(store.log_entries().is_empty());
}

#[tokio::test]
async fn dry_run_touches_nothing() {
    let store = FakeStore::new(snapshot(vec![table("legacy_events", &["id"])]));
    let declared = snapshot(vec![table("artists", &["id"])]);
    let options = ReconcileOptions {
        dry_run: true,
        allow_destructive: true,
    };

    let outcome = reconcile(&store, &declared, &options)
        .await
        .expect("reconcile");

    assert!(outcome.succeeded());
    assert!(store.log_entries().is_empty());
    assert!(store.snapshot().table("legacy_events").is_some());
    assert!(outcome
        .results
        .iter()
        .all(|result| result.status == OperationStatus::Skipped("dry run".to_string())));
}

#[tokio::test]
async fn not_null_addition_without_default_arrives_nullable() {
    let store = FakeStore::new(snapshot(vec![table("artists", &["id"])]));
    let declared = snapshot(vec![TableSpec::new(
        "artists",
        vec![
            ColumnSpec::new("id", ColumnKind::Text),
            ColumnSpec::new("phone", ColumnKind::varchar(20)).not_null(),
        ],
    )
    .expect("table")]);

    let outcome = reconcile(&store, &declared, &ReconcileOptions::default())
        .await
        .expect("reconcile");
    assert!(outcome.succeeded());

    let live = store.snapshot();
    let phone = live
        .table("artists")
        .expect("artists")
        .column("phone")
        .expect("phone");
    assert!(phone.nullable);
}

#[tokio::test]
async fn report_lists_changes_per_section() {
    let store = FakeStore::new(snapshot(vec![
        table("artists", &["id", "badge"]),
        table("legacy_events", &["id"]),
    ]));
    let declared = snapshot(vec![
        table("artists", &["id", "phone"]),
        table("packs_v2", &["id"]),
    ]);

    let outcome = reconcile(&store, &declared, &destructive())
        .await
        .expect("reconcile");

    assert!(outcome.report.contains("SCHEMA RECONCILIATION"));
    assert!(outcome.report.contains("Tables to create:"));
    assert!(outcome.report.contains("  + packs_v2"));
    assert!(outcome.report.contains("    + phone (text)"));
    assert!(outcome.report.contains("    - badge"));
    assert!(outcome.report.contains("  - legacy_events"));
    assert!(outcome.report.contains("OK: 4 operations applied"));
}
