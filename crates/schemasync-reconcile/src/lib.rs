//! Dialect-agnostic reconciliation engine.
//!
//! One-shot, synchronous sequence: introspect the live store, diff it
//! against the declared schema, apply the diff one operation at a time,
//! and render a startup report. Runs once per process start, before any
//! traffic is served. Concurrent reconciliation from multiple instances
//! against the same store is unsupported.

pub mod diff;
pub mod executor;
pub mod report;

pub use diff::{diff, SchemaDiff, TableChanges};
pub use executor::{
    execute, Operation, OperationResult, OperationStatus, ReconcileOptions,
};
pub use report::render_report;

use schemasync_core::{Result, SchemaSnapshot};
use schemasync_introspect::StoreAdapter;

/// Everything a run produced: the computed diff, per-operation results,
/// and the rendered report. Discarded after startup; nothing is persisted.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub diff: SchemaDiff,
    pub results: Vec<OperationResult>,
    pub report: String,
}

impl ReconcileOutcome {
    /// True when no operation failed. Skipped operations do not count as
    /// failures.
    pub fn succeeded(&self) -> bool {
        !self.results.iter().any(OperationResult::failed)
    }
}

/// Reconcile the live store against the declared schema.
///
/// The adapter is passed in explicitly; no ambient connection state. Fatal
/// errors (unreadable catalog) abort before any DDL runs. Individual DDL
/// failures are recorded in the outcome instead of propagating.
pub async fn reconcile(
    adapter: &dyn StoreAdapter,
    declared: &SchemaSnapshot,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome> {
    tracing::info!(engine = adapter.engine(), "introspecting live schema");
    let live = adapter.introspect().await?;

    let diff = diff::diff(declared, &live);
    if diff.is_empty() {
        tracing::info!("schema is up to date");
    } else {
        tracing::info!(operations = diff.operation_count(), "applying schema changes");
    }

    let results = executor::execute(adapter, &diff, options).await;
    let report = report::render_report(&diff, &results);

    Ok(ReconcileOutcome {
        diff,
        results,
        report,
    })
}
