use std::fmt;
use std::future::Future;

use schemasync_core::{ColumnKind, ColumnSpec};
use schemasync_introspect::StoreAdapter;

use crate::diff::SchemaDiff;

/// One structural operation derived from a diff.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateTable {
        table: String,
    },
    AddColumn {
        table: String,
        column: String,
        kind: ColumnKind,
    },
    DropColumn {
        table: String,
        column: String,
    },
    DropTable {
        table: String,
    },
}

impl Operation {
    /// Drop operations remove data irreversibly; creates and adds never do.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Operation::DropColumn { .. } | Operation::DropTable { .. }
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateTable { table } => write!(f, "create table {table}"),
            Operation::AddColumn { table, column, kind } => {
                write!(f, "add column {table}.{column} ({kind})")
            }
            Operation::DropColumn { table, column } => {
                write!(f, "drop column {table}.{column}")
            }
            Operation::DropTable { table } => write!(f, "drop table {table}"),
        }
    }
}

/// Terminal state of one applied operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    Applied,
    Failed(String),
    Skipped(String),
}

/// Outcome of one structural operation, recorded independently of its
/// siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub operation: Operation,
    pub status: OperationStatus,
}

impl OperationResult {
    pub fn failed(&self) -> bool {
        matches!(self.status, OperationStatus::Failed(_))
    }
}

/// Policy knobs for a reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Permit drop-column and drop-table operations. Off by default:
    /// destructive changes are reported as skipped instead of applied.
    pub allow_destructive: bool,
    /// Record every operation as skipped without touching the store.
    pub dry_run: bool,
}

const SKIP_DRY_RUN: &str = "dry run";
const SKIP_DESTRUCTIVE: &str = "destructive changes disabled";

/// Apply a diff in the fixed global order: create tables, add columns,
/// drop columns, drop tables. Additive phases run first so nothing a later
/// destructive phase touches can be a dependency of a new object.
///
/// Each operation is isolated: a failure is recorded and logged but the
/// remaining operations still run.
pub async fn execute(
    adapter: &dyn StoreAdapter,
    diff: &SchemaDiff,
    options: &ReconcileOptions,
) -> Vec<OperationResult> {
    let mut results = Vec::with_capacity(diff.operation_count());

    for table in &diff.tables_to_create {
        let operation = Operation::CreateTable {
            table: table.name.clone(),
        };
        let outcome = run(options, &operation, false, || adapter.create_table(table)).await;
        results.push(outcome);
    }

    for (table_name, changes) in &diff.table_changes {
        for column in &changes.columns_to_add {
            let column = relax_for_existing_rows(table_name, column);
            let operation = Operation::AddColumn {
                table: table_name.clone(),
                column: column.name.clone(),
                kind: column.kind.clone(),
            };
            let outcome = run(options, &operation, false, || {
                adapter.add_column(table_name, &column)
            })
            .await;
            results.push(outcome);
        }
    }

    for (table_name, changes) in &diff.table_changes {
        for column_name in &changes.columns_to_drop {
            let operation = Operation::DropColumn {
                table: table_name.clone(),
                column: column_name.clone(),
            };
            let outcome = run(options, &operation, true, || {
                adapter.drop_column(table_name, column_name)
            })
            .await;
            results.push(outcome);
        }
    }

    for table_name in &diff.tables_to_drop {
        let operation = Operation::DropTable {
            table: table_name.clone(),
        };
        let outcome = run(options, &operation, true, || adapter.drop_table(table_name)).await;
        results.push(outcome);
    }

    results
}

async fn run<F, Fut>(
    options: &ReconcileOptions,
    operation: &Operation,
    destructive: bool,
    apply: F,
) -> OperationResult
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = schemasync_core::Result<()>>,
{
    if options.dry_run {
        return OperationResult {
            operation: operation.clone(),
            status: OperationStatus::Skipped(SKIP_DRY_RUN.to_string()),
        };
    }
    if destructive && !options.allow_destructive {
        tracing::info!(%operation, "skipping destructive operation");
        return OperationResult {
            operation: operation.clone(),
            status: OperationStatus::Skipped(SKIP_DESTRUCTIVE.to_string()),
        };
    }

    match apply().await {
        Ok(()) => OperationResult {
            operation: operation.clone(),
            status: OperationStatus::Applied,
        },
        Err(err) => {
            tracing::warn!(%operation, error = %err, "operation failed");
            OperationResult {
                operation: operation.clone(),
                status: OperationStatus::Failed(err.to_string()),
            }
        }
    }
}

// A NOT NULL column without a default would fail the ALTER on any table
// with existing rows, so it is added nullable instead.
fn relax_for_existing_rows(table: &str, column: &ColumnSpec) -> ColumnSpec {
    if column.nullable || column.default.is_some() {
        return column.clone();
    }
    tracing::warn!(
        table,
        column = %column.name,
        "declared NOT NULL without default; adding as nullable"
    );
    let mut relaxed = column.clone();
    relaxed.nullable = true;
    relaxed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destructive_classification() {
        let drop = Operation::DropTable {
            table: "legacy_events".to_string(),
        };
        let create = Operation::CreateTable {
            table: "packs_v2".to_string(),
        };
        assert!(drop.is_destructive());
        assert!(!create.is_destructive());
    }

    #[test]
    fn not_null_without_default_is_relaxed() {
        let column = ColumnSpec::new("phone", ColumnKind::varchar(20)).not_null();
        let relaxed = relax_for_existing_rows("artists", &column);
        assert!(relaxed.nullable);

        let with_default = ColumnSpec::new("featured", ColumnKind::Boolean)
            .not_null()
            .default_value(schemasync_core::DefaultValue::Bool(false));
        let kept = relax_for_existing_rows("events", &with_default);
        assert!(!kept.nullable);
    }
}
