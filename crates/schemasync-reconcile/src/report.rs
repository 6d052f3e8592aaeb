use crate::diff::SchemaDiff;
use crate::executor::{OperationResult, OperationStatus};

const BANNER: &str = "============================================================";
const RULE: &str = "------------------------------------------------------------";

/// Render the human-readable reconciliation summary.
///
/// Returns an empty string for an empty diff so a no-op startup stays
/// silent. Pure string assembly; cannot fail.
pub fn render_report(diff: &SchemaDiff, results: &[OperationResult]) -> String {
    if diff.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    lines.push(BANNER.to_string());
    lines.push(" SCHEMA RECONCILIATION".to_string());
    lines.push(BANNER.to_string());

    if !diff.tables_to_create.is_empty() {
        lines.push("Tables to create:".to_string());
        for table in &diff.tables_to_create {
            lines.push(format!("  + {}", table.name));
        }
    }

    let with_added: Vec<_> = diff
        .table_changes
        .iter()
        .filter(|(_, changes)| !changes.columns_to_add.is_empty())
        .collect();
    if !with_added.is_empty() {
        lines.push("Columns to add:".to_string());
        for (table, changes) in with_added {
            lines.push(format!("  {table}:"));
            for column in &changes.columns_to_add {
                lines.push(format!("    + {} ({})", column.name, column.kind));
            }
        }
    }

    let with_dropped: Vec<_> = diff
        .table_changes
        .iter()
        .filter(|(_, changes)| !changes.columns_to_drop.is_empty())
        .collect();
    if !with_dropped.is_empty() {
        lines.push("Columns to drop:".to_string());
        for (table, changes) in with_dropped {
            lines.push(format!("  {table}:"));
            for column in &changes.columns_to_drop {
                lines.push(format!("    - {column}"));
            }
        }
    }

    if !diff.tables_to_drop.is_empty() {
        lines.push("Tables to drop:".to_string());
        for table in &diff.tables_to_drop {
            lines.push(format!("  - {table}"));
        }
    }

    let failures: Vec<_> = results
        .iter()
        .filter_map(|result| match &result.status {
            OperationStatus::Failed(reason) => Some((&result.operation, reason)),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        lines.push("Failures:".to_string());
        for (operation, reason) in &failures {
            lines.push(format!("  {operation}: {reason}"));
        }
    }

    lines.push(RULE.to_string());
    lines.push(summary_line(results));
    lines.join("\n")
}

fn summary_line(results: &[OperationResult]) -> String {
    let applied = results
        .iter()
        .filter(|result| result.status == OperationStatus::Applied)
        .count();
    let skipped = results
        .iter()
        .filter(|result| matches!(result.status, OperationStatus::Skipped(_)))
        .count();
    let failed = results.iter().filter(|result| result.failed()).count();

    if failed > 0 {
        format!("FAILED: {failed} of {} operations failed", results.len())
    } else if skipped > 0 {
        format!("OK: {applied} applied, {skipped} skipped")
    } else {
        format!("OK: {applied} operations applied")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Operation;
    use schemasync_core::ColumnKind;

    #[test]
    fn empty_diff_renders_nothing() {
        assert_eq!(render_report(&SchemaDiff::default(), &[]), "");
    }

    #[test]
    fn summary_reflects_failures() {
        let results = vec![
            OperationResult {
                operation: Operation::CreateTable {
                    table: "packs_v2".to_string(),
                },
                status: OperationStatus::Applied,
            },
            OperationResult {
                operation: Operation::AddColumn {
                    table: "artists".to_string(),
                    column: "phone".to_string(),
                    kind: ColumnKind::varchar(20),
                },
                status: OperationStatus::Failed("permission denied".to_string()),
            },
        ];
        assert_eq!(summary_line(&results), "FAILED: 1 of 2 operations failed");
    }

    #[test]
    fn summary_counts_skips() {
        let results = vec![OperationResult {
            operation: Operation::DropTable {
                table: "legacy_events".to_string(),
            },
            status: OperationStatus::Skipped("destructive changes disabled".to_string()),
        }];
        assert_eq!(summary_line(&results), "OK: 0 applied, 1 skipped");
    }
}
