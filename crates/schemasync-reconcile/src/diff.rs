use std::collections::BTreeMap;

use schemasync_core::{ColumnSpec, SchemaSnapshot, TableSpec};

/// Column-level changes for a table present in both snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableChanges {
    pub columns_to_add: Vec<ColumnSpec>,
    pub columns_to_drop: Vec<String>,
}

impl TableChanges {
    pub fn is_empty(&self) -> bool {
        self.columns_to_add.is_empty() && self.columns_to_drop.is_empty()
    }
}

/// Ordered set of structural changes turning the live schema into the
/// declared one.
///
/// A table name appears in at most one of `tables_to_create`,
/// `tables_to_drop`, or `table_changes`; a column appears in at most one of
/// add/drop for its table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDiff {
    pub tables_to_create: Vec<TableSpec>,
    pub tables_to_drop: Vec<String>,
    pub table_changes: BTreeMap<String, TableChanges>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.tables_to_create.is_empty()
            && self.tables_to_drop.is_empty()
            && self.table_changes.is_empty()
    }

    /// Total number of structural operations the diff implies.
    pub fn operation_count(&self) -> usize {
        self.tables_to_create.len()
            + self.tables_to_drop.len()
            + self
                .table_changes
                .values()
                .map(|changes| changes.columns_to_add.len() + changes.columns_to_drop.len())
                .sum::<usize>()
    }
}

/// Compare the declared schema against the live one.
///
/// Only existence is reconciled: a column present on both sides with a
/// different type, nullability, or default is left untouched. Attribute
/// drift is out of scope for this engine.
pub fn diff(declared: &SchemaSnapshot, live: &SchemaSnapshot) -> SchemaDiff {
    let mut result = SchemaDiff::default();

    for (name, table) in &declared.tables {
        if !live.tables.contains_key(name) {
            result.tables_to_create.push(table.clone());
        }
    }

    for name in live.tables.keys() {
        if !declared.tables.contains_key(name) {
            result.tables_to_drop.push(name.clone());
        }
    }

    for (name, declared_table) in &declared.tables {
        let Some(live_table) = live.tables.get(name) else {
            continue;
        };

        let mut changes = TableChanges::default();
        for (column_name, column) in &declared_table.columns {
            if !live_table.columns.contains_key(column_name) {
                changes.columns_to_add.push(column.clone());
            }
        }
        for column_name in live_table.columns.keys() {
            if !declared_table.columns.contains_key(column_name) {
                changes.columns_to_drop.push(column_name.clone());
            }
        }

        if !changes.is_empty() {
            result.table_changes.insert(name.clone(), changes);
        }
    }

    result
}
