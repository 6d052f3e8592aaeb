use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{ColumnKind, DefaultValue};

/// Declared or introspected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnSpec {
    /// Create a nullable column without default. Chain the other
    /// constructors to tighten it.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Mark as primary-key member. Implies NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}

/// A table with its columns keyed by name.
///
/// Columns live in a `BTreeMap` so snapshot comparisons never depend on
/// declaration or catalog ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: BTreeMap<String, ColumnSpec>,
}

impl TableSpec {
    /// Build a table from a column list, rejecting duplicate column names.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Result<Self> {
        let name = name.into();
        let mut map = BTreeMap::new();
        for column in columns {
            if map.contains_key(&column.name) {
                return Err(Error::Declaration(format!(
                    "duplicate column name in table {name}: {}",
                    column.name
                )));
            }
            map.insert(column.name.clone(), column);
        }
        Ok(Self { name, columns: map })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    /// Primary-key column names, in name order.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .values()
            .filter(|column| column.primary_key)
            .map(|column| column.name.as_str())
            .collect()
    }
}

/// Point-in-time description of a schema, declared or live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: BTreeMap<String, TableSpec>,
}

impl SchemaSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the declared snapshot from an explicit registry of tables.
    ///
    /// Fails fast on duplicate table names: that is a programming error in
    /// the declarations, not a runtime condition to reconcile.
    pub fn from_tables(tables: Vec<TableSpec>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for table in tables {
            let name = table.name.clone();
            if map.insert(name.clone(), table).is_some() {
                return Err(Error::Declaration(format!("duplicate table name: {name}")));
            }
        }
        Ok(Self { tables: map })
    }

    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Read a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot: SchemaSnapshot = serde_json::from_str(&contents)?;
        snapshot.check_names()?;
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Deserialized snapshots bypass the constructors, so map keys must be
    // re-checked against the embedded table and column names. A mismatched
    // table key would make the diff and the emitted DDL disagree on the
    // table's name.
    fn check_names(&self) -> Result<()> {
        for (table_key, table) in &self.tables {
            if table_key != &table.name {
                return Err(Error::Declaration(format!(
                    "table key {table_key} does not match table name {}",
                    table.name
                )));
            }
            for (key, column) in &table.columns {
                if key != &column.name {
                    return Err(Error::Declaration(format!(
                        "column key {key} does not match column name {} in table {table_key}",
                        column.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_column() -> ColumnSpec {
        ColumnSpec::new("id", ColumnKind::varchar(36)).primary_key()
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let result = TableSpec::new(
            "artists",
            vec![
                ColumnSpec::new("name", ColumnKind::varchar(255)),
                ColumnSpec::new("name", ColumnKind::Text),
            ],
        );
        assert!(matches!(result, Err(Error::Declaration(_))));
    }

    #[test]
    fn rejects_duplicate_table_names() {
        let artists = TableSpec::new("artists", vec![id_column()]).expect("table");
        let result = SchemaSnapshot::from_tables(vec![artists.clone(), artists]);
        assert!(matches!(result, Err(Error::Declaration(_))));
    }

    #[test]
    fn primary_key_implies_not_null() {
        let column = id_column();
        assert!(column.primary_key);
        assert!(!column.nullable);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let table = TableSpec::new(
            "packs",
            vec![
                id_column(),
                ColumnSpec::new("price", ColumnKind::Float).not_null(),
                ColumnSpec::new("is_active", ColumnKind::Boolean)
                    .default_value(DefaultValue::Bool(true)),
            ],
        )
        .expect("table");
        let snapshot = SchemaSnapshot::from_tables(vec![table]).expect("snapshot");

        let json = snapshot.to_json_pretty().expect("serialize");
        let parsed: SchemaSnapshot = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn rejects_table_key_renamed_away_from_table_name() {
        let json = r#"{"tables": {"artists": {"name": "artist", "columns": {}}}}"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).expect("parse");
        assert!(matches!(snapshot.check_names(), Err(Error::Declaration(_))));
    }

    #[test]
    fn rejects_column_key_renamed_away_from_column_name() {
        let json = r#"{"tables": {"artists": {"name": "artists", "columns": {
            "name": {"name": "title", "kind": {"type": "text"}, "nullable": true}
        }}}}"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).expect("parse");
        assert!(matches!(snapshot.check_names(), Err(Error::Declaration(_))));
    }

    #[test]
    fn consistent_keys_pass_name_checks() {
        let table = TableSpec::new(
            "artists",
            vec![ColumnSpec::new("name", ColumnKind::Text)],
        )
        .expect("table");
        let snapshot = SchemaSnapshot::from_tables(vec![table]).expect("snapshot");
        assert!(snapshot.check_names().is_ok());
    }

    #[test]
    fn table_lookup_and_pk_columns() {
        let table = TableSpec::new(
            "event_artists",
            vec![
                ColumnSpec::new("event_id", ColumnKind::varchar(36)).primary_key(),
                ColumnSpec::new("artist_id", ColumnKind::varchar(36)).primary_key(),
                ColumnSpec::new("start_time", ColumnKind::varchar(10)),
            ],
        )
        .expect("table");
        assert_eq!(table.primary_key_columns(), vec!["artist_id", "event_id"]);
        assert!(table.column("start_time").is_some());
        assert!(table.column("missing").is_none());
    }
}
