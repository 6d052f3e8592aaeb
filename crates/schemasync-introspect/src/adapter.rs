use async_trait::async_trait;

use schemasync_core::{ColumnSpec, Result, SchemaSnapshot, TableSpec};

/// Capability interface to the live store.
///
/// The diff engine and executor only ever talk to this trait, so the
/// vendor-specific catalog queries and DDL dialect stay behind one seam.
#[async_trait]
pub trait StoreAdapter {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Snapshot the schema exactly as the catalog currently reports it.
    async fn introspect(&self) -> Result<SchemaSnapshot>;

    /// Create a table with its full column set in one statement.
    async fn create_table(&self, table: &TableSpec) -> Result<()>;

    /// Add a single column to an existing table.
    async fn add_column(&self, table: &str, column: &ColumnSpec) -> Result<()>;

    /// Drop a single column. Destructive.
    async fn drop_column(&self, table: &str, column: &str) -> Result<()>;

    /// Drop a table. Destructive.
    async fn drop_table(&self, table: &str) -> Result<()>;
}
