use async_trait::async_trait;
use sqlx::PgPool;

use schemasync_core::{
    ColumnSpec, Error, Result, SchemaSnapshot, TableSpec,
};

use crate::adapter::StoreAdapter;

pub mod ddl;
mod mapper;
mod queries;

pub use mapper::normalize_type;

/// Adapter for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    pool: PgPool,
    schema: String,
}

impl PostgresAdapter {
    /// Create an adapter over a pre-configured pool, targeting `public`.
    pub fn new(pool: PgPool) -> Self {
        Self::with_schema(pool, "public")
    }

    /// Create an adapter targeting a specific namespace.
    pub fn with_schema(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    async fn execute_ddl(&self, statement: &str) -> Result<()> {
        tracing::debug!(statement, "executing ddl");
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::Operation(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for PostgresAdapter {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn introspect(&self) -> Result<SchemaSnapshot> {
        let mut tables = Vec::new();
        for table_name in queries::list_tables(&self.pool, &self.schema).await? {
            let raw_columns = queries::list_columns(&self.pool, &self.schema, &table_name).await?;
            let columns = mapper::map_columns(raw_columns);
            let table = TableSpec::new(table_name, columns)
                .map_err(|err| Error::Introspection(err.to_string()))?;
            tables.push(table);
        }

        SchemaSnapshot::from_tables(tables)
            .map_err(|err| Error::Introspection(err.to_string()))
    }

    async fn create_table(&self, table: &TableSpec) -> Result<()> {
        self.execute_ddl(&ddl::create_table(table)).await
    }

    async fn add_column(&self, table: &str, column: &ColumnSpec) -> Result<()> {
        self.execute_ddl(&ddl::add_column(table, column)).await
    }

    async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        self.execute_ddl(&ddl::drop_column(table, column)).await
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        self.execute_ddl(&ddl::drop_table(table)).await
    }
}
