use sqlx::PgPool;

use schemasync_core::{Error, Result};

fn introspection_error(err: sqlx::Error) -> Error {
    Error::Introspection(err.to_string())
}

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        select c.relname::text
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relkind = 'r'
        order by c.relname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(introspection_error)?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub name: String,
    /// Formatted type as reported by `format_type`, e.g.
    /// `character varying(255)` or `timestamp with time zone`.
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub is_primary_key: bool,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows: Vec<RawColumn> = sqlx::query_as(
        r#"
        select
          a.attname::text as name,
          pg_catalog.format_type(a.atttypid, a.atttypmod) as data_type,
          (not a.attnotnull) as is_nullable,
          pg_get_expr(ad.adbin, ad.adrelid) as "default",
          coalesce(pk.attnums @> array[a.attnum], false) as is_primary_key
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        left join (
          select con.conrelid, con.conkey as attnums
          from pg_constraint con
          where con.contype = 'p'
        ) pk on pk.conrelid = c.oid
        where n.nspname = $1
          and c.relname = $2
          and a.attnum > 0
          and not a.attisdropped
        order by a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(introspection_error)?;

    Ok(rows)
}
