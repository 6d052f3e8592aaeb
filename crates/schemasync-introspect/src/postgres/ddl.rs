use schemasync_core::{ColumnKind, ColumnSpec, DefaultValue, TableSpec};

/// Quote an identifier for Postgres, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn kind_sql(kind: &ColumnKind) -> String {
    match kind {
        ColumnKind::Integer => "integer".to_string(),
        ColumnKind::BigInt => "bigint".to_string(),
        ColumnKind::Float => "double precision".to_string(),
        ColumnKind::Decimal { precision, scale } => format!("numeric({precision},{scale})"),
        ColumnKind::Boolean => "boolean".to_string(),
        ColumnKind::Varchar { length } => format!("character varying({length})"),
        ColumnKind::Text => "text".to_string(),
        ColumnKind::Timestamp => "timestamp with time zone".to_string(),
        ColumnKind::Date => "date".to_string(),
        ColumnKind::Json => "jsonb".to_string(),
        ColumnKind::Other { raw } => raw.clone(),
    }
}

fn default_sql(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Int(v) => v.to_string(),
        DefaultValue::Float(v) => v.to_string(),
        DefaultValue::Bool(v) => v.to_string(),
        DefaultValue::Text(v) => format!("'{}'", v.replace('\'', "''")),
        DefaultValue::Now => "now()".to_string(),
    }
}

fn column_clause(column: &ColumnSpec) -> String {
    let mut clause = format!("{} {}", quote_ident(&column.name), kind_sql(&column.kind));
    if !column.nullable {
        clause.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        clause.push_str(" DEFAULT ");
        clause.push_str(&default_sql(default));
    }
    clause
}

/// Full `CREATE TABLE` with every column and the primary-key clause.
pub fn create_table(table: &TableSpec) -> String {
    let mut clauses: Vec<String> = table.columns.values().map(column_clause).collect();

    let pk = table.primary_key_columns();
    if !pk.is_empty() {
        let columns: Vec<String> = pk.iter().map(|name| quote_ident(name)).collect();
        clauses.push(format!("PRIMARY KEY ({})", columns.join(", ")));
    }

    format!(
        "CREATE TABLE {} ({})",
        quote_ident(&table.name),
        clauses.join(", ")
    )
}

pub fn add_column(table: &str, column: &ColumnSpec) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {}",
        quote_ident(table),
        column_clause(column)
    )
}

pub fn drop_column(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {}",
        quote_ident(table),
        quote_ident(column)
    )
}

// CASCADE so a table still referenced by foreign keys of other dropped
// tables goes away regardless of drop order.
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table))
}
