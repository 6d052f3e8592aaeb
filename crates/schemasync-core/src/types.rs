use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic column type shared by declarations and introspection.
///
/// Both sides normalize into this vocabulary so that a declared
/// `Varchar(255)` and the catalog's `character varying(255)` compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    BigInt,
    Float,
    Decimal { precision: u32, scale: u32 },
    Boolean,
    Varchar { length: u32 },
    Text,
    /// Timezone-aware timestamp.
    Timestamp,
    Date,
    Json,
    /// Catalog type outside the shared vocabulary. Carried through
    /// introspection verbatim; never produced by declarations.
    Other { raw: String },
}

impl ColumnKind {
    pub fn varchar(length: u32) -> Self {
        ColumnKind::Varchar { length }
    }

    pub fn decimal(precision: u32, scale: u32) -> Self {
        ColumnKind::Decimal { precision, scale }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::BigInt => write!(f, "bigint"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Decimal { precision, scale } => {
                write!(f, "decimal({precision},{scale})")
            }
            ColumnKind::Boolean => write!(f, "boolean"),
            ColumnKind::Varchar { length } => write!(f, "varchar({length})"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Timestamp => write!(f, "timestamp"),
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Json => write!(f, "json"),
            ColumnKind::Other { raw } => write!(f, "{raw}"),
        }
    }
}

/// Typed default literal for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Store-side current timestamp (`now()`).
    Now,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Int(value) => write!(f, "{value}"),
            DefaultValue::Float(value) => write!(f, "{value}"),
            DefaultValue::Bool(value) => write!(f, "{value}"),
            DefaultValue::Text(value) => write!(f, "'{value}'"),
            DefaultValue::Now => write!(f, "now()"),
        }
    }
}
