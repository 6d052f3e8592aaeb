use schemasync_core::{ColumnKind, ColumnSpec, DefaultValue};

use super::queries::RawColumn;

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<ColumnSpec> {
    raw.into_iter()
        .map(|col| ColumnSpec {
            kind: normalize_type(&col.data_type),
            nullable: col.is_nullable,
            default: col.default.as_deref().and_then(parse_default),
            primary_key: col.is_primary_key,
            name: col.name,
        })
        .collect()
}

/// Normalize a `format_type` rendering into the shared semantic vocabulary.
///
/// Anything outside the vocabulary is carried through as
/// [`ColumnKind::Other`] so it still shows up in reports, without ever
/// comparing equal to a declared kind.
pub fn normalize_type(data_type: &str) -> ColumnKind {
    let (base, args) = split_type_args(data_type);

    match (base, args.as_slice()) {
        ("integer", []) => ColumnKind::Integer,
        ("bigint", []) => ColumnKind::BigInt,
        ("double precision", []) => ColumnKind::Float,
        ("numeric", [precision, scale]) => ColumnKind::Decimal {
            precision: *precision,
            scale: *scale,
        },
        ("boolean", []) => ColumnKind::Boolean,
        ("character varying", [length]) => ColumnKind::Varchar { length: *length },
        ("text", []) => ColumnKind::Text,
        ("timestamp with time zone", []) => ColumnKind::Timestamp,
        ("date", []) => ColumnKind::Date,
        ("json", []) | ("jsonb", []) => ColumnKind::Json,
        _ => ColumnKind::Other {
            raw: data_type.to_string(),
        },
    }
}

fn split_type_args(data_type: &str) -> (&str, Vec<u32>) {
    let Some((base, rest)) = data_type.split_once('(') else {
        return (data_type.trim(), Vec::new());
    };
    let Some(inner) = rest.strip_suffix(')') else {
        return (data_type.trim(), Vec::new());
    };

    let mut args = Vec::new();
    for part in inner.split(',') {
        match part.trim().parse::<u32>() {
            Ok(value) => args.push(value),
            Err(_) => return (data_type.trim(), Vec::new()),
        }
    }
    (base.trim(), args)
}

/// Best-effort parse of a catalog default expression into a typed literal.
///
/// Defaults are reported for visibility only; the diff never compares them,
/// so an unrecognized expression maps to `None` rather than an error.
pub fn parse_default(expression: &str) -> Option<DefaultValue> {
    let expr = expression.split("::").next().unwrap_or(expression).trim();

    if expr.eq_ignore_ascii_case("now()") || expr.eq_ignore_ascii_case("current_timestamp") {
        return Some(DefaultValue::Now);
    }
    if expr.eq_ignore_ascii_case("true") {
        return Some(DefaultValue::Bool(true));
    }
    if expr.eq_ignore_ascii_case("false") {
        return Some(DefaultValue::Bool(false));
    }
    if let Ok(value) = expr.parse::<i64>() {
        return Some(DefaultValue::Int(value));
    }
    if let Ok(value) = expr.parse::<f64>() {
        return Some(DefaultValue::Float(value));
    }
    if expr.len() >= 2 && expr.starts_with('\'') && expr.ends_with('\'') {
        let inner = expr[1..expr.len() - 1].replace("''", "'");
        return Some(DefaultValue::Text(inner));
    }
    None
}
