//! Core contracts for Schemasync.
//!
//! This crate defines the schema value model shared by the declaration
//! registry, the live-store introspector, and the reconciliation engine,
//! together with the error taxonomy and connection-string redaction.

pub mod error;
pub mod redaction;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use redaction::{redact_connection_string, RedactedConnection};
pub use schema::{ColumnSpec, SchemaSnapshot, TableSpec};
pub use types::{ColumnKind, DefaultValue};
