use thiserror::Error;

/// Core error type shared across Schemasync crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The declared schema is internally inconsistent (duplicate names).
    /// This is a programming error in the registry and aborts startup.
    #[error("invalid declaration: {0}")]
    Declaration(String),
    /// The live store could not be reached or its catalog could not be read.
    #[error("introspection failed: {0}")]
    Introspection(String),
    /// A single DDL statement failed against the live store.
    #[error("operation failed: {0}")]
    Operation(String),
    /// Snapshot file could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot file is not valid JSON for the snapshot contract.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by Schemasync crates.
pub type Result<T> = std::result::Result<T, Error>;
