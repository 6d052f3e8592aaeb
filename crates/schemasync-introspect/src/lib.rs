//! Store-specific side of Schemasync.
//!
//! Defines the [`StoreAdapter`] capability trait the reconciliation engine
//! runs against, and its Postgres implementation over `sqlx`.

pub mod adapter;
pub mod postgres;

pub use adapter::StoreAdapter;
pub use postgres::PostgresAdapter;
