//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows, plus request bodies
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the record store issuing queries against the pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{NewRecord, Record, RecordPatch};
pub use schema::SQLITE_INIT;
pub use sqlite::{RecordStore, SqlitePool};
