//! SQL DDL for initializing the record storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` TEXT PRIMARY KEY, assigned by the caller
/// - `title` TEXT NOT NULL
///
/// Rows are listed in `rowid` order, which follows insertion.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL
);
"#;
