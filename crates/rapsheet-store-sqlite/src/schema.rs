//! SQL schema for the rapsheet SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One live row per (schema, cnic). Deletes remove the row outright.
CREATE TABLE IF NOT EXISTS records (
    kind        TEXT    NOT NULL,   -- Record::KIND of the stored schema
    cnic        INTEGER NOT NULL,
    value_json  TEXT    NOT NULL,   -- the full record as JSON
    updated_at  TEXT    NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    PRIMARY KEY (kind, cnic)
) WITHOUT ROWID;

PRAGMA user_version = 1;
";
