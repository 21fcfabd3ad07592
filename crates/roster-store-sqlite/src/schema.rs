//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS interns (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    phone       TEXT    NOT NULL DEFAULT '',
    institution TEXT    NOT NULL DEFAULT '',
    course      TEXT    NOT NULL DEFAULT '',
    interest    TEXT    NOT NULL DEFAULT '',
    start_date  TEXT    NOT NULL,   -- as entered: D/M/YY or D/M/YYYY
    end_date    TEXT    NOT NULL,
    level       INTEGER NOT NULL,
    created_at  TEXT    NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS nss_personnel (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    phone       TEXT    NOT NULL DEFAULT '',
    institution TEXT    NOT NULL DEFAULT '',
    course      TEXT    NOT NULL DEFAULT '',
    interest    TEXT    NOT NULL DEFAULT '',
    start_date  TEXT    NOT NULL,
    end_date    TEXT    NOT NULL,
    nss_id      TEXT    NOT NULL UNIQUE,
    email       TEXT    NOT NULL DEFAULT '',
    created_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS interns_institution_idx ON interns(institution);
CREATE INDEX IF NOT EXISTS nss_institution_idx     ON nss_personnel(institution);

PRAGMA user_version = 1;
";
