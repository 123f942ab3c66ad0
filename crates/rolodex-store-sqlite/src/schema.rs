//! SQL schema for the Rolodex SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids from being reused after a delete. The `CHECK`
/// constraints repeat the validation limits so a bypassing writer still
/// gets a storage-level error.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      TEXT NOT NULL CHECK (length(first_name) BETWEEN 1 AND 50),
    last_name       TEXT NOT NULL CHECK (length(last_name)  BETWEEN 1 AND 50),
    email           TEXT NOT NULL CHECK (length(email)      BETWEEN 1 AND 320),
    phone           TEXT NOT NULL CHECK (length(phone)      BETWEEN 1 AND 15),
    birthday        TEXT NOT NULL,   -- YYYY-MM-DD
    additional_info TEXT CHECK (additional_info IS NULL OR length(additional_info) <= 350),
    created_at      TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS contacts_last_name_idx ON contacts(last_name);
CREATE INDEX IF NOT EXISTS contacts_email_idx     ON contacts(email);

PRAGMA user_version = 1;
";
