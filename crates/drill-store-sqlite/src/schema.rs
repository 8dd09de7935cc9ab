//! SQL schema for the drill SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per tracked item. Saves replace the whole table in a single
-- transaction, so rows never go missing halfway through a write.
CREATE TABLE IF NOT EXISTS records (
    id          TEXT PRIMARY KEY NOT NULL,
    difficulty  INTEGER,            -- NULL reads as 3
    ef          REAL,               -- NULL reads as 2.5
    reps        INTEGER,            -- NULL reads as 0
    interval    INTEGER,            -- NULL reads as 3
    last_review TEXT,               -- ISO 8601 date or NULL
    next_review TEXT,               -- ISO 8601 date or NULL
    notes       TEXT                -- NULL reads as ''
);

CREATE INDEX IF NOT EXISTS records_next_review_idx ON records(next_review);

PRAGMA user_version = 1;
";
