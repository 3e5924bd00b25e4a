//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employees (
    employee_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    phone       TEXT NOT NULL,
    gender      TEXT NOT NULL    -- 'male' | 'female'
);

CREATE TABLE IF NOT EXISTS cafes (
    cafe_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL UNIQUE,   -- Unicode-lowercased name
    description TEXT NOT NULL DEFAULT '',
    logo        TEXT,
    location    TEXT NOT NULL
);

-- Cascades only ever remove inactive rows: entity removal is refused while
-- an active assignment references the entity.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id TEXT PRIMARY KEY,
    employee_id   TEXT NOT NULL REFERENCES employees(employee_id) ON DELETE CASCADE,
    cafe_id       TEXT NOT NULL REFERENCES cafes(cafe_id) ON DELETE CASCADE,
    assigned_date TEXT NOT NULL,   -- RFC 3339 UTC
    is_active     INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1))
);

CREATE UNIQUE INDEX IF NOT EXISTS assignments_one_active_per_employee
    ON assignments(employee_id) WHERE is_active = 1;
CREATE INDEX IF NOT EXISTS assignments_cafe_idx ON assignments(cafe_id);

PRAGMA user_version = 1;
";
