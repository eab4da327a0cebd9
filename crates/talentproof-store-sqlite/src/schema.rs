//! SQL schema for the TalentProof SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS talents (
    talent_id     TEXT PRIMARY KEY,
    display_name  TEXT NOT NULL,
    photo         TEXT,
    technologies  TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    score         INTEGER NOT NULL DEFAULT 0 CHECK (score BETWEEN 0 AND 100),
    availability  TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL
);

-- Only status and updated_at are ever UPDATEd.
CREATE TABLE IF NOT EXISTS contact_requests (
    request_id       TEXT PRIMARY KEY,
    talent_id        TEXT NOT NULL REFERENCES talents(talent_id),
    recruiter_name   TEXT NOT NULL,
    recruiter_email  TEXT NOT NULL,   -- lowercase
    recruiter_phone  TEXT NOT NULL,
    company_name     TEXT NOT NULL,
    message          TEXT NOT NULL,
    status           TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'processed')),
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; sorts lexically
    updated_at       TEXT NOT NULL,
    -- Unicode-lowercased copies for case-insensitive search; SQLite's
    -- lower() and LIKE only fold ASCII.
    name_folded      TEXT NOT NULL,
    company_folded   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS contact_requests_status_created_idx
    ON contact_requests(status, created_at DESC);
CREATE INDEX IF NOT EXISTS contact_requests_created_idx
    ON contact_requests(created_at DESC);
CREATE INDEX IF NOT EXISTS contact_requests_talent_idx
    ON contact_requests(talent_id);

PRAGMA user_version = 1;
";
