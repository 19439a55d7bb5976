//! SQLite schema definitions
//!
//! The store enforces uniqueness and referential integrity only; the
//! stage/type pairing and all other domain invariants are checked in
//! [`crate::validation`] before a write is issued.

/// Complete ServiceFlow schema
pub const SCHEMA: &str = r#"
-- ============================================
-- Solutions catalog
-- ============================================
CREATE TABLE IF NOT EXISTS solutions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    pain_points TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_solutions_name ON solutions (name);

-- ============================================
-- Discovery templates
-- ============================================
CREATE TABLE IF NOT EXISTS discovery_templates (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    -- JSON array of section names, insertion order preserved
    sections TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_templates_name ON discovery_templates (name);

-- ============================================
-- Discovery sessions
-- ============================================
CREATE TABLE IF NOT EXISTS discovery_sessions (
    id TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    opportunity_name TEXT,
    session_date TEXT NOT NULL,
    notes TEXT,
    template_id TEXT REFERENCES discovery_templates (id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_template ON discovery_sessions (template_id);
CREATE INDEX IF NOT EXISTS idx_sessions_date ON discovery_sessions (session_date);

-- ============================================
-- Opportunities pipeline
-- ============================================
CREATE TABLE IF NOT EXISTS opportunities (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    client_name TEXT NOT NULL,
    description TEXT,
    opportunity_type TEXT NOT NULL,
    stage TEXT NOT NULL,
    -- decimal amount as text; null means "not estimated"
    estimated_value TEXT,
    discovery_session_id TEXT REFERENCES discovery_sessions (id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_opportunities_stage ON opportunities (stage);
CREATE INDEX IF NOT EXISTS idx_opportunities_type ON opportunities (opportunity_type);

-- ============================================
-- Session <-> solution links
-- ============================================
CREATE TABLE IF NOT EXISTS session_solutions (
    discovery_session_id TEXT NOT NULL REFERENCES discovery_sessions (id) ON DELETE CASCADE,
    solution_id TEXT NOT NULL REFERENCES solutions (id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    PRIMARY KEY (discovery_session_id, solution_id)
);

-- ============================================
-- Users
-- ============================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    display_name TEXT,
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (email);
"#;
