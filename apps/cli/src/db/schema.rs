//! SQLite schema definitions.

/// Complete schema for local SQLite database.
pub const SCHEMA: &str = r#"
-- Study settings, read once per deck build
CREATE TABLE IF NOT EXISTS study_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    display_filter TEXT NOT NULL DEFAULT 'all',
    sort_order TEXT NOT NULL DEFAULT 'sequential'
);

-- Latest outcome per word across completed sessions
CREATE TABLE IF NOT EXISTS word_outcomes (
    word_id INTEGER PRIMARY KEY,
    outcome TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_word_outcomes_outcome ON word_outcomes(outcome);
"#;

/// Initialize study settings if not exists.
pub const INIT_STUDY_SETTINGS: &str = r#"
INSERT OR IGNORE INTO study_settings (id) VALUES (1);
"#;
