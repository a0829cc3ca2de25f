//! Database schema definitions.

/// SQLite schema for tally.
///
/// Tasks keep the columns we query on (owner, due date) alongside a JSON
/// `data` blob holding the full record, so schema churn in the task shape
/// stays out of the DDL.
pub const SQLITE_SCHEMA: &str = r"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Tasks table
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    next_due_at TEXT,
    created_at TEXT NOT NULL,
    data JSON NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
CREATE INDEX IF NOT EXISTS idx_tasks_user_due ON tasks(user_id, next_due_at);
";
