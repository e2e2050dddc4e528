use rusqlite::{Connection, Result};

/// Tables for users, their workspaces and their model records.
///
/// `tags` and `source_links` hold JSON arrays of strings; NULL reads as empty.
/// Deleting a workspace keeps its models and clears their `workspace_id`.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS workspaces (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        is_default INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_workspaces_user ON workspaces(user_id);

    CREATE TABLE IF NOT EXISTS model_entry (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        developer TEXT,
        model_type TEXT,
        status TEXT,
        date_interacted TEXT,
        tags TEXT,
        notes TEXT,
        source_links TEXT,
        parameters INTEGER,
        license TEXT,
        version TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        workspace_id INTEGER REFERENCES workspaces(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_models_user ON model_entry(user_id);
    CREATE INDEX IF NOT EXISTS idx_models_workspace ON model_entry(workspace_id);
";

/// Create the schema if it is missing. Safe to run on every start.
pub fn initialize_database(conn: &Connection) -> Result<()> {
    // Per-connection setting, not stored in the file
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.execute_batch(SCHEMA)
}
