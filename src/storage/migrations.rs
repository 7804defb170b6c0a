//! Database migrations for Memoir

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Initial schema (v1)
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS memories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            transcript TEXT NOT NULL DEFAULT '',
            emotion_tag TEXT,
            has_audio INTEGER NOT NULL DEFAULT 0,
            has_photos INTEGER NOT NULL DEFAULT 0,
            has_files INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        -- Every query is owner-scoped and ordered by recency
        CREATE INDEX IF NOT EXISTS idx_memories_owner_created
            ON memories(owner_id, created_at DESC);

        CREATE INDEX IF NOT EXISTS idx_memories_owner_emotion
            ON memories(owner_id, emotion_tag);
        "#,
    )?;

    conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;

    Ok(())
}
