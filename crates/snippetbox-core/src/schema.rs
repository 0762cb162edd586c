//! SQLite schema for the snippets table.

use rusqlite::{Connection, Result};

/// Create the snippets table and its expiry index if they don't exist.
///
/// Timestamps are Unix seconds (UTC) so the expiry filter is an integer
/// comparison.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS snippets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created INTEGER NOT NULL,
            expires INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_snippets_expires ON snippets(expires);
        "#,
    )
}
