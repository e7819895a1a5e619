//! Schema creation and versioning.
//!
//! The schema version lives in `PRAGMA user_version`. Databases written by
//! the earlier tooling carry version 0 with the same `annotations` table, so
//! they are adopted in place.

use rusqlite::Connection;

use super::StoreError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS annotations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        image_path TEXT NOT NULL,
        label TEXT NOT NULL,
        x1 INTEGER,
        y1 INTEGER,
        x2 INTEGER,
        y2 INTEGER,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_annotations_image_path
        ON annotations (image_path);
";

/// Create the schema if it is missing. Never drops or rewrites data.
pub fn initialize(conn: &Connection) -> Result<(), StoreError> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::VersionMismatch {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(CREATE_SCHEMA).map_err(StoreError::Write)?;

    if found < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(StoreError::Write)?;
    }

    Ok(())
}

/// Read the schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(StoreError::Read)
}
