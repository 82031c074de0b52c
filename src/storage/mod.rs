//! SQLite persistence for the portfolio.
//!
//! - `Catalog` - read-side providers (photographers, media) and seeding
//! - `LikeCounterService` - atomic, clamped like counter mutation

pub mod catalog;
pub mod counter;

pub use catalog::*;
pub use counter::*;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// How long a writer waits for a competing writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens or creates the database at `path` and makes sure the schema exists.
///
/// Configures SQLite for concurrent readers and writers:
/// - journal_mode = WAL (write-ahead logging for concurrent access)
/// - synchronous = NORMAL (balance between safety and speed)
/// - foreign_keys = ON (media rows belong to a photographer)
pub fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {:?}", path))?;

    conn.busy_timeout(BUSY_TIMEOUT)
        .context("Failed to set SQLite busy timeout")?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
        PRAGMA foreign_keys = ON;
        ",
    )
    .context("Failed to configure SQLite pragmas")?;

    create_tables(&conn)?;
    Ok(conn)
}

/// Creates the database schema if it doesn't exist.
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS photographer (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            city TEXT NOT NULL DEFAULT '',
            country TEXT NOT NULL DEFAULT '',
            tagline TEXT NOT NULL DEFAULT '',
            price INTEGER NOT NULL DEFAULT 0,
            portrait TEXT NOT NULL DEFAULT ''
        );

        -- likes is nullable and unchecked: legacy rows may hold NULL or
        -- negative counts, readers clamp them
        CREATE TABLE IF NOT EXISTS media (
            id INTEGER PRIMARY KEY NOT NULL,
            photographer_id INTEGER NOT NULL
                REFERENCES photographer(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            image TEXT,
            video TEXT,
            likes INTEGER,
            date TEXT NOT NULL DEFAULT '',
            price INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_media_photographer ON media(photographer_id);
        ",
    )
    .context("Failed to create database tables")?;

    debug!("Database tables created/verified");
    Ok(())
}
