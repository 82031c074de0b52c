//! Server-side like counter.
//!
//! A mutation is one `UPDATE ... RETURNING` statement, so the read, the clamp
//! and the write happen inside SQLite's write lock. Two requests for the same
//! row can never both read the old value.

use std::path::Path;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::CounterError;
use crate::models::{LikeDelta, MediaId};

pub struct LikeCounterService {
    conn: Connection,
}

impl LikeCounterService {
    /// Opens the counter against the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = super::open_connection(path)?;
        info!("Opened like counter at {:?}", path);
        Ok(Self { conn })
    }

    /// Adds `delta` to the stored count and returns the new count.
    ///
    /// The stored value is clamped to zero before and after the addition.
    pub fn apply_delta(&self, media_id: MediaId, delta: i64) -> Result<i64, CounterError> {
        let delta = LikeDelta::from_value(delta)
            .ok_or_else(|| CounterError::BadRequest(format!("delta must be -1 or 1, got {}", delta)))?;

        let likes = self
            .conn
            .query_row(
                "
            UPDATE media
            SET likes = MAX(0, MAX(0, COALESCE(likes, 0)) + ?2)
            WHERE id = ?1
            RETURNING likes
            ",
                params![media_id, delta.value()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .ok_or(CounterError::NotFound(media_id))?;

        debug!(media_id, delta = delta.value(), likes, "Applied like delta");
        Ok(likes)
    }
}
