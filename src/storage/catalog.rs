//! SQLite-backed catalog of photographers and their media.
//!
//! This module provides the `Catalog` struct which manages the read side of
//! the portfolio:
//! - Photographer listing and lookup
//! - Media listing per photographer (raw rows, counts unclamped)
//! - Re-seeding both tables from JSON seed files

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::models::{MediaRecord, Photographer};

pub struct Catalog {
    conn: Connection,
}

/// Row counts after a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub photographers: usize,
    pub media: usize,
}

impl Catalog {
    /// Opens or creates the catalog at the specified path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = super::open_connection(path)?;
        info!("Opened catalog at {:?}", path);
        Ok(Self { conn })
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    /// Lists every photographer by ascending id.
    pub fn list_photographers(&self) -> Result<Vec<Photographer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, city, country, tagline, price, portrait
             FROM photographer ORDER BY id",
        )?;

        let photographers = stmt
            .query_map([], row_to_photographer)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list photographers")?;

        Ok(photographers)
    }

    pub fn get_photographer(&self, id: i64) -> Result<Option<Photographer>> {
        self.conn
            .query_row(
                "SELECT id, name, city, country, tagline, price, portrait
                 FROM photographer WHERE id = ?1",
                params![id],
                row_to_photographer,
            )
            .optional()
            .context("Failed to get photographer")
    }

    /// Lists a photographer's media by ascending id. Popularity and date
    /// ties in the gallery keep this order.
    pub fn list_media_for_photographer(&self, photographer_id: i64) -> Result<Vec<MediaRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, photographer_id, title, image, video, likes, date, price
             FROM media WHERE photographer_id = ?1 ORDER BY id",
        )?;

        let media = stmt
            .query_map(params![photographer_id], row_to_media)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list media")?;

        debug!(photographer_id, count = media.len(), "Listed media");
        Ok(media)
    }

    pub fn count_media(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))
            .context("Failed to count media")
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Replaces the whole catalog with the given rows in a single transaction.
    pub fn seed(&mut self, photographers: &[Photographer], media: &[MediaRecord]) -> Result<SeedStats> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM media", [])?;
        tx.execute("DELETE FROM photographer", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO photographer (id, name, city, country, tagline, price, portrait)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for p in photographers {
                stmt.execute(params![
                    p.id, p.name, p.city, p.country, p.tagline, p.price, p.portrait
                ])
                .with_context(|| format!("Failed to insert photographer {}", p.id))?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO media (id, photographer_id, title, image, video, likes, date, price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for m in media {
                stmt.execute(params![
                    m.id,
                    m.photographer_id,
                    m.title,
                    m.image,
                    m.video,
                    m.likes,
                    m.date,
                    m.price,
                ])
                .with_context(|| format!("Failed to insert media {}", m.id))?;
            }
        }

        tx.commit().context("Failed to commit seed")?;

        let stats = SeedStats {
            photographers: photographers.len(),
            media: media.len(),
        };
        info!(?stats, "Seeded catalog");
        Ok(stats)
    }

    /// Reads the two JSON seed files and re-seeds the catalog from them.
    pub fn seed_from_files(&mut self, photographers: &Path, media: &Path) -> Result<SeedStats> {
        let photographers: Vec<Photographer> = read_json(photographers)?;
        let media: Vec<MediaRecord> = read_json(media)?;
        self.seed(&photographers, &media)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse seed file {:?}", path))
}

fn row_to_photographer(row: &Row<'_>) -> rusqlite::Result<Photographer> {
    Ok(Photographer {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        country: row.get(3)?,
        tagline: row.get(4)?,
        price: row.get(5)?,
        portrait: row.get(6)?,
    })
}

fn row_to_media(row: &Row<'_>) -> rusqlite::Result<MediaRecord> {
    Ok(MediaRecord {
        id: row.get(0)?,
        photographer_id: row.get(1)?,
        title: row.get(2)?,
        image: row.get(3)?,
        video: row.get(4)?,
        likes: row.get(5)?,
        date: row.get(6)?,
        price: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::test_utils::{test_media, test_photographer};

    #[test]
    fn test_open_and_create() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.sqlite");

        let catalog = Catalog::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(catalog.count_media().unwrap(), 0);
        assert!(catalog.list_photographers().unwrap().is_empty());
    }

    #[test]
    fn test_seed_and_read() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(&dir.path().join("test.sqlite")).unwrap();

        let mut negative = test_media(3, 82);
        negative.likes = Some(-2);
        let stats = catalog
            .seed(
                &[test_photographer(243), test_photographer(82)],
                &[test_media(1, 243), test_media(2, 243), negative],
            )
            .unwrap();
        assert_eq!(stats, SeedStats { photographers: 2, media: 3 });

        let ids: Vec<i64> = catalog
            .list_photographers()
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![82, 243]);

        let media = catalog.list_media_for_photographer(243).unwrap();
        assert_eq!(media.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);

        // Stored counts come back untouched
        let media = catalog.list_media_for_photographer(82).unwrap();
        assert_eq!(media[0].likes, Some(-2));

        assert_eq!(catalog.get_photographer(82).unwrap().unwrap().name, "Photographer 82");
        assert!(catalog.get_photographer(1).unwrap().is_none());
    }

    #[test]
    fn test_media_listed_by_id_whatever_the_seed_order() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(&dir.path().join("test.sqlite")).unwrap();

        catalog
            .seed(
                &[test_photographer(1)],
                &[test_media(30, 1), test_media(7, 1), test_media(12, 1)],
            )
            .unwrap();

        let ids: Vec<i64> = catalog
            .list_media_for_photographer(1)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![7, 12, 30]);
    }

    #[test]
    fn test_reseed_replaces_everything() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(&dir.path().join("test.sqlite")).unwrap();

        catalog
            .seed(&[test_photographer(1)], &[test_media(10, 1), test_media(11, 1)])
            .unwrap();
        catalog
            .seed(&[test_photographer(2)], &[test_media(20, 2)])
            .unwrap();

        assert_eq!(catalog.count_media().unwrap(), 1);
        assert!(catalog.get_photographer(1).unwrap().is_none());
    }

    #[test]
    fn test_seed_rejects_orphan_media() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(&dir.path().join("test.sqlite")).unwrap();

        assert!(catalog.seed(&[test_photographer(1)], &[test_media(10, 2)]).is_err());
        // The failed transaction left nothing behind
        assert!(catalog.list_photographers().unwrap().is_empty());
    }

    #[test]
    fn test_seed_from_files() {
        let dir = tempdir().unwrap();
        let photographers = dir.path().join("photographer.json");
        let media = dir.path().join("media.json");
        std::fs::write(
            &photographers,
            r#"[{"name":"Mimi Keel","id":243,"city":"London","country":"UK","tagline":"Voir le beau","price":400,"portrait":"MimiKeel.jpg"}]"#,
        )
        .unwrap();
        std::fs::write(
            &media,
            r#"[{"id":342550,"photographerId":243,"title":"Fashion Yellow Beach","image":"Fashion_Yellow_Beach.jpg","likes":62,"date":"2011-12-08","price":55},
                {"id":8520927,"photographerId":243,"title":"Fashion Urban Jungle","video":"Fashion_Urban_Jungle.mp4","likes":11,"date":"2011-11-06","price":55}]"#,
        )
        .unwrap();

        let mut catalog = Catalog::open(&dir.path().join("test.sqlite")).unwrap();
        let stats = catalog.seed_from_files(&photographers, &media).unwrap();
        assert_eq!(stats.media, 2);

        let media = catalog.list_media_for_photographer(243).unwrap();
        assert_eq!(media[1].video.as_deref(), Some("Fashion_Urban_Jungle.mp4"));
        assert_eq!(media[1].image, None);
    }
}
