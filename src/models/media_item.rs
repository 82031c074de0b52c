use serde::{Deserialize, Serialize};

/// Stable identifier of a media item, shared by the catalog and the client.
pub type MediaId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A media row as it comes out of storage or a seed file.
///
/// Nothing here is validated: references may be missing or blank and the like
/// count may be null or negative. Use [`MediaItem::from_record`] to ingest it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: MediaId,
    pub photographer_id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: MediaId,
    pub photographer_id: i64,
    pub title: String,
    pub kind: MediaKind,
    /// Asset filename exactly as stored, untrimmed.
    pub reference: String,
    pub likes: u32,
    pub date: String,
    pub price: u32,
}

impl MediaItem {
    /// Ingest a raw record.
    ///
    /// The image reference wins when a record carries both; a record with
    /// neither becomes an image with an empty reference so it still renders
    /// as "media not found". Null and negative like counts are clamped to 0.
    pub fn from_record(record: MediaRecord) -> Self {
        let (kind, reference) = match (record.image, record.video) {
            (Some(image), _) => (MediaKind::Image, image),
            (None, Some(video)) => (MediaKind::Video, video),
            (None, None) => (MediaKind::Image, String::new()),
        };

        Self {
            id: record.id,
            photographer_id: record.photographer_id,
            title: record.title,
            kind,
            reference,
            likes: clamp_count(record.likes.unwrap_or(0)),
            date: record.date,
            price: clamp_count(record.price),
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// The trimmed asset filename, or `None` when it is blank.
    pub fn asset_file(&self) -> Option<&str> {
        let file = self.reference.trim();
        if file.is_empty() {
            None
        } else {
            Some(file)
        }
    }
}

/// Clamp a stored integer into a non-negative `u32`.
pub fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(image: Option<&str>, video: Option<&str>, likes: Option<i64>) -> MediaRecord {
        MediaRecord {
            id: 1,
            photographer_id: 82,
            title: "Sunset".to_string(),
            image: image.map(str::to_string),
            video: video.map(str::to_string),
            likes,
            date: "2019-06-01".to_string(),
            price: 70,
        }
    }

    #[test]
    fn test_from_record_clamps_likes() {
        assert_eq!(MediaItem::from_record(record(Some("a.jpg"), None, Some(-4))).likes, 0);
        assert_eq!(MediaItem::from_record(record(Some("a.jpg"), None, None)).likes, 0);
        assert_eq!(MediaItem::from_record(record(Some("a.jpg"), None, Some(12))).likes, 12);
    }

    #[test]
    fn test_from_record_picks_kind() {
        let video = MediaItem::from_record(record(None, Some("clip.mp4"), Some(1)));
        assert!(video.is_video());
        assert_eq!(video.reference, "clip.mp4");

        let both = MediaItem::from_record(record(Some("a.jpg"), Some("clip.mp4"), Some(1)));
        assert_eq!(both.kind, MediaKind::Image);
        assert_eq!(both.reference, "a.jpg");

        let neither = MediaItem::from_record(record(None, None, Some(1)));
        assert_eq!(neither.kind, MediaKind::Image);
        assert_eq!(neither.asset_file(), None);
    }

    #[test]
    fn test_asset_file_is_trimmed() {
        let item = MediaItem::from_record(record(Some("  Portrait_Wednesday.jpg \n"), None, None));
        assert_eq!(item.asset_file(), Some("Portrait_Wednesday.jpg"));

        let blank = MediaItem::from_record(record(Some("   "), None, None));
        assert_eq!(blank.asset_file(), None);
    }

    #[test]
    fn test_record_deserializes_camel_case() {
        let json = r#"{"id":7,"photographerId":243,"title":"Lonesome","video":"x.mp4","likes":null,"date":"2011-12-08","price":45}"#;
        let record: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.photographer_id, 243);
        assert_eq!(record.image, None);
        assert_eq!(record.video.as_deref(), Some("x.mp4"));
        assert_eq!(record.likes, None);
    }
}
