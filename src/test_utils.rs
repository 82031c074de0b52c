//! Shared fixtures for unit tests.

use crate::models::{MediaId, MediaItem, MediaKind, MediaRecord, Photographer};

pub fn test_photographer(id: i64) -> Photographer {
    Photographer {
        id,
        name: format!("Photographer {}", id),
        city: "Lyon".to_string(),
        country: "France".to_string(),
        tagline: "Capturer la lumière".to_string(),
        price: 300,
        portrait: format!("portrait_{}.jpg", id),
    }
}

pub fn test_media(id: MediaId, photographer_id: i64) -> MediaRecord {
    MediaRecord {
        id,
        photographer_id,
        title: format!("Media {}", id),
        image: Some(format!("media_{}.jpg", id)),
        video: None,
        likes: Some(10),
        date: "2020-01-01".to_string(),
        price: 50,
    }
}

pub fn test_item(id: MediaId, likes: u32) -> MediaItem {
    MediaItem {
        id,
        photographer_id: 1,
        title: format!("Item {}", id),
        kind: MediaKind::Image,
        reference: format!("item_{}.jpg", id),
        likes,
        date: "2020-01-01".to_string(),
        price: 10,
    }
}
