//! Gallery ordering.
//!
//! Every order is a stable sort over a copy of the input, so items that
//! compare equal keep their insertion order.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use tracing::warn;

use crate::models::MediaItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    Date,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Popularity, SortKey::Date, SortKey::Title];

    /// Parse a sort key name. Unknown names fall back to popularity.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "date" => Self::Date,
            "title" => Self::Title,
            _ => Self::Popularity,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Date => "date",
            Self::Title => "title",
        }
    }

    /// Label shown in the sort menu.
    pub fn label(self) -> &'static str {
        match self {
            Self::Popularity => "Popularité",
            Self::Date => "Date",
            Self::Title => "Titre",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Return `items` ordered by `key`. The input is left untouched.
pub fn sort(items: &[MediaItem], key: SortKey) -> Vec<MediaItem> {
    let mut ordered = items.to_vec();
    match key {
        SortKey::Popularity => ordered.sort_by(|a, b| b.likes.cmp(&a.likes)),
        SortKey::Date => ordered.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Title => {
            let collator = TitleCollator::new();
            ordered.sort_by(|a, b| collator.compare(&a.title, &b.title));
        }
    }
    ordered
}

/// French collation for titles.
///
/// Base letters decide first, then accents, then case (lowercase before
/// uppercase), so `Été` files under E and `Œil` under O.
pub struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&locale!("fr").into(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!("French collation unavailable, comparing titles by code point: {}", e);
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| b.cmp(a)),
        }
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}
