//! In-memory media collection for one photographer's gallery.
//!
//! The `MediaStore` is built once per page view from catalog records and is the
//! source of truth for everything the gallery renders. Only the like counts
//! ever change, and only through the like controller.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::models::{MediaId, MediaItem, MediaRecord};

/// Callback type for total-likes changes
pub type TotalLikesCallback = Rc<dyn Fn(u64)>;

pub struct MediaStore {
    items: Vec<MediaItem>,
    on_total_likes_changed: Option<TotalLikesCallback>,
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("items", &self.items)
            .field("on_total_likes_changed", &"<closure>")
            .finish()
    }
}

impl MediaStore {
    /// Creates a store from already-ingested items, keeping insertion order.
    ///
    /// Ids must be unique; later duplicates are dropped.
    pub fn new(items: Vec<MediaItem>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.id) {
                unique.push(item);
            } else {
                warn!(media_id = item.id, "Dropping duplicate media id");
            }
        }

        debug!(count = unique.len(), "Created media store");
        Self {
            items: unique,
            on_total_likes_changed: None,
        }
    }

    /// Ingests raw catalog records, clamping like counts on the way in.
    pub fn from_records(records: Vec<MediaRecord>) -> Self {
        Self::new(records.into_iter().map(MediaItem::from_record).collect())
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, id: MediaId) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn likes(&self, id: MediaId) -> Option<u32> {
        self.get(id).map(|item| item.likes)
    }

    /// Sum of every item's current like count.
    pub fn total_likes(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.likes)).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overwrite one item's like count without notifying anyone.
    ///
    /// Returns the new total when the count changed, `None` for unknown ids
    /// or when the value is already `likes`.
    pub(crate) fn set_likes(&mut self, id: MediaId, likes: u32) -> Option<u64> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        if item.likes == likes {
            return None;
        }

        item.likes = likes;
        let total = self.total_likes();
        debug!(media_id = id, likes, total, "Updated like count");
        Some(total)
    }

    /// Overwrite one item's like count in a shared store, then notify the
    /// total-likes observer.
    ///
    /// The observer runs after the store borrow is released, so it may read
    /// the store.
    pub fn update_likes(store: &RefCell<Self>, id: MediaId, likes: u32) {
        let Some(total) = store.borrow_mut().set_likes(id, likes) else {
            return;
        };
        let observer = store.borrow().on_total_likes_changed.clone();
        if let Some(callback) = observer {
            callback(total);
        }
    }

    /// Connect callback for total-likes changes
    pub fn connect_total_likes_changed<F>(&mut self, callback: F)
    where
        F: Fn(u64) + 'static,
    {
        self.on_total_likes_changed = Some(Rc::new(callback));
    }
}
