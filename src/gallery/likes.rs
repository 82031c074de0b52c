//! Optimistic like/unlike with server reconciliation.
//!
//! A toggle updates the store immediately, then asks the server. The server's
//! count replaces the optimistic one on success; on any failure the count and
//! the liked flag go back to what they were before the toggle.
//!
//! At most one request per media id is ever in flight. Toggles on different
//! ids are independent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use super::transport::LikeTransport;
use crate::error::LikeError;
use crate::models::{LikeDelta, MediaId, MediaStore};

/// Per-item like state for this session. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeUiState {
    /// This user liked the item during this session.
    pub liked: bool,
    /// A request for the item is in flight.
    pub pending: bool,
}

/// What a call to [`LikeController::toggle_like`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A request for this id was already in flight; nothing happened.
    AlreadyPending,
    /// The id is not in the store.
    UnknownMedia,
    /// Unlike with a count already at zero: only the local flag was cleared.
    ClearedLocally,
    /// The server accepted the change and returned this count.
    Confirmed(u32),
    /// The request failed and the optimistic change was undone.
    RolledBack(LikeError),
}

/// Values restored when a request fails.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    liked: bool,
    likes: u32,
}

struct Inner<T> {
    store: Rc<RefCell<MediaStore>>,
    ui: RefCell<HashMap<MediaId, LikeUiState>>,
    transport: T,
}

/// Cheap to clone; clones share the same store, state and transport.
pub struct LikeController<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for LikeController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: LikeTransport> LikeController<T> {
    pub fn new(store: Rc<RefCell<MediaStore>>, transport: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                ui: RefCell::new(HashMap::new()),
                transport,
            }),
        }
    }

    pub fn state(&self, media_id: MediaId) -> LikeUiState {
        self.inner
            .ui
            .borrow()
            .get(&media_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_pending(&self, media_id: MediaId) -> bool {
        self.state(media_id).pending
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Like the item if this session hasn't liked it yet, unlike it otherwise.
    ///
    /// The optimistic change is applied before the first suspension point, so
    /// it is visible as soon as this future is first polled.
    pub async fn toggle_like(&self, media_id: MediaId) -> ToggleOutcome {
        let (delta, snapshot) = match self.begin(media_id) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        // Rolls back if this future is dropped before the reply arrives
        let in_flight = InFlight {
            controller: self,
            media_id,
            snapshot,
            armed: true,
        };
        let result = self.inner.transport.apply_delta(media_id, delta).await;
        in_flight.settle(result)
    }

    fn begin(&self, media_id: MediaId) -> Result<(LikeDelta, Snapshot), ToggleOutcome> {
        let state = self.state(media_id);
        if state.pending {
            debug!(media_id, "Like toggle ignored, request in flight");
            return Err(ToggleOutcome::AlreadyPending);
        }

        let Some(likes) = self.inner.store.borrow().likes(media_id) else {
            return Err(ToggleOutcome::UnknownMedia);
        };

        let delta = if state.liked {
            LikeDelta::Unlike
        } else {
            LikeDelta::Like
        };

        if delta == LikeDelta::Unlike && likes == 0 {
            self.set_state(media_id, LikeUiState { liked: false, pending: false });
            return Err(ToggleOutcome::ClearedLocally);
        }

        self.set_state(
            media_id,
            LikeUiState {
                liked: !state.liked,
                pending: true,
            },
        );
        MediaStore::update_likes(&self.inner.store, media_id, delta.apply(likes));

        debug!(media_id, delta = delta.value(), likes, "Optimistic like applied");
        Ok((delta, Snapshot { liked: state.liked, likes }))
    }

    fn finish(
        &self,
        media_id: MediaId,
        snapshot: Snapshot,
        result: Result<u32, LikeError>,
    ) -> ToggleOutcome {
        match result {
            Ok(likes) => {
                MediaStore::update_likes(&self.inner.store, media_id, likes);
                self.set_state(
                    media_id,
                    LikeUiState {
                        liked: !snapshot.liked,
                        pending: false,
                    },
                );
                debug!(media_id, likes, "Like confirmed by server");
                ToggleOutcome::Confirmed(likes)
            }
            Err(e) => {
                warn!(media_id, error = %e, "Like request failed, rolling back");
                self.restore(media_id, snapshot);
                ToggleOutcome::RolledBack(e)
            }
        }
    }

    fn restore(&self, media_id: MediaId, snapshot: Snapshot) {
        MediaStore::update_likes(&self.inner.store, media_id, snapshot.likes);
        self.set_state(
            media_id,
            LikeUiState {
                liked: snapshot.liked,
                pending: false,
            },
        );
    }

    fn set_state(&self, media_id: MediaId, state: LikeUiState) {
        self.inner.ui.borrow_mut().insert(media_id, state);
    }
}

/// A request that has been sent but not settled.
///
/// Dropping it unsettled undoes the optimistic change and clears `pending`.
struct InFlight<'a, T: LikeTransport> {
    controller: &'a LikeController<T>,
    media_id: MediaId,
    snapshot: Snapshot,
    armed: bool,
}

impl<T: LikeTransport> InFlight<'_, T> {
    fn settle(mut self, result: Result<u32, LikeError>) -> ToggleOutcome {
        self.armed = false;
        self.controller.finish(self.media_id, self.snapshot, result)
    }
}

impl<T: LikeTransport> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            warn!(media_id = self.media_id, "Like request abandoned, rolling back");
            self.controller.restore(self.media_id, self.snapshot);
        }
    }
}
