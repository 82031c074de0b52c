//! Gallery interaction controller for one photographer page.
//!
//! `Gallery` ties the pieces together:
//! - the `MediaStore` holding the page's media
//! - the sort menu (`AccessibleDropdown<SortKey>`) and `sort`
//! - the `LikeController` for optimistic likes
//! - the `Lightbox`, opened on a snapshot of the current order
//!
//! It also tracks which element has keyboard focus so that every transition's
//! focus request is applied in one place.

pub mod likes;
pub mod sort;
pub mod transport;

pub use likes::*;
pub use sort::*;
pub use transport::*;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::models::{AssetRoot, MediaId, MediaItem, MediaRecord, MediaStore, Photographer};
use crate::ui::{
    route, AccessibleDropdown, DropdownFocus, DropdownInput, DropdownOption, Key, KeyOrigin,
    Lightbox, LightboxEffect, LightboxInput, LightboxView, StickyBar, Surface,
};

/// Focusable elements of the gallery page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// No particular element (initial state, or focus moved on by Tab).
    Page,
    SortTrigger,
    /// Sort menu option at this index.
    SortOption(usize),
    /// Thumbnail button opening the viewer on this item.
    Card(MediaId),
    LikeButton(MediaId),
    ViewerClose,
    ViewerPrev,
    ViewerNext,
}

impl FocusTarget {
    fn is_inside_viewer(self) -> bool {
        matches!(self, Self::ViewerClose | Self::ViewerPrev | Self::ViewerNext)
    }
}

/// One card of the media grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub id: MediaId,
    pub title: String,
    /// Resolved asset, `None` when the filename is blank.
    pub src: Option<String>,
    pub is_video: bool,
    pub likes: u32,
    pub liked: bool,
    /// Like button is disabled while a request is in flight.
    pub pending: bool,
    pub open_label: String,
    pub like_label: String,
}

impl GalleryCard {
    /// The thumbnail only opens the viewer when there is something to show.
    pub fn can_open(&self) -> bool {
        self.src.is_some()
    }
}

/// Result of a key press routed through the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Unhandled,
    Handled,
    /// The like button was activated; the caller drives the toggle.
    ToggleLike(MediaId),
}

pub struct Gallery<T> {
    photographer: Photographer,
    store: Rc<RefCell<MediaStore>>,
    likes: LikeController<T>,
    sort_menu: AccessibleDropdown<SortKey>,
    lightbox: Lightbox<FocusTarget>,
    assets: AssetRoot,
    focus: FocusTarget,
}

impl<T: LikeTransport> Gallery<T> {
    pub fn new(
        photographer: Photographer,
        records: Vec<MediaRecord>,
        transport: T,
        assets: AssetRoot,
    ) -> Self {
        let store = Rc::new(RefCell::new(MediaStore::from_records(records)));
        let likes = LikeController::new(store.clone(), transport);
        let sort_menu = AccessibleDropdown::new(
            SortKey::ALL
                .iter()
                .map(|key| DropdownOption::new(*key, key.label()))
                .collect(),
            SortKey::default(),
        );

        if store.borrow().is_empty() {
            warn!(photographer = photographer.id, "Gallery has no media");
        }
        info!(
            photographer = photographer.id,
            media = store.borrow().len(),
            "Opened gallery"
        );

        Self {
            photographer,
            store,
            likes,
            sort_menu,
            lightbox: Lightbox::new(),
            assets,
            focus: FocusTarget::Page,
        }
    }

    pub fn photographer(&self) -> &Photographer {
        &self.photographer
    }

    /// Handle for toggling likes. Clones share state with this gallery, so a
    /// toggle can run as its own task while the gallery keeps taking input.
    pub fn likes(&self) -> LikeController<T> {
        self.likes.clone()
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_menu.selected()
    }

    pub fn sort_menu(&self) -> &AccessibleDropdown<SortKey> {
        &self.sort_menu
    }

    #[cfg(test)]
    pub fn lightbox(&self) -> &Lightbox<FocusTarget> {
        &self.lightbox
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    /// Current media in display order.
    pub fn sorted(&self) -> Vec<MediaItem> {
        sort(self.store.borrow().items(), self.sort_key())
    }

    pub fn cards(&self) -> Vec<GalleryCard> {
        self.sorted()
            .into_iter()
            .map(|item| {
                let state = self.likes.state(item.id);
                GalleryCard {
                    id: item.id,
                    src: self.assets.resolve(&item),
                    is_video: item.is_video(),
                    likes: item.likes,
                    liked: state.liked,
                    pending: state.pending,
                    open_label: format!("Ouvrir {} en grand", item.title),
                    like_label: format!("Like {} (actuellement {})", item.title, item.likes),
                    title: item.title,
                }
            })
            .collect()
    }

    pub fn sticky_bar(&self) -> StickyBar {
        StickyBar {
            total_likes: self.store.borrow().total_likes(),
            price_per_day: u64::try_from(self.photographer.price).unwrap_or(0),
        }
    }

    /// Connect callback for total-likes changes
    pub fn connect_total_likes_changed<F>(&self, callback: F)
    where
        F: Fn(u64) + 'static,
    {
        self.store.borrow_mut().connect_total_likes_changed(callback);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Record that focus moved to `target`.
    ///
    /// While the viewer is open, focus landing outside it is sent back to the
    /// viewer's close control.
    pub fn set_focus(&mut self, target: FocusTarget) {
        self.focus = target;
        if self.lightbox.is_open() {
            let effect = self.lightbox.handle(LightboxInput::FocusIn {
                inside: target.is_inside_viewer(),
            });
            self.apply_viewer_effect(effect);
        }
    }

    pub fn sort_input(&mut self, input: DropdownInput) {
        if self.lightbox.is_open() {
            return;
        }

        let transition = self.sort_menu.handle(input);
        if let Some(key) = transition.selected {
            info!(sort = %key, "Sort order changed");
        }
        match transition.focus {
            Some(DropdownFocus::Trigger) => self.focus = FocusTarget::SortTrigger,
            Some(DropdownFocus::Option(index)) => self.focus = FocusTarget::SortOption(index),
            Some(DropdownFocus::Release) => self.focus = FocusTarget::Page,
            None => {}
        }
    }

    /// Choose `key` through the sort menu, the way a pointer user would.
    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort_key() == key {
            return;
        }
        self.sort_input(DropdownInput::TriggerClick);
        let index = self
            .sort_menu
            .menu_options()
            .iter()
            .position(|o| o.value == key);
        match index {
            Some(index) => self.sort_input(DropdownInput::OptionClick(index)),
            None => self.sort_input(DropdownInput::ClickOutside),
        }
    }

    /// Open the viewer on `media_id` within the current order.
    ///
    /// Refused for unknown ids and for items whose asset is missing. Returns
    /// whether the viewer opened.
    pub fn open_viewer(&mut self, media_id: MediaId) -> bool {
        let snapshot = self.sorted();
        match snapshot.iter().find(|m| m.id == media_id) {
            Some(item) if item.asset_file().is_some() => {}
            _ => {
                debug!(media_id, "Viewer not opened");
                return false;
            }
        }

        if self.sort_menu.is_open() {
            self.sort_menu.handle(DropdownInput::ClickOutside);
        }

        let effect = self.lightbox.open(snapshot, media_id, Some(self.focus));
        let opened = effect != LightboxEffect::None;
        self.apply_viewer_effect(effect);
        opened
    }

    pub fn viewer_input(&mut self, input: LightboxInput) {
        let effect = self.lightbox.handle(input);
        self.apply_viewer_effect(effect);
    }

    pub fn viewer(&self) -> Option<LightboxView> {
        self.lightbox.view(&self.assets)
    }

    /// Dispatch a key press from the element that currently has focus.
    pub fn handle_key(&mut self, key: Key) -> KeyResult {
        let origin = match self.focus {
            FocusTarget::SortTrigger => KeyOrigin::SortTrigger,
            FocusTarget::SortOption(_) => KeyOrigin::SortMenu,
            _ => KeyOrigin::Elsewhere,
        };

        match route(origin, self.lightbox.is_open(), self.sort_menu.is_open()) {
            Surface::Viewer => {
                self.viewer_input(LightboxInput::Key(key));
                KeyResult::Handled
            }
            Surface::SortTrigger => {
                self.sort_input(DropdownInput::TriggerKey(key));
                KeyResult::Handled
            }
            Surface::SortMenu => {
                self.sort_input(DropdownInput::MenuKey(key));
                KeyResult::Handled
            }
            Surface::Unhandled => self.activate_focused(key),
        }
    }

    /// Enter / Space on a plain button activates it.
    fn activate_focused(&mut self, key: Key) -> KeyResult {
        if !matches!(key, Key::Enter | Key::Space) {
            return KeyResult::Unhandled;
        }
        let focus = self.focus;
        match focus {
            FocusTarget::Card(id) if self.open_viewer(id) => KeyResult::Handled,
            FocusTarget::LikeButton(id) if !self.likes.is_pending(id) => KeyResult::ToggleLike(id),
            _ => KeyResult::Unhandled,
        }
    }

    fn apply_viewer_effect(&mut self, effect: LightboxEffect<FocusTarget>) {
        match effect {
            LightboxEffect::FocusClose => self.focus = FocusTarget::ViewerClose,
            LightboxEffect::Closed { restore } => {
                self.focus = restore.unwrap_or(FocusTarget::Page);
            }
            LightboxEffect::Moved { .. } | LightboxEffect::None => {}
        }
    }
}
