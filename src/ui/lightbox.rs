//! Modal media viewer.
//!
//! The viewer browses a snapshot of the gallery taken when it opens, so a
//! re-sort or a like landing while it is open never moves what is on screen.
//! Navigation wraps around in both directions.
//!
//! Focus is owned by the state machine: opening moves focus to the close
//! control, any focus that lands outside the viewer is sent back there, and
//! closing hands focus back to whatever held it before. `F` is the caller's
//! handle for "an element that can take focus".

use tracing::debug;

use super::keybindings::Key;
use crate::models::{AssetRoot, MediaId, MediaItem};

/// Message shown in place of media whose filename is blank.
pub const MEDIA_NOT_FOUND: &str = "Média introuvable (nom de fichier manquant ou incorrect).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRegion {
    /// The dimmed area around the media frame.
    Backdrop,
    /// Anything inside the media frame.
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxInput {
    Key(Key),
    NextClick,
    PrevClick,
    CloseClick,
    PointerDown(PointerRegion),
    /// Focus moved to a new element; `inside` tells whether it is part of the
    /// viewer.
    FocusIn { inside: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightboxEffect<F> {
    None,
    /// Move focus to the viewer's close control.
    FocusClose,
    /// The current item changed.
    Moved { index: usize },
    /// The viewer closed; give focus back to `restore` when present.
    Closed { restore: Option<F> },
}

#[derive(Debug, Clone)]
struct OpenViewer<F> {
    snapshot: Vec<MediaItem>,
    index: usize,
    restore: Option<F>,
}

#[derive(Debug, Clone)]
enum LightboxState<F> {
    Closed,
    Open(OpenViewer<F>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaView {
    Image { src: String, alt: String },
    Video { src: String },
    /// The item's filename is blank.
    NotFound,
}

/// Everything needed to render the open viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxView {
    pub media_id: MediaId,
    pub caption: String,
    pub media: MediaView,
    pub index: usize,
    pub len: usize,
    /// Prev/next controls are enabled.
    pub can_navigate: bool,
}

#[derive(Debug, Clone)]
pub struct Lightbox<F> {
    state: LightboxState<F>,
}

impl<F: Clone> Lightbox<F> {
    pub fn new() -> Self {
        Self {
            state: LightboxState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open(_))
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.viewer().map(|v| v.index)
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&MediaItem> {
        self.viewer().map(|v| &v.snapshot[v.index])
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<&[MediaItem]> {
        self.viewer().map(|v| v.snapshot.as_slice())
    }

    /// Open on `items`, starting at `target`'s position (or the first item
    /// when it is absent). `opener` is the element focused before opening.
    ///
    /// Opening an empty list or opening while already open does nothing.
    pub fn open(&mut self, items: Vec<MediaItem>, target: MediaId, opener: Option<F>) -> LightboxEffect<F> {
        if self.is_open() || items.is_empty() {
            return LightboxEffect::None;
        }

        let index = items.iter().position(|m| m.id == target).unwrap_or(0);
        debug!(target, index, len = items.len(), "Opening lightbox");
        self.state = LightboxState::Open(OpenViewer {
            snapshot: items,
            index,
            restore: opener,
        });
        LightboxEffect::FocusClose
    }

    pub fn next(&mut self) -> LightboxEffect<F> {
        self.step(1)
    }

    pub fn prev(&mut self) -> LightboxEffect<F> {
        self.step(-1)
    }

    pub fn close(&mut self) -> LightboxEffect<F> {
        match std::mem::replace(&mut self.state, LightboxState::Closed) {
            LightboxState::Open(viewer) => {
                debug!("Closing lightbox");
                LightboxEffect::Closed {
                    restore: viewer.restore,
                }
            }
            LightboxState::Closed => LightboxEffect::None,
        }
    }

    pub fn handle(&mut self, input: LightboxInput) -> LightboxEffect<F> {
        if !self.is_open() {
            return LightboxEffect::None;
        }

        match input {
            LightboxInput::Key(Key::Escape) | LightboxInput::CloseClick => self.close(),
            LightboxInput::PointerDown(PointerRegion::Backdrop) => self.close(),
            LightboxInput::Key(Key::ArrowRight) | LightboxInput::NextClick => self.next(),
            LightboxInput::Key(Key::ArrowLeft) | LightboxInput::PrevClick => self.prev(),
            LightboxInput::FocusIn { inside: false } => LightboxEffect::FocusClose,
            _ => LightboxEffect::None,
        }
    }

    /// Render data for the current item, or `None` while closed.
    ///
    /// A blank filename yields [`MediaView::NotFound`]; an empty source is
    /// never handed to the renderer.
    pub fn view(&self, assets: &AssetRoot) -> Option<LightboxView> {
        let viewer = self.viewer()?;
        let item = &viewer.snapshot[viewer.index];

        let media = match assets.resolve(item) {
            None => MediaView::NotFound,
            Some(src) if item.is_video() => MediaView::Video { src },
            Some(src) => MediaView::Image {
                src,
                alt: item.title.clone(),
            },
        };

        Some(LightboxView {
            media_id: item.id,
            caption: item.title.clone(),
            media,
            index: viewer.index,
            len: viewer.snapshot.len(),
            can_navigate: viewer.snapshot.len() > 1,
        })
    }

    fn viewer(&self) -> Option<&OpenViewer<F>> {
        match &self.state {
            LightboxState::Open(viewer) => Some(viewer),
            LightboxState::Closed => None,
        }
    }

    fn step(&mut self, offset: isize) -> LightboxEffect<F> {
        let LightboxState::Open(viewer) = &mut self.state else {
            return LightboxEffect::None;
        };

        let len = viewer.snapshot.len();
        if len <= 1 {
            return LightboxEffect::None;
        }

        viewer.index = if offset >= 0 {
            (viewer.index + 1) % len
        } else {
            (viewer.index + len - 1) % len
        };
        LightboxEffect::Moved {
            index: viewer.index,
        }
    }
}

impl<F: Clone> Default for Lightbox<F> {
    fn default() -> Self {
        Self::new()
    }
}
