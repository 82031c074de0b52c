//! Interaction state machines for the gallery page.
//!
//! - `AccessibleDropdown` - keyboard-operable single-select menu
//! - `Lightbox` - modal viewer with focus trap and wrap-around browsing
//! - `keybindings` - key parsing and routing to the active surface

pub mod dropdown;
pub mod format;
pub mod keybindings;
pub mod lightbox;

pub use dropdown::*;
pub use format::*;
pub use keybindings::*;
pub use lightbox::*;
