// Keybindings for the folio gallery
// Parses key names and decides which surface a key press belongs to
//
// Keybindings:
// - Viewer open: Escape closes, ArrowLeft / ArrowRight browse (window-wide)
// - Sort trigger: Enter / Space toggle the menu, ArrowDown opens it
// - Sort menu: ArrowUp / ArrowDown / Home / End move, Enter / Space select,
//   Escape closes, Tab closes and lets focus move on

/// Keys the gallery reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Other,
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowDown"`, `" "`, `"Escape"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" | "Return" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            _ => Self::Other,
        }
    }
}

/// Where keyboard focus was when a key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    SortTrigger,
    SortMenu,
    Elsewhere,
}

/// Surface that handles a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Viewer,
    SortTrigger,
    SortMenu,
    Unhandled,
}

/// Route a key press.
///
/// The viewer is modal: while it is open it takes every key regardless of
/// origin. A key from the menu only reaches the menu while it is open.
pub fn route(origin: KeyOrigin, viewer_open: bool, menu_open: bool) -> Surface {
    if viewer_open {
        return Surface::Viewer;
    }

    match origin {
        KeyOrigin::SortTrigger => Surface::SortTrigger,
        KeyOrigin::SortMenu if menu_open => Surface::SortMenu,
        _ => Surface::Unhandled,
    }
}
