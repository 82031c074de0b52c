//! Keyboard-operable single-select dropdown.
//!
//! The widget is a two-state machine. Every input goes through
//! [`AccessibleDropdown::handle`], which applies the transition and reports
//! where focus must go next, so the caller never has to guess.
//!
//! The menu lists every option except the selected one, and
//! `active` indexes into that filtered list. While the menu is open exactly
//! one option (the active one) is focusable.

use tracing::debug;

use super::keybindings::Key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption<T> {
    pub value: T,
    pub label: String,
}

impl<T> DropdownOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open { active: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownInput {
    /// Pointer activation of the trigger button.
    TriggerClick,
    /// Key pressed while the trigger has focus.
    TriggerKey(Key),
    /// Key pressed while focus is inside the menu.
    MenuKey(Key),
    /// Pointer entered the menu option at this index.
    OptionHover(usize),
    /// Pointer activation of the menu option at this index.
    OptionClick(usize),
    /// Pointer pressed anywhere outside the widget.
    ClickOutside,
}

/// Where focus must move after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownFocus {
    Trigger,
    /// The menu option at this index.
    Option(usize),
    /// Leave focus alone and let it move to the next focusable element.
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownTransition<T> {
    pub focus: Option<DropdownFocus>,
    /// Set when an option was chosen.
    pub selected: Option<T>,
}

impl<T> DropdownTransition<T> {
    fn none() -> Self {
        Self {
            focus: None,
            selected: None,
        }
    }

    fn focus(focus: DropdownFocus) -> Self {
        Self {
            focus: Some(focus),
            selected: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.focus.is_none() && self.selected.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AccessibleDropdown<T> {
    options: Vec<DropdownOption<T>>,
    selected: T,
    state: DropdownState,
}

impl<T: Copy + PartialEq + std::fmt::Debug> AccessibleDropdown<T> {
    pub fn new(options: Vec<DropdownOption<T>>, selected: T) -> Self {
        Self {
            options,
            selected,
            state: DropdownState::Closed,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DropdownState::Open { .. })
    }

    pub fn selected(&self) -> T {
        self.selected
    }

    /// Label shown on the trigger.
    pub fn selected_label(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.value == self.selected)
            .map(|o| o.label.as_str())
            .unwrap_or_default()
    }

    /// Options listed in the menu: everything but the current selection.
    pub fn menu_options(&self) -> Vec<&DropdownOption<T>> {
        self.options
            .iter()
            .filter(|o| o.value != self.selected)
            .collect()
    }

    /// Index of the single focusable option, or `None` while closed.
    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            DropdownState::Open { active } => Some(active),
            DropdownState::Closed => None,
        }
    }

    pub fn handle(&mut self, input: DropdownInput) -> DropdownTransition<T> {
        use DropdownInput::*;
        use DropdownState::*;

        let transition = match (self.state, input) {
            (Closed, TriggerClick)
            | (Closed, TriggerKey(Key::Enter | Key::Space | Key::ArrowDown)) => self.open(),

            (Open { .. }, TriggerClick) | (Open { .. }, TriggerKey(Key::Enter | Key::Space)) => {
                self.close(DropdownFocus::Trigger)
            }

            (Open { .. }, MenuKey(Key::Tab)) => self.close(DropdownFocus::Release),
            (Open { .. }, MenuKey(Key::Escape)) | (Open { .. }, ClickOutside) => {
                self.close(DropdownFocus::Trigger)
            }

            (Open { active }, MenuKey(Key::ArrowDown)) => self.move_active(active.saturating_add(1)),
            (Open { active }, MenuKey(Key::ArrowUp)) => self.move_active(active.saturating_sub(1)),
            (Open { .. }, MenuKey(Key::Home)) => self.move_active(0),
            (Open { .. }, MenuKey(Key::End)) => self.move_active(usize::MAX),
            (Open { active }, MenuKey(Key::Enter | Key::Space)) => self.select(active),

            (Open { .. }, OptionHover(index)) if index < self.menu_len() => self.move_active(index),
            (Open { .. }, OptionClick(index)) if index < self.menu_len() => self.select(index),

            _ => DropdownTransition::none(),
        };

        if !transition.is_noop() {
            debug!(?input, state = ?self.state, "Dropdown transition");
        }
        transition
    }

    fn menu_len(&self) -> usize {
        self.options.iter().filter(|o| o.value != self.selected).count()
    }

    fn open(&mut self) -> DropdownTransition<T> {
        if self.menu_len() == 0 {
            return DropdownTransition::none();
        }
        self.state = DropdownState::Open { active: 0 };
        DropdownTransition::focus(DropdownFocus::Option(0))
    }

    fn close(&mut self, focus: DropdownFocus) -> DropdownTransition<T> {
        self.state = DropdownState::Closed;
        DropdownTransition::focus(focus)
    }

    /// Move the active option, clamped to the menu (no wraparound).
    fn move_active(&mut self, index: usize) -> DropdownTransition<T> {
        let last = self.menu_len().saturating_sub(1);
        let active = index.min(last);
        self.state = DropdownState::Open { active };
        DropdownTransition::focus(DropdownFocus::Option(active))
    }

    fn select(&mut self, index: usize) -> DropdownTransition<T> {
        let Some(value) = self.menu_options().get(index).map(|o| o.value) else {
            return DropdownTransition::none();
        };
        self.selected = value;
        self.state = DropdownState::Closed;
        DropdownTransition {
            focus: Some(DropdownFocus::Trigger),
            selected: Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::SortKey;

    fn sort_dropdown() -> AccessibleDropdown<SortKey> {
        AccessibleDropdown::new(
            SortKey::ALL
                .iter()
                .map(|k| DropdownOption::new(*k, k.label()))
                .collect(),
            SortKey::Popularity,
        )
    }

    fn letters(n: usize) -> AccessibleDropdown<usize> {
        AccessibleDropdown::new(
            (0..n).map(|i| DropdownOption::new(i, format!("opt {}", i))).collect(),
            0,
        )
    }

    #[test]
    fn test_open_focuses_first_option() {
        for input in [
            DropdownInput::TriggerClick,
            DropdownInput::TriggerKey(Key::Enter),
            DropdownInput::TriggerKey(Key::Space),
            DropdownInput::TriggerKey(Key::ArrowDown),
        ] {
            let mut dropdown = sort_dropdown();
            let t = dropdown.handle(input);
            assert_eq!(t.focus, Some(DropdownFocus::Option(0)));
            assert_eq!(dropdown.active_index(), Some(0));
        }
    }

    #[test]
    fn test_menu_excludes_selected() {
        let mut dropdown = sort_dropdown();
        let labels: Vec<&str> = dropdown.menu_options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Date", "Titre"]);
        assert_eq!(dropdown.selected_label(), "Popularité");

        dropdown.handle(DropdownInput::TriggerClick);
        let t = dropdown.handle(DropdownInput::MenuKey(Key::End));
        assert_eq!(t.focus, Some(DropdownFocus::Option(1)));
        let t = dropdown.handle(DropdownInput::MenuKey(Key::Enter));
        assert_eq!(t.selected, Some(SortKey::Title));
        assert_eq!(t.focus, Some(DropdownFocus::Trigger));
        assert!(!dropdown.is_open());

        let values: Vec<SortKey> = dropdown.menu_options().iter().map(|o| o.value).collect();
        assert_eq!(values, vec![SortKey::Popularity, SortKey::Date]);
    }

    #[test]
    fn test_arrows_clamp_without_wrapping() {
        let mut dropdown = letters(5); // menu has 4 entries
        dropdown.handle(DropdownInput::TriggerKey(Key::ArrowDown));

        dropdown.handle(DropdownInput::MenuKey(Key::ArrowUp));
        assert_eq!(dropdown.active_index(), Some(0));

        for _ in 0..10 {
            dropdown.handle(DropdownInput::MenuKey(Key::ArrowDown));
        }
        assert_eq!(dropdown.active_index(), Some(3));

        let t = dropdown.handle(DropdownInput::MenuKey(Key::ArrowDown));
        assert_eq!(t.focus, Some(DropdownFocus::Option(3)));

        dropdown.handle(DropdownInput::MenuKey(Key::Home));
        assert_eq!(dropdown.active_index(), Some(0));
        dropdown.handle(DropdownInput::MenuKey(Key::End));
        assert_eq!(dropdown.active_index(), Some(3));
        dropdown.handle(DropdownInput::MenuKey(Key::ArrowUp));
        assert_eq!(dropdown.active_index(), Some(2));
    }

    #[test]
    fn test_escape_and_click_outside_return_focus() {
        let mut dropdown = sort_dropdown();
        dropdown.handle(DropdownInput::TriggerClick);
        let t = dropdown.handle(DropdownInput::MenuKey(Key::Escape));
        assert_eq!(t.focus, Some(DropdownFocus::Trigger));
        assert_eq!(t.selected, None);
        assert_eq!(dropdown.state(), DropdownState::Closed);

        dropdown.handle(DropdownInput::TriggerClick);
        let t = dropdown.handle(DropdownInput::ClickOutside);
        assert_eq!(t.focus, Some(DropdownFocus::Trigger));
        assert!(!dropdown.is_open());
        assert_eq!(dropdown.selected(), SortKey::Popularity);
    }

    #[test]
    fn test_tab_closes_and_releases_focus() {
        let mut dropdown = sort_dropdown();
        dropdown.handle(DropdownInput::TriggerClick);
        let t = dropdown.handle(DropdownInput::MenuKey(Key::Tab));
        assert_eq!(t.focus, Some(DropdownFocus::Release));
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_trigger_toggles() {
        let mut dropdown = sort_dropdown();
        dropdown.handle(DropdownInput::TriggerKey(Key::Space));
        assert!(dropdown.is_open());

        // ArrowDown on the trigger only opens
        assert!(dropdown.handle(DropdownInput::TriggerKey(Key::ArrowDown)).is_noop());
        assert!(dropdown.is_open());

        let t = dropdown.handle(DropdownInput::TriggerKey(Key::Enter));
        assert_eq!(t.focus, Some(DropdownFocus::Trigger));
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_hover_moves_active_without_closing() {
        let mut dropdown = sort_dropdown();
        dropdown.handle(DropdownInput::TriggerClick);

        let t = dropdown.handle(DropdownInput::OptionHover(1));
        assert_eq!(t.focus, Some(DropdownFocus::Option(1)));
        assert!(dropdown.is_open());

        // Out-of-range pointer events are ignored
        assert!(dropdown.handle(DropdownInput::OptionHover(5)).is_noop());
        assert!(dropdown.handle(DropdownInput::OptionClick(5)).is_noop());
        assert_eq!(dropdown.active_index(), Some(1));

        let t = dropdown.handle(DropdownInput::OptionClick(0));
        assert_eq!(t.selected, Some(SortKey::Date));
        assert_eq!(dropdown.selected(), SortKey::Date);
    }

    #[test]
    fn test_menu_inputs_ignored_while_closed() {
        let mut dropdown = sort_dropdown();
        for input in [
            DropdownInput::MenuKey(Key::ArrowDown),
            DropdownInput::MenuKey(Key::Enter),
            DropdownInput::OptionClick(0),
            DropdownInput::OptionHover(0),
            DropdownInput::ClickOutside,
            DropdownInput::TriggerKey(Key::Escape),
        ] {
            assert!(dropdown.handle(input).is_noop());
            assert!(!dropdown.is_open());
        }
    }

    #[test]
    fn test_single_option_never_opens() {
        let mut dropdown = letters(1);
        assert!(dropdown.handle(DropdownInput::TriggerClick).is_noop());
        assert!(!dropdown.is_open());
    }
}
