//! Dashboard actions. Actions are the sole mechanism for state mutation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Every state transition in the dashboard is expressed as an Action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectNext,
    SelectPrev,
    Resize(u16, u16),
}

impl Action {
    /// Map a key press to an action. Unbound keys map to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                Some(Self::Quit)
            }
            (_, KeyCode::Down) => Some(Self::SelectNext),
            (_, KeyCode::Up) => Some(Self::SelectPrev),
            _ => None,
        }
    }
}
