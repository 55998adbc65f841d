//! Key bindings and mouse tracking.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to an app action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P' | ' ') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        _ => Action::None,
    }
}

/// Left-button state folded from terminal mouse events between two ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseSample {
    /// Terminal cell (column, row) last reported.
    pub cell: Option<(u16, u16)>,
    pub pressed: bool,
    pub held: bool,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    cell: Option<(u16, u16)>,
    held: bool,
    pressed: bool,
    dragged: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse(&mut self, event: MouseEvent) {
        self.cell = Some((event.column, event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = true;
                self.held = true;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.held = true;
                self.dragged = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.held = false,
            _ => {}
        }
    }

    /// Terminal lost focus or was resized: drop any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// State for the next tick. A drag that ended within the same frame still counts as held.
    pub fn take(&mut self) -> MouseSample {
        let sample = MouseSample {
            cell: self.cell,
            pressed: self.pressed,
            held: self.held || self.dragged,
        };
        self.pressed = false;
        self.dragged = false;
        sample
    }
}
