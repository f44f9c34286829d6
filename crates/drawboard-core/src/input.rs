//! Pointer and keyboard input as delivered by the host, plus shortcut resolution.

use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// One pointer sample in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub position: Point,
    /// Pen pressure in `[0, 1]`, when the device reports it.
    pub pressure: Option<f64>,
    pub modifiers: Modifiers,
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
}

impl PointerInput {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pressure: None,
            modifiers: Modifiers::NONE,
            time_ms: 0.0,
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at_time(mut self, time_ms: f64) -> Self {
        self.time_ms = time_ms;
        self
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Enter,
    Escape,
    Backspace,
    Delete,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Character(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Character(c), Modifiers::CTRL)
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    Cancel,
    BringToFront,
    BringForward,
    SendBackward,
    SendToBack,
    SetTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub action: EditorAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: Key, ctrl: bool, shift: bool, action: EditorAction, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Character(c) => c.to_ascii_uppercase().to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
        });
        parts.join("+")
    }

    fn matches(&self, input: &KeyInput) -> bool {
        let key_matches = match (self.key, input.key) {
            (Key::Character(a), Key::Character(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_matches && self.ctrl == input.modifiers.command() && self.shift == input.modifiers.shift
    }
}

/// All command shortcuts. Tool hotkeys are resolved separately from [`ToolKind::hotkey`].
pub fn shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new(Key::Character('a'), true, false, EditorAction::SelectAll, "Select all elements"),
        Shortcut::new(Key::Character('z'), true, false, EditorAction::Undo, "Undo"),
        Shortcut::new(Key::Character('z'), true, true, EditorAction::Redo, "Redo"),
        Shortcut::new(Key::Character('y'), true, false, EditorAction::Redo, "Redo"),
        Shortcut::new(Key::Character('c'), true, false, EditorAction::Copy, "Copy elements"),
        Shortcut::new(Key::Character('x'), true, false, EditorAction::Cut, "Cut elements"),
        Shortcut::new(Key::Character('v'), true, false, EditorAction::Paste, "Paste elements"),
        Shortcut::new(Key::Character('d'), true, false, EditorAction::Duplicate, "Duplicate elements"),
        Shortcut::new(Key::Delete, false, false, EditorAction::Delete, "Delete selected elements"),
        Shortcut::new(Key::Backspace, false, false, EditorAction::Delete, "Delete selected elements"),
        Shortcut::new(Key::Escape, false, false, EditorAction::Cancel, "Cancel current action"),
        Shortcut::new(Key::Character(']'), true, true, EditorAction::BringToFront, "Bring to front"),
        Shortcut::new(Key::Character(']'), true, false, EditorAction::BringForward, "Bring forward"),
        Shortcut::new(Key::Character('['), true, false, EditorAction::SendBackward, "Send backward"),
        Shortcut::new(Key::Character('['), true, true, EditorAction::SendToBack, "Send to back"),
    ]
}

/// Map a key press to an editor action, if any.
pub fn resolve_shortcut(input: &KeyInput) -> Option<EditorAction> {
    if let Some(shortcut) = shortcuts().into_iter().find(|s| s.matches(input)) {
        return Some(shortcut.action);
    }
    match input.key {
        Key::Character(c) if !input.modifiers.command() && !input.modifiers.alt => {
            ToolKind::from_hotkey(c).map(EditorAction::SetTool)
        }
        _ => None,
    }
}
