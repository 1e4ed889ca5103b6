#![forbid(unsafe_code)]

//! Input events as the form sees them.
//!
//! Widgets take [`Event`] rather than crossterm's types, so every form test
//! can build its input by hand. Mouse input and keys the form never binds
//! (F-keys, media keys, lock keys) are dropped during conversion.

use bitflags::bitflags;
use crossterm::event as cte;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Bracketed paste, delivered whole.
    Paste(String),
    /// `true` when the terminal window gains focus.
    Focus(bool),
}

impl Event {
    /// Convert a crossterm event. `None` when the form has no use for it.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        Some(match event {
            cte::Event::Key(key) => Event::Key(KeyEvent::from_crossterm(key)?),
            cte::Event::Resize(width, height) => Event::Resize { width, height },
            cte::Event::Paste(text) => Event::Paste(text),
            cte::Event::FocusGained => Event::Focus(true),
            cte::Event::FocusLost => Event::Focus(false),
            cte::Event::Mouse(_) => return None,
        })
    }

    /// The key, unless this is a key release.
    #[must_use]
    pub fn pressed_key(&self) -> Option<&KeyEvent> {
        match self {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(key),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Event::Key(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain press of `code`.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    fn from_crossterm(key: cte::KeyEvent) -> Option<Self> {
        Some(Self {
            code: KeyCode::from_crossterm(key.code)?,
            modifiers: Modifiers::from_crossterm(key.modifiers),
            kind: match key.kind {
                cte::KeyEventKind::Press => KeyEventKind::Press,
                cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
                cte::KeyEventKind::Release => KeyEventKind::Release,
            },
        })
    }

    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Keys the form binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    /// Shift+Tab.
    BackTab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    fn from_crossterm(code: cte::KeyCode) -> Option<Self> {
        Some(match code {
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            cte::KeyCode::Enter => KeyCode::Enter,
            cte::KeyCode::Esc => KeyCode::Escape,
            cte::KeyCode::Backspace => KeyCode::Backspace,
            cte::KeyCode::Delete => KeyCode::Delete,
            cte::KeyCode::Tab => KeyCode::Tab,
            cte::KeyCode::BackTab => KeyCode::BackTab,
            cte::KeyCode::Home => KeyCode::Home,
            cte::KeyCode::End => KeyCode::End,
            cte::KeyCode::PageUp => KeyCode::PageUp,
            cte::KeyCode::PageDown => KeyCode::PageDown,
            cte::KeyCode::Up => KeyCode::Up,
            cte::KeyCode::Down => KeyCode::Down,
            cte::KeyCode::Left => KeyCode::Left,
            cte::KeyCode::Right => KeyCode::Right,
            _ => return None,
        })
    }
}

/// Press, auto-repeat, or release. Terminals without the kitty keyboard
/// protocol only report presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const SHIFT = 1 << 0;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
        /// Super, Hyper and Meta all land here.
        const SUPER = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    const CROSSTERM: [(cte::KeyModifiers, Modifiers); 6] = [
        (cte::KeyModifiers::SHIFT, Modifiers::SHIFT),
        (cte::KeyModifiers::ALT, Modifiers::ALT),
        (cte::KeyModifiers::CONTROL, Modifiers::CTRL),
        (cte::KeyModifiers::SUPER, Modifiers::SUPER),
        (cte::KeyModifiers::HYPER, Modifiers::SUPER),
        (cte::KeyModifiers::META, Modifiers::SUPER),
    ];

    fn from_crossterm(modifiers: cte::KeyModifiers) -> Self {
        Self::CROSSTERM
            .iter()
            .filter(|(ct, _)| modifiers.contains(*ct))
            .fold(Modifiers::NONE, |acc, (_, m)| acc | *m)
    }
}
