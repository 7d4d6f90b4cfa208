//! Key events as the page sees them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0001;
        const ALT = 0b0010;
        const SHIFT = 0b0100;
        const META = 0b1000;
    }
}

/// A key, normalized from DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A printable character; ASCII letters are lower-cased
    Char(char),
    Other(String),
}

impl Key {
    pub fn from_dom(key: &str) -> Key {
        match key {
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Other(key.to_string()),
                }
            }
        }
    }

    pub fn to_dom(&self) -> String {
        match self {
            Key::Enter => "Enter".to_string(),
            Key::Space => " ".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::ArrowUp => "ArrowUp".to_string(),
            Key::ArrowDown => "ArrowDown".to_string(),
            Key::ArrowLeft => "ArrowLeft".to_string(),
            Key::ArrowRight => "ArrowRight".to_string(),
            Key::Char(c) => c.to_string(),
            Key::Other(name) => name.clone(),
        }
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeyEventRepr", into = "KeyEventRepr")]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn ctrl(key: Key) -> Self {
        Self::new(key).with_modifiers(Modifiers::CTRL)
    }
}

/// Wire shape mirroring `KeyboardEvent`: `{"key": "f", "ctrl": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEventRepr {
    pub key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ctrl: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub alt: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shift: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub meta: bool,
}

impl From<KeyEventRepr> for KeyEvent {
    fn from(repr: KeyEventRepr) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::CTRL, repr.ctrl);
        modifiers.set(Modifiers::ALT, repr.alt);
        modifiers.set(Modifiers::SHIFT, repr.shift);
        modifiers.set(Modifiers::META, repr.meta);
        KeyEvent {
            key: Key::from_dom(&repr.key),
            modifiers,
        }
    }
}

impl From<KeyEvent> for KeyEventRepr {
    fn from(event: KeyEvent) -> Self {
        KeyEventRepr {
            key: event.key.to_dom(),
            ctrl: event.modifiers.contains(Modifiers::CTRL),
            alt: event.modifiers.contains(Modifiers::ALT),
            shift: event.modifiers.contains(Modifiers::SHIFT),
            meta: event.modifiers.contains(Modifiers::META),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_names() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("F"), Key::Char('f'));
        assert_eq!(Key::from_dom("/"), Key::Char('/'));
        assert_eq!(Key::from_dom("PageDown"), Key::Other("PageDown".to_string()));
    }

    #[test]
    fn test_key_event_wire_shape() {
        let event: KeyEvent = serde_json::from_str(r#"{"key":"f","ctrl":true}"#).unwrap();
        assert_eq!(event, KeyEvent::ctrl(Key::Char('f')));

        let json = serde_json::to_string(&KeyEvent::new(Key::ArrowDown)).unwrap();
        assert_eq!(json, r#"{"key":"ArrowDown"}"#);
    }
}
