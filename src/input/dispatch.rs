//! The page's single key dispatch table.
//!
//! Bindings are checked in order and the first match wins, so each key
//! event resolves to at most one command.

use serde::Serialize;

use crate::a11y::FocusTarget;

use super::keys::{Key, KeyEvent, Modifiers};

/// What a key binding does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Leave selection mode, collapse all cards, close menus and dialogs
    Dismiss,
    /// Toggle expansion of the focused card
    ActivateCard,
    FocusNext,
    FocusPrevious,
    /// Toggle favorite on the focused card
    ToggleFavorite,
    ToggleSelectionMode,
    FocusSearch,
    FocusFirstInteractive,
}

/// Focus condition a binding needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    /// A card has focus
    CardFocused,
    /// Nothing has focus
    NothingFocused,
    /// Focus is not in a text-entry or select control
    NotEditing,
}

/// Snapshot of focus used to resolve scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    pub card_focused: bool,
    pub nothing_focused: bool,
    pub editing: bool,
}

impl FocusContext {
    pub fn from_focus(current: Option<&FocusTarget>) -> Self {
        match current {
            None => Self {
                nothing_focused: true,
                ..Default::default()
            },
            Some(target) => Self {
                card_focused: target.card().is_some(),
                nothing_focused: false,
                editing: target.is_editing(),
            },
        }
    }

    fn satisfies(&self, scope: Scope) -> bool {
        match scope {
            Scope::Global => true,
            Scope::CardFocused => self.card_focused,
            Scope::NothingFocused => self.nothing_focused,
            Scope::NotEditing => !self.editing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    /// Modifiers that must all be held
    pub required: Modifiers,
    /// Modifiers that must not be held
    pub forbidden: Modifiers,
    pub scope: Scope,
    pub command: Command,
    /// Suppress the browser's default action when this binding fires
    pub prevent_default: bool,
}

impl Binding {
    pub fn new(key: Key, command: Command) -> Self {
        Self {
            key,
            required: Modifiers::empty(),
            forbidden: Modifiers::empty(),
            scope: Scope::Global,
            command,
            prevent_default: false,
        }
    }

    pub fn requires(mut self, modifiers: Modifiers) -> Self {
        self.required = modifiers;
        self
    }

    pub fn forbids(mut self, modifiers: Modifiers) -> Self {
        self.forbidden = modifiers;
        self
    }

    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    pub fn matches(&self, event: &KeyEvent, ctx: &FocusContext) -> bool {
        self.key == event.key
            && event.modifiers.contains(self.required)
            && !event.modifiers.intersects(self.forbidden)
            && ctx.satisfies(self.scope)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bind(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// First binding matching the event, if any.
    pub fn resolve(&self, event: &KeyEvent, ctx: &FocusContext) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.matches(event, ctx))
    }

    /// The page's bindings.
    pub fn page_default() -> Self {
        let chord = Modifiers::CTRL | Modifiers::ALT | Modifiers::META;
        Self::empty()
            .bind(Binding::new(Key::Escape, Command::Dismiss))
            .bind(
                Binding::new(Key::Enter, Command::ActivateCard)
                    .forbids(chord)
                    .in_scope(Scope::CardFocused)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::Space, Command::ActivateCard)
                    .forbids(chord)
                    .in_scope(Scope::CardFocused)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::ArrowDown, Command::FocusNext)
                    .forbids(chord)
                    .in_scope(Scope::NotEditing)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::ArrowUp, Command::FocusPrevious)
                    .forbids(chord)
                    .in_scope(Scope::NotEditing)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::ArrowRight, Command::FocusNext)
                    .forbids(chord)
                    .in_scope(Scope::CardFocused)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::ArrowLeft, Command::FocusPrevious)
                    .forbids(chord)
                    .in_scope(Scope::CardFocused)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::Char('f'), Command::ToggleFavorite)
                    .requires(Modifiers::CTRL)
                    .forbids(Modifiers::SHIFT | Modifiers::ALT)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::Char('s'), Command::ToggleSelectionMode)
                    .requires(Modifiers::CTRL)
                    .forbids(Modifiers::SHIFT | Modifiers::ALT)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::Char('/'), Command::FocusSearch)
                    .forbids(Modifiers::CTRL | Modifiers::ALT)
                    .in_scope(Scope::NotEditing)
                    .prevent_default(),
            )
            .bind(
                Binding::new(Key::Tab, Command::FocusFirstInteractive)
                    .forbids(Modifiers::SHIFT)
                    .in_scope(Scope::NothingFocused)
                    .prevent_default(),
            )
    }
}
