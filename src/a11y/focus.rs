//! Focus tracking and circular card navigation.

use serde::{Deserialize, Serialize};

use crate::cards::CardKey;

/// Something that can hold keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FocusTarget {
    Card(CardKey),
    /// The search input
    Search,
    /// Any other control, by element id
    Control(String),
    /// Whatever the host considers the first interactive element
    FirstInteractive,
}

impl FocusTarget {
    pub fn card(&self) -> Option<CardKey> {
        match self {
            FocusTarget::Card(key) => Some(*key),
            _ => None,
        }
    }

    /// Text-entry or select controls, where typed keys belong to the control.
    pub fn is_editing(&self) -> bool {
        matches!(self, FocusTarget::Search | FocusTarget::Control(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Step through `order` from `current`, wrapping at both ends.
///
/// With no current card (or one not in `order`) `Next` lands on the first
/// card and `Previous` on the last.
pub fn cycle(order: &[CardKey], current: Option<CardKey>, direction: Direction) -> Option<CardKey> {
    let len = order.len();
    if len == 0 {
        return None;
    }
    let index = current.and_then(|key| order.iter().position(|k| *k == key));
    let next = match (index, direction) {
        (None, Direction::Next) => 0,
        (None, Direction::Previous) => len - 1,
        (Some(i), Direction::Next) => (i + 1) % len,
        (Some(i), Direction::Previous) => (i + len - 1) % len,
    };
    Some(order[next])
}

/// Which element currently has focus, as reported by the host.
#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    current: Option<FocusTarget>,
}

impl FocusTracker {
    pub fn current(&self) -> Option<&FocusTarget> {
        self.current.as_ref()
    }

    pub fn focused_card(&self) -> Option<CardKey> {
        self.current.as_ref().and_then(FocusTarget::card)
    }

    /// Record focus moving to `target`. Returns false if it already had it.
    pub fn focus_in(&mut self, target: FocusTarget) -> bool {
        if self.current.as_ref() == Some(&target) {
            return false;
        }
        self.current = Some(target);
        true
    }

    /// Record `target` losing focus. Ignored if something else has focus.
    pub fn focus_out(&mut self, target: &FocusTarget) -> bool {
        if self.current.as_ref() == Some(target) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
