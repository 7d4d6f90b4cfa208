//! Accessibility Coordinator: live-region announcements, focus tracking and
//! keyboard navigation across cards, ARIA upkeep over the projection, and
//! user media preferences.
//!
//! It reads card state through [`CardCoordinator`] accessors and changes it
//! only through the coordinator's own operations.

pub mod announcer;
pub mod attributes;
pub mod focus;
pub mod labels;
pub mod media;

use std::collections::BTreeSet;

pub use announcer::{LiveRegion, Politeness};
pub use focus::{Direction, FocusTarget, FocusTracker};
pub use media::{MediaFeature, MediaPreferences};

use crate::Result;
use crate::cards::{CardCoordinator, CardKey};
use crate::dom::Element;
use crate::page::{Effect, Host, Outbox};

#[derive(Debug, Clone, Default)]
pub struct AccessibilityCoordinator {
    live: LiveRegion,
    focus: FocusTracker,
    media: MediaPreferences,
    /// Ids of open modal dialogs
    dialogs: BTreeSet<String>,
}

impl AccessibilityCoordinator {
    pub fn new(media: MediaPreferences) -> Self {
        Self {
            media,
            ..Default::default()
        }
    }

    pub fn live(&self) -> &LiveRegion {
        &self.live
    }

    pub(crate) fn live_mut(&mut self) -> &mut LiveRegion {
        &mut self.live
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn focused_card(&self) -> Option<CardKey> {
        self.focus.focused_card()
    }

    pub fn media(&self) -> MediaPreferences {
        self.media
    }

    pub fn dialogs(&self) -> impl Iterator<Item = &str> {
        self.dialogs.iter().map(String::as_str)
    }

    /// The host reports focus moving to `target`. Focus on a card that is
    /// not in the grid is a `CardNotFound` error and changes nothing.
    pub fn on_focus_in(
        &mut self,
        target: FocusTarget,
        cards: &CardCoordinator,
        out: &mut Outbox,
    ) -> Result<()> {
        if let FocusTarget::Card(key) = target {
            let card = cards.card(key)?;
            if !self.focus.focus_in(target) {
                return Ok(());
            }
            let content = &card.content;
            out.announce(labels::focus_announcement(
                &content.title,
                content.status.label(),
                &content.description,
            ));
        } else {
            self.focus.focus_in(target);
        }
        Ok(())
    }

    pub fn on_focus_out(&mut self, target: &FocusTarget) {
        self.focus.focus_out(target);
    }

    /// Move focus to the next or previous visible card, wrapping around.
    pub fn navigate(
        &mut self,
        direction: Direction,
        cards: &CardCoordinator,
        out: &mut Outbox,
    ) -> Option<CardKey> {
        let order = cards.grid().visible_keys();
        let next = focus::cycle(&order, self.focus.focused_card(), direction)?;
        self.focus.focus_in(FocusTarget::Card(next));
        out.push(Effect::Focus {
            target: FocusTarget::Card(next),
        });
        if let Ok(card) = cards.card(next) {
            out.announce(format!("Navigated to {}", card.content.title));
        }
        Some(next)
    }

    /// Enter/Space on a card: the same toggle a click performs.
    pub fn activate(
        &mut self,
        key: CardKey,
        cards: &mut CardCoordinator,
        host: &dyn Host,
        out: &mut Outbox,
    ) -> Result<bool> {
        let expanded = cards.toggle_expansion(key, host, out)?;
        out.announce(if expanded { "Card expanded" } else { "Card collapsed" });
        Ok(expanded)
    }

    pub fn focus_search(&mut self, out: &mut Outbox) {
        self.focus.focus_in(FocusTarget::Search);
        out.push(Effect::Focus {
            target: FocusTarget::Search,
        });
        out.announce("Search focused");
    }

    pub fn focus_first_interactive(&mut self, out: &mut Outbox) {
        out.push(Effect::Focus {
            target: FocusTarget::FirstInteractive,
        });
    }

    /// A media query changed. Returns whether the preference flipped.
    pub fn set_media(&mut self, feature: MediaFeature, matches: bool, out: &mut Outbox) -> bool {
        if !self.media.set(feature, matches) {
            return false;
        }
        tracing::debug!(?feature, matches, "media preference changed");
        out.push(Effect::DocumentClass {
            class: feature.class().to_string(),
            enabled: matches,
        });
        true
    }

    pub fn open_dialog(&mut self, id: impl Into<String>) {
        self.dialogs.insert(id.into());
    }

    /// Close every open dialog. Returns how many were open.
    pub fn close_all_dialogs(&mut self, out: &mut Outbox) -> usize {
        let dialogs = std::mem::take(&mut self.dialogs);
        let count = dialogs.len();
        for id in dialogs {
            out.push(Effect::DialogClosed { id });
        }
        count
    }

    /// A card left the grid; drop focus if it had it.
    pub fn forget_card(&mut self, key: CardKey) {
        if self.focus.focused_card() == Some(key) {
            self.focus.clear();
        }
    }

    /// Apply ARIA upkeep to a freshly projected tree.
    pub fn decorate(&self, root: &mut Element) {
        attributes::decorate(root);
    }
}
