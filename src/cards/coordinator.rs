//! The Card Interaction Coordinator.
//!
//! Owns the grid and the application state. Every operation mutates view
//! state first and reports what the host must do through an [`Outbox`];
//! the element tree is re-projected from that state afterwards.

use serde::{Deserialize, Serialize};

use crate::config::Timings;
use crate::models::{Filter, ProjectStatus, SortKey};
use crate::page::{Effect, Host, NotificationLevel, Outbox, Timer};
use crate::store::ProjectStore;
use crate::{Error, Result};

use super::grid::CardGrid;
use super::state::{AppState, Card, CardKey, Motion, Summary};

/// Entries of a card's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuAction {
    Edit,
    Duplicate,
    Archive,
    Delete,
}

impl MenuAction {
    pub fn all() -> &'static [MenuAction] {
        &[
            MenuAction::Edit,
            MenuAction::Duplicate,
            MenuAction::Archive,
            MenuAction::Delete,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuAction::Edit => "edit",
            MenuAction::Duplicate => "duplicate",
            MenuAction::Archive => "archive",
            MenuAction::Delete => "delete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Edit => "Edit",
            MenuAction::Duplicate => "Duplicate",
            MenuAction::Archive => "Archive",
            MenuAction::Delete => "Delete",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MenuAction::Edit => "fas fa-edit",
            MenuAction::Duplicate => "fas fa-copy",
            MenuAction::Archive => "fas fa-archive",
            MenuAction::Delete => "fas fa-trash",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardCoordinator {
    grid: CardGrid,
    state: AppState,
    timings: Timings,
    reduced_motion: bool,
}

impl CardCoordinator {
    /// Build one card per project and schedule the staggered entrance.
    pub fn new(store: &ProjectStore, timings: Timings, reduced_motion: bool, out: &mut Outbox) -> Self {
        let mut coordinator = Self {
            grid: CardGrid::from_projects(store.projects()),
            state: AppState::default(),
            timings,
            reduced_motion,
        };
        coordinator.stagger_entrance(out);
        coordinator
    }

    fn stagger_entrance(&mut self, out: &mut Outbox) {
        if self.reduced_motion {
            return;
        }
        let stagger = self.timings.stagger_ms;
        for (index, card) in self.grid.iter_mut().enumerate() {
            card.view.motion = Motion::Entering;
            out.schedule(index as u64 * stagger, Timer::RevealCard { card: card.key });
        }
    }

    pub fn grid(&self) -> &CardGrid {
        &self.grid
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn card(&self, key: CardKey) -> Result<&Card> {
        self.grid.get(key)
    }

    pub fn summary(&self) -> Summary {
        self.grid.summary()
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Expand a card. Scrolls it into view when the host reports that it
    /// sticks out of the viewport.
    pub fn expand(&mut self, key: CardKey, host: &dyn Host, out: &mut Outbox) -> Result<()> {
        let card = self.grid.get_mut(key)?;
        if card.view.expanded {
            return Ok(());
        }
        card.view.expanded = true;
        tracing::debug!(%key, "card expanded");
        if let Some(bounds) = host.card_bounds(key) {
            if bounds.overflows(host.viewport_height()) {
                out.push(Effect::ScrollIntoView { card: key });
            }
        }
        Ok(())
    }

    pub fn collapse(&mut self, key: CardKey) -> Result<()> {
        let card = self.grid.get_mut(key)?;
        if card.view.expanded {
            card.view.expanded = false;
            tracing::debug!(%key, "card collapsed");
        }
        Ok(())
    }

    /// Flip expansion. Returns the new state.
    pub fn toggle_expansion(&mut self, key: CardKey, host: &dyn Host, out: &mut Outbox) -> Result<bool> {
        if self.grid.get(key)?.view.expanded {
            self.collapse(key)?;
            Ok(false)
        } else {
            self.expand(key, host, out)?;
            Ok(true)
        }
    }

    /// Collapse every expanded card. Returns how many were expanded.
    pub fn collapse_all(&mut self) -> usize {
        let mut collapsed = 0;
        for card in self.grid.iter_mut().filter(|c| c.view.expanded) {
            card.view.expanded = false;
            collapsed += 1;
        }
        collapsed
    }

    // ------------------------------------------------------------------
    // Favorites and hover
    // ------------------------------------------------------------------

    /// Flip a card's favorite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, key: CardKey, out: &mut Outbox) -> Result<bool> {
        let card = self.grid.get_mut(key)?;
        card.view.favorite = !card.view.favorite;
        let favorite = card.view.favorite;
        if favorite {
            out.notify(NotificationLevel::Success, "Added to favorites");
        } else {
            out.notify(NotificationLevel::Info, "Removed from favorites");
        }
        Ok(favorite)
    }

    /// Pointer enter/leave. Ignored while selecting.
    pub fn set_hovered(&mut self, key: CardKey, hovered: bool) -> Result<()> {
        let selection_mode = self.state.selection_mode;
        let card = self.grid.get_mut(key)?;
        if !selection_mode {
            card.view.hovered = hovered;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Filtering and sorting
    // ------------------------------------------------------------------

    pub fn set_category_filter(&mut self, category: Filter<String>, out: &mut Outbox) -> Summary {
        out.announce(format!("Filter changed to category: {}", category));
        self.state.filters.category = category;
        self.apply_filters(out)
    }

    pub fn set_status_filter(&mut self, status: Filter<ProjectStatus>, out: &mut Outbox) -> Summary {
        out.announce(format!("Filter changed to status: {}", status));
        self.state.filters.status = status;
        self.apply_filters(out)
    }

    pub fn set_search(&mut self, text: &str, out: &mut Outbox) -> Summary {
        self.state.filters.search = text.to_lowercase();
        self.apply_filters(out)
    }

    /// Re-test every card against the current filters and recompute the
    /// summary. Newly matching cards fade in; the rest hide immediately.
    pub fn apply_filters(&mut self, out: &mut Outbox) -> Summary {
        let fade_in = self.timings.fade_in_ms;
        let reduced_motion = self.reduced_motion;
        for card in self.grid.iter_mut().filter(|c| !c.view.is_leaving()) {
            let matches = self.state.filters.matches(&card.content);
            if matches && !card.view.visible {
                card.view.visible = true;
                if reduced_motion {
                    card.view.motion = Motion::Idle;
                } else {
                    card.view.motion = Motion::Entering;
                    out.schedule(fade_in, Timer::RevealCard { card: card.key });
                }
            } else if !matches {
                card.view.visible = false;
                card.view.motion = Motion::Idle;
            }
        }
        let summary = self.grid.summary();
        tracing::debug!(visible = summary.visible, "filters applied");
        out.push(Effect::SummaryUpdated { summary });
        summary
    }

    pub fn set_sort(&mut self, sort: SortKey, out: &mut Outbox) {
        self.apply_sort(sort, out);
        out.announce(format!("Sorting by {}", sort));
    }

    /// Reorder the grid without announcing it.
    pub fn apply_sort(&mut self, sort: SortKey, out: &mut Outbox) {
        self.state.sort = sort;
        self.grid.sort(sort);
        out.push(Effect::GridReordered {
            order: self.grid.keys(),
        });
    }

    // ------------------------------------------------------------------
    // Selection mode
    // ------------------------------------------------------------------

    pub fn toggle_selection_mode(&mut self, out: &mut Outbox) -> bool {
        if self.state.selection_mode {
            self.exit_selection_mode(out);
        } else {
            self.enter_selection_mode(out);
        }
        self.state.selection_mode
    }

    pub fn enter_selection_mode(&mut self, out: &mut Outbox) {
        if self.state.selection_mode {
            return;
        }
        self.state.selection_mode = true;
        self.state.selected.clear();
        for card in self.grid.iter_mut() {
            card.view.hovered = false;
        }
        tracing::debug!("selection mode on");
        self.selection_changed(out);
    }

    /// Leave selection mode, dropping the selection. Returns false if it
    /// was not active.
    pub fn exit_selection_mode(&mut self, out: &mut Outbox) -> bool {
        if !self.state.selection_mode {
            return false;
        }
        self.state.selection_mode = false;
        self.state.selected.clear();
        tracing::debug!("selection mode off");
        self.selection_changed(out);
        true
    }

    fn selection_changed(&self, out: &mut Outbox) {
        out.push(Effect::SelectionChanged {
            mode: self.state.selection_mode,
            count: self.state.selection_count(),
        });
    }

    fn announce_selection(&self, out: &mut Outbox) {
        out.announce(format!("{} projects selected", self.state.selection_count()));
    }

    pub(crate) fn require_selection_mode(&self) -> Result<()> {
        if self.state.selection_mode {
            Ok(())
        } else {
            tracing::warn!("selection change outside selection mode");
            Err(Error::InvalidInput("selection mode is not active".to_string()))
        }
    }

    /// Checkbox change. Returns the selection count.
    pub fn set_selected(&mut self, key: CardKey, checked: bool, out: &mut Outbox) -> Result<usize> {
        self.require_selection_mode()?;
        if self.grid.get(key)?.view.is_leaving() {
            return Ok(self.state.selection_count());
        }
        if checked {
            self.state.selected.insert(key);
        } else {
            self.state.selected.remove(&key);
        }
        self.selection_changed(out);
        self.announce_selection(out);
        Ok(self.state.selection_count())
    }

    pub fn select_all(&mut self, out: &mut Outbox) -> Result<usize> {
        self.require_selection_mode()?;
        self.state.selected = self
            .grid
            .iter()
            .filter(|c| !c.view.is_leaving())
            .map(|c| c.key)
            .collect();
        self.selection_changed(out);
        self.announce_selection(out);
        Ok(self.state.selection_count())
    }

    pub fn deselect_all(&mut self, out: &mut Outbox) -> Result<()> {
        self.require_selection_mode()?;
        self.state.selected.clear();
        self.selection_changed(out);
        self.announce_selection(out);
        Ok(())
    }

    /// Delete every selected card after confirmation. Returns how many
    /// cards started leaving; zero when nothing was selected or the user
    /// cancelled.
    pub fn delete_selected(&mut self, host: &mut dyn Host, out: &mut Outbox) -> usize {
        let count = self.state.selection_count();
        if count == 0 {
            return 0;
        }
        let message = format!("Are you sure you want to delete {} project(s)?", count);
        if !host.confirm(&message) {
            tracing::debug!(count, "bulk delete cancelled");
            return 0;
        }
        let keys: Vec<CardKey> = std::mem::take(&mut self.state.selected).into_iter().collect();
        for key in &keys {
            self.begin_removal(*key, out);
        }
        self.selection_changed(out);
        out.notify(NotificationLevel::Success, "Projects deleted");
        tracing::debug!(count, "bulk delete confirmed");
        count
    }

    fn begin_removal(&mut self, key: CardKey, out: &mut Outbox) -> bool {
        let Ok(card) = self.grid.get_mut(key) else {
            return false;
        };
        if card.view.is_leaving() {
            return false;
        }
        card.view.motion = Motion::Leaving;
        card.view.hovered = false;
        self.state.selected.remove(&key);
        out.schedule(self.timings.exit_transition_ms, Timer::RemoveCard { card: key });
        true
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    /// Open the context menu for a card, replacing any open one.
    pub fn open_menu(&mut self, key: CardKey, out: &mut Outbox) -> Result<()> {
        self.grid.get(key)?;
        self.state.open_menu = Some(key);
        out.push(Effect::MenuOpened { card: key });
        Ok(())
    }

    pub fn close_menu(&mut self, out: &mut Outbox) -> bool {
        if self.state.open_menu.take().is_some() {
            out.push(Effect::MenuClosed);
            true
        } else {
            false
        }
    }

    /// Run a menu entry against the card the menu is open for. The menu
    /// closes first.
    pub fn handle_menu_action(
        &mut self,
        action: MenuAction,
        host: &mut dyn Host,
        out: &mut Outbox,
    ) -> Result<()> {
        let key = self
            .state
            .open_menu
            .ok_or_else(|| Error::InvalidInput("no context menu is open".to_string()))?;
        self.close_menu(out);
        match action {
            MenuAction::Edit => {
                self.grid.get(key)?;
                out.notify(NotificationLevel::Info, "Edit functionality coming soon");
            }
            MenuAction::Duplicate => {
                self.duplicate(key, out)?;
            }
            MenuAction::Archive => self.archive(key, out)?,
            MenuAction::Delete => {
                self.delete(key, host, out)?;
            }
        }
        Ok(())
    }

    /// Append a copy of a card. The copy is a full card with its own key.
    pub fn duplicate(&mut self, key: CardKey, out: &mut Outbox) -> Result<CardKey> {
        let copy = self.grid.duplicate(key)?;
        tracing::debug!(source = %key, %copy, "card duplicated");
        out.push(Effect::CardInserted { card: copy });
        out.push(Effect::SummaryUpdated {
            summary: self.grid.summary(),
        });
        out.notify(NotificationLevel::Success, "Card duplicated");
        Ok(copy)
    }

    /// Visual-only archive.
    pub fn archive(&mut self, key: CardKey, out: &mut Outbox) -> Result<()> {
        self.grid.get_mut(key)?.view.archived = true;
        out.notify(NotificationLevel::Info, "Card archived");
        Ok(())
    }

    /// Delete one card after confirmation. Returns whether it started leaving.
    pub fn delete(&mut self, key: CardKey, host: &mut dyn Host, out: &mut Outbox) -> Result<bool> {
        if self.grid.get(key)?.view.is_leaving() {
            return Ok(false);
        }
        if !host.confirm("Are you sure you want to delete this project?") {
            return Ok(false);
        }
        self.begin_removal(key, out);
        out.notify(NotificationLevel::Success, "Project deleted");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Share
    // ------------------------------------------------------------------

    pub fn share(&mut self, key: CardKey, host: &dyn Host, page_url: &str, out: &mut Outbox) -> Result<()> {
        let title = self.grid.get(key)?.content.title.clone();
        if host.supports_share() {
            out.push(Effect::Share {
                title,
                url: page_url.to_string(),
            });
        } else {
            out.push(Effect::CopyToClipboard {
                text: page_url.to_string(),
            });
            out.notify(NotificationLevel::Success, "Link copied to clipboard");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Timer handlers
    // ------------------------------------------------------------------

    /// Finish a card's fade-in. Stale timers (card gone, hidden or leaving)
    /// are ignored.
    pub fn reveal(&mut self, key: CardKey) {
        if let Ok(card) = self.grid.get_mut(key) {
            if card.view.motion == Motion::Entering {
                card.view.motion = Motion::Idle;
            }
        }
    }

    /// Take a leaving card out of the grid. Returns whether it was removed.
    pub fn finish_removal(&mut self, key: CardKey, out: &mut Outbox) -> bool {
        match self.grid.get(key) {
            Ok(card) if card.view.is_leaving() => {}
            _ => return false,
        }
        if self.grid.remove(key).is_err() {
            return false;
        }
        self.state.selected.remove(&key);
        if self.state.open_menu == Some(key) {
            self.close_menu(out);
        }
        tracing::debug!(%key, "card removed");
        out.push(Effect::CardRemoved { card: key });
        out.push(Effect::SummaryUpdated {
            summary: self.grid.summary(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::page::{Bounds, HeadlessHost};

    fn store() -> ProjectStore {
        let mut a = Project::new("a", "Alpha", "ai");
        a.description = "Neural search".to_string();
        let mut b = Project::new("b", "Beta", "cloud ai");
        b.status = ProjectStatus::Completed;
        let mut c = Project::new("c", "Gamma", "data-analysis");
        c.status = ProjectStatus::Progress;
        c.is_favorite = true;
        ProjectStore::new(vec![a, b, c]).unwrap()
    }

    fn coordinator() -> CardCoordinator {
        let mut out = Outbox::new();
        CardCoordinator::new(&store(), Timings::default(), true, &mut out)
    }

    fn finish_timers(coordinator: &mut CardCoordinator, out: &Outbox) {
        let mut sink = Outbox::new();
        for (_, timer) in out.timers() {
            match *timer {
                Timer::RevealCard { card } => coordinator.reveal(card),
                Timer::RemoveCard { card } => {
                    coordinator.finish_removal(card, &mut sink);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_staggered_entrance() {
        let mut out = Outbox::new();
        let coordinator = CardCoordinator::new(&store(), Timings::default(), false, &mut out);
        let delays: Vec<u64> = out.timers().iter().map(|(d, _)| *d).collect();
        assert_eq!(delays, vec![0, 100, 200]);
        assert!(coordinator.grid().iter().all(|c| c.view.motion == Motion::Entering));
    }

    #[test]
    fn test_reduced_motion_skips_entrance() {
        let coordinator = coordinator();
        assert!(coordinator.grid().iter().all(|c| c.view.motion == Motion::Idle));
    }

    #[test]
    fn test_toggle_expansion_roundtrip() {
        let mut coordinator = coordinator();
        let host = HeadlessHost::new();
        let mut out = Outbox::new();
        assert!(coordinator.toggle_expansion(CardKey(0), &host, &mut out).unwrap());
        assert!(!coordinator.toggle_expansion(CardKey(0), &host, &mut out).unwrap());
        assert!(!coordinator.card(CardKey(0)).unwrap().view.expanded);
        assert!(out.effects().is_empty());
    }

    #[test]
    fn test_expand_scrolls_overflowing_card() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new().with_viewport_height(600.0);
        host.set_bounds(CardKey(1), Bounds { top: 400.0, bottom: 700.0 });
        let mut out = Outbox::new();
        coordinator.expand(CardKey(1), &host, &mut out).unwrap();
        assert_eq!(out.effects(), vec![&Effect::ScrollIntoView { card: CardKey(1) }]);
    }

    #[test]
    fn test_unknown_card_is_error() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        assert!(matches!(
            coordinator.toggle_favorite(CardKey(42), &mut out),
            Err(Error::CardNotFound(CardKey(42)))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_favorite_notifications() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        assert!(coordinator.toggle_favorite(CardKey(0), &mut out).unwrap());
        assert!(!coordinator.toggle_favorite(CardKey(0), &mut out).unwrap());
        assert_eq!(
            out.notices(),
            vec![
                (NotificationLevel::Success, "Added to favorites"),
                (NotificationLevel::Info, "Removed from favorites"),
            ]
        );
    }

    #[test]
    fn test_category_filter_matches_tokens_and_announces() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        let summary = coordinator.set_category_filter(Filter::Only("ai".to_string()), &mut out);
        assert_eq!(summary.visible, 2);
        assert_eq!(summary.completed, 1);
        assert!(!coordinator.card(CardKey(2)).unwrap().view.visible);
        assert_eq!(out.announcements(), vec!["Filter changed to category: ai"]);
    }

    #[test]
    fn test_filters_combine_and_reset() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        coordinator.set_category_filter(Filter::Only("ai".to_string()), &mut out);
        let summary = coordinator.set_search("neural", &mut out);
        assert_eq!(summary.visible, 1);
        coordinator.set_search("", &mut out);
        let summary = coordinator.set_category_filter(Filter::All, &mut out);
        assert_eq!(summary.visible, 3);
    }

    #[test]
    fn test_search_whitespace_is_literal() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        assert_eq!(coordinator.set_search(" ", &mut out).visible, 1);
        assert_eq!(coordinator.set_search("  ", &mut out).visible, 0);
        assert_eq!(coordinator.set_search("NEURAL", &mut out).visible, 1);
    }

    #[test]
    fn test_revealed_cards_fade_in() {
        let mut out = Outbox::new();
        let mut coordinator = CardCoordinator::new(&store(), Timings::default(), false, &mut out);
        finish_timers(&mut coordinator, &out);

        let mut out = Outbox::new();
        coordinator.set_status_filter(Filter::Only(ProjectStatus::Completed), &mut out);
        let mut out = Outbox::new();
        coordinator.set_status_filter(Filter::All, &mut out);
        assert_eq!(
            coordinator.card(CardKey(0)).unwrap().view.motion,
            Motion::Entering
        );
        assert_eq!(out.timers()[0], (10, Timer::RevealCard { card: CardKey(0) }));
        finish_timers(&mut coordinator, &out);
        assert_eq!(coordinator.card(CardKey(0)).unwrap().view.motion, Motion::Idle);
    }

    #[test]
    fn test_sort_reorders_and_announces() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        coordinator.set_sort(SortKey::Progress, &mut out);
        assert_eq!(coordinator.state().sort, SortKey::Progress);
        assert_eq!(out.announcements(), vec!["Sorting by progress"]);
    }

    #[test]
    fn test_selection_mode_enter_exit() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        assert!(coordinator.toggle_selection_mode(&mut out));
        coordinator.set_selected(CardKey(0), true, &mut out).unwrap();
        coordinator.set_selected(CardKey(1), true, &mut out).unwrap();
        assert_eq!(out.announcements().last(), Some(&"2 projects selected"));
        assert!(!coordinator.toggle_selection_mode(&mut out));
        assert!(coordinator.state().selected.is_empty());
        assert!(!coordinator.exit_selection_mode(&mut out));
    }

    #[test]
    fn test_selecting_outside_selection_mode_is_rejected() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        assert!(matches!(
            coordinator.set_selected(CardKey(0), true, &mut out),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bulk_delete_cancel_has_no_side_effects() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new().with_default_answer(false);
        let mut out = Outbox::new();
        coordinator.enter_selection_mode(&mut out);
        coordinator.select_all(&mut out).unwrap();

        let mut out = Outbox::new();
        assert_eq!(coordinator.delete_selected(&mut host, &mut out), 0);
        assert!(out.is_empty());
        assert_eq!(coordinator.state().selection_count(), 3);
        assert_eq!(host.prompts(), ["Are you sure you want to delete 3 project(s)?"]);
    }

    #[test]
    fn test_bulk_delete_removes_after_exit_transition() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new();
        let mut out = Outbox::new();
        coordinator.enter_selection_mode(&mut out);
        coordinator.set_selected(CardKey(0), true, &mut out).unwrap();
        coordinator.set_selected(CardKey(2), true, &mut out).unwrap();

        let mut out = Outbox::new();
        assert_eq!(coordinator.delete_selected(&mut host, &mut out), 2);
        assert!(coordinator.state().selected.is_empty());
        assert_eq!(coordinator.grid().len(), 3);
        assert!(out.timers().iter().all(|(delay, _)| *delay == 300));

        finish_timers(&mut coordinator, &out);
        assert_eq!(coordinator.grid().keys(), vec![CardKey(1)]);
        assert_eq!(coordinator.summary().visible, 1);
    }

    #[test]
    fn test_menu_duplicate_appends_copy() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new();
        let mut out = Outbox::new();
        coordinator.open_menu(CardKey(1), &mut out).unwrap();
        coordinator
            .handle_menu_action(MenuAction::Duplicate, &mut host, &mut out)
            .unwrap();
        assert!(coordinator.state().open_menu.is_none());
        let copy = coordinator.card(CardKey(3)).unwrap();
        assert_eq!(copy.content.title, "Beta (Copy)");
        assert_eq!(coordinator.grid().position(CardKey(3)), Some(3));
        assert_eq!(out.notices(), vec![(NotificationLevel::Success, "Card duplicated")]);
    }

    #[test]
    fn test_menu_edit_and_archive() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new();
        let mut out = Outbox::new();
        coordinator.open_menu(CardKey(0), &mut out).unwrap();
        coordinator
            .handle_menu_action(MenuAction::Edit, &mut host, &mut out)
            .unwrap();
        coordinator.open_menu(CardKey(0), &mut out).unwrap();
        coordinator
            .handle_menu_action(MenuAction::Archive, &mut host, &mut out)
            .unwrap();
        assert!(coordinator.card(CardKey(0)).unwrap().view.archived);
        assert_eq!(
            out.notices(),
            vec![
                (NotificationLevel::Info, "Edit functionality coming soon"),
                (NotificationLevel::Info, "Card archived"),
            ]
        );
    }

    #[test]
    fn test_menu_action_without_menu_is_error() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new();
        let mut out = Outbox::new();
        assert!(
            coordinator
                .handle_menu_action(MenuAction::Edit, &mut host, &mut out)
                .is_err()
        );
    }

    #[test]
    fn test_single_delete_confirmed_and_cancelled() {
        let mut coordinator = coordinator();
        let mut host = HeadlessHost::new().with_answers([false, true]);
        let mut out = Outbox::new();
        assert!(!coordinator.delete(CardKey(0), &mut host, &mut out).unwrap());
        assert!(out.is_empty());
        assert!(coordinator.delete(CardKey(0), &mut host, &mut out).unwrap());
        assert!(coordinator.card(CardKey(0)).unwrap().view.is_leaving());
        assert!(!coordinator.delete(CardKey(0), &mut host, &mut out).unwrap());
        assert_eq!(host.prompts().len(), 2);
    }

    #[test]
    fn test_share_falls_back_to_clipboard() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        coordinator
            .share(CardKey(0), &HeadlessHost::new(), "https://x.test/p", &mut out)
            .unwrap();
        assert_eq!(
            out.effects(),
            vec![&Effect::CopyToClipboard {
                text: "https://x.test/p".to_string()
            }]
        );
        assert_eq!(out.notices()[0].1, "Link copied to clipboard");

        let mut out = Outbox::new();
        let host = HeadlessHost::new().with_share(true);
        coordinator.share(CardKey(0), &host, "https://x.test/p", &mut out).unwrap();
        assert!(matches!(out.effects()[0], Effect::Share { title, .. } if title == "Alpha"));
        assert!(out.notices().is_empty());
    }

    #[test]
    fn test_hover_ignored_in_selection_mode() {
        let mut coordinator = coordinator();
        let mut out = Outbox::new();
        coordinator.set_hovered(CardKey(0), true).unwrap();
        assert!(coordinator.card(CardKey(0)).unwrap().view.hovered);
        coordinator.enter_selection_mode(&mut out);
        assert!(!coordinator.card(CardKey(0)).unwrap().view.hovered);
        coordinator.set_hovered(CardKey(0), true).unwrap();
        assert!(!coordinator.card(CardKey(0)).unwrap().view.hovered);
    }
}
