//! The page: store, card coordinator and accessibility coordinator behind a
//! single event entry point.
//!
//! Hosts feed [`InputEvent`]s to [`Page::handle`] and get back the
//! [`Effect`]s to perform. Time is virtual: cosmetic delays are queued
//! [`Timer`]s that fire when the host sends [`InputEvent::Advance`].
//! [`Page::render`] projects the current state onto an element tree.

mod effects;
mod events;
mod host;
mod notifications;
mod timers;

pub use effects::{Effect, Outbox};
pub use events::{CardAction, CardRegion, ClickTarget, Control, InputEvent, ToolbarButton};
pub use host::{Bounds, HeadlessHost, Host};
pub use notifications::{NotificationCenter, NotificationLevel, Toast};
pub use timers::{Timer, Timers};

use effects::Pending;

use crate::a11y::attributes::MAIN_CONTENT_ID;
use crate::a11y::{AccessibilityCoordinator, Direction, MediaFeature, MediaPreferences};
use crate::cards::projection;
use crate::cards::{CardCoordinator, CardKey};
use crate::config::{ResolvedConfig, Timings, resolver::DEFAULT_PAGE_URL};
use crate::dom::Element;
use crate::input::{Command, FocusContext, KeyEvent, Keymap};
use crate::models::{Filter, ProjectStatus, SortKey};
use crate::store::ProjectStore;
use crate::{Error, Result};

/// Construction options for a [`Page`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub timings: Timings,
    /// URL shared or copied by the share action
    pub page_url: String,
    /// Initial ordering; `None` keeps collection order
    pub sort: Option<SortKey>,
    pub media: MediaPreferences,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            sort: None,
            media: MediaPreferences::default(),
        }
    }
}

impl PageOptions {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let sort = match config.default_sort.source {
            crate::config::ValueSource::Default => None,
            _ => Some(config.default_sort()),
        };
        Self {
            timings: config.timings(),
            page_url: config.page_url().to_string(),
            sort,
            media: MediaPreferences::default(),
        }
    }

    pub fn with_media(mut self, media: MediaPreferences) -> Self {
        self.media = media;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    store: ProjectStore,
    cards: CardCoordinator,
    a11y: AccessibilityCoordinator,
    keymap: Keymap,
    timers: Timers,
    toasts: NotificationCenter,
    options: PageOptions,
}

impl Page {
    pub fn new(store: ProjectStore, options: PageOptions) -> Self {
        let mut out = Outbox::new();
        let cards = CardCoordinator::new(
            &store,
            options.timings,
            options.media.reduced_motion,
            &mut out,
        );
        let mut page = Self {
            store,
            cards,
            a11y: AccessibilityCoordinator::new(options.media),
            keymap: Keymap::page_default(),
            timers: Timers::new(),
            toasts: NotificationCenter::new(),
            options,
        };
        if let Some(sort) = page.options.sort {
            page.cards.apply_sort(sort, &mut out);
        }
        page.drain(&mut out, &mut Vec::new());
        tracing::debug!(cards = page.cards.grid().len(), "page ready");
        page
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Store mutations do not reach cards already built from it.
    pub fn store_mut(&mut self) -> &mut ProjectStore {
        &mut self.store
    }

    pub fn cards(&self) -> &CardCoordinator {
        &self.cards
    }

    pub fn a11y(&self) -> &AccessibilityCoordinator {
        &self.a11y
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.toasts
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Handle one host event and return the effects it produced, in order.
    /// An event that returns an error has changed nothing.
    pub fn handle(&mut self, event: InputEvent, host: &mut dyn Host) -> Result<Vec<Effect>> {
        tracing::trace!(?event, "page event");
        let mut effects = Vec::new();
        let mut out = Outbox::new();
        let result = match event {
            InputEvent::Advance { ms } => {
                self.advance(ms, &mut effects);
                Ok(())
            }
            event => self.dispatch(event, host, &mut out),
        };
        self.drain(&mut out, &mut effects);
        result.map(|()| effects)
    }

    /// Run a keyboard command directly, as if its key had been pressed.
    pub fn execute(&mut self, command: Command, host: &mut dyn Host) -> Result<Vec<Effect>> {
        let mut effects = Vec::new();
        self.check_command(command)?;
        let mut out = Outbox::new();
        let result = self.run_command(command, host, &mut out);
        self.drain(&mut out, &mut effects);
        result.map(|()| effects)
    }

    /// Fire every pending timer, however far away.
    pub fn settle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(due) = self.timers.next_due() {
            let ms = due.saturating_sub(self.timers.now());
            self.advance(ms, &mut effects);
        }
        effects
    }

    fn dispatch(&mut self, event: InputEvent, host: &mut dyn Host, out: &mut Outbox) -> Result<()> {
        match event {
            InputEvent::Click { target } => self.on_click(target, host, out),
            InputEvent::Key { event } => self.on_key(&event, host, out),
            InputEvent::FocusIn { target } => self.a11y.on_focus_in(target, &self.cards, out),
            InputEvent::FocusOut { target } => {
                self.a11y.on_focus_out(&target);
                Ok(())
            }
            InputEvent::ControlChanged { control, value } => {
                match control {
                    Control::CategoryFilter => {
                        let filter: Filter<String> = value.parse().unwrap_or_default();
                        self.cards.set_category_filter(filter, out);
                    }
                    Control::StatusFilter => {
                        let filter: Filter<ProjectStatus> = value.parse().map_err(|e: String| {
                            tracing::warn!(%value, "rejected status filter");
                            Error::InvalidInput(e)
                        })?;
                        self.cards.set_status_filter(filter, out);
                    }
                    Control::Search => {
                        self.cards.set_search(&value, out);
                    }
                }
                Ok(())
            }
            InputEvent::CheckboxChanged { card, checked } => {
                self.cards.set_selected(card, checked, out)?;
                Ok(())
            }
            InputEvent::PointerEnter { card } => self.cards.set_hovered(card, true),
            InputEvent::PointerLeave { card } => self.cards.set_hovered(card, false),
            InputEvent::MediaChanged { feature, matches } => {
                if self.a11y.set_media(feature, matches, out) && feature == MediaFeature::ReducedMotion {
                    self.cards.set_reduced_motion(matches);
                }
                Ok(())
            }
            InputEvent::DialogOpened { id } => {
                self.a11y.open_dialog(id);
                Ok(())
            }
            InputEvent::Advance { .. } => Ok(()),
        }
    }

    fn on_click(&mut self, target: ClickTarget, host: &mut dyn Host, out: &mut Outbox) -> Result<()> {
        self.check_click(&target)?;
        // Any click other than a menu entry dismisses the open menu.
        if !matches!(target, ClickTarget::MenuItem { .. }) {
            self.cards.close_menu(out);
        }
        match target {
            ClickTarget::Card { card, region } => {
                if region == CardRegion::Body {
                    self.cards.toggle_expansion(card, host, out)?;
                } else {
                    self.cards.card(card)?;
                }
            }
            ClickTarget::Favorite { card } => {
                self.cards.toggle_favorite(card, out)?;
            }
            ClickTarget::Action { card, action } => match action {
                CardAction::Share => self.cards.share(card, host, &self.options.page_url, out)?,
                CardAction::More => self.cards.open_menu(card, out)?,
            },
            ClickTarget::MenuItem { action } => self.cards.handle_menu_action(action, host, out)?,
            ClickTarget::Sort { sort } => self.cards.set_sort(sort, out),
            ClickTarget::SelectionToggle => {
                self.cards.toggle_selection_mode(out);
            }
            ClickTarget::Toolbar { button } => match button {
                ToolbarButton::SelectAll => {
                    self.cards.select_all(out)?;
                }
                ToolbarButton::DeselectAll => self.cards.deselect_all(out)?,
                ToolbarButton::DeleteSelected => {
                    self.cards.delete_selected(host, out);
                }
                ToolbarButton::Close => {
                    self.cards.exit_selection_mode(out);
                }
            },
            ClickTarget::Elsewhere => {}
        }
        Ok(())
    }

    /// Up-front checks for a click. Every error a click can produce is
    /// raised here, before the menu closes or anything else changes.
    fn check_click(&self, target: &ClickTarget) -> Result<()> {
        match target {
            ClickTarget::Card { card, .. }
            | ClickTarget::Favorite { card }
            | ClickTarget::Action { card, .. } => {
                self.cards.card(*card)?;
            }
            ClickTarget::MenuItem { .. } => {
                let card = self
                    .cards
                    .state()
                    .open_menu
                    .ok_or_else(|| Error::InvalidInput("no context menu is open".to_string()))?;
                self.cards.card(card)?;
            }
            ClickTarget::Toolbar {
                button: ToolbarButton::SelectAll | ToolbarButton::DeselectAll,
            } => self.cards.require_selection_mode()?,
            ClickTarget::Sort { .. }
            | ClickTarget::SelectionToggle
            | ClickTarget::Toolbar { .. }
            | ClickTarget::Elsewhere => {}
        }
        Ok(())
    }

    fn check_command(&self, command: Command) -> Result<()> {
        if let (Command::ActivateCard | Command::ToggleFavorite, Some(card)) =
            (command, self.a11y.focused_card())
        {
            self.cards.card(card)?;
        }
        Ok(())
    }

    fn on_key(&mut self, event: &KeyEvent, host: &mut dyn Host, out: &mut Outbox) -> Result<()> {
        let ctx = FocusContext::from_focus(self.a11y.focus().current());
        let Some(binding) = self.keymap.resolve(event, &ctx) else {
            return Ok(());
        };
        let (command, prevent_default) = (binding.command, binding.prevent_default);
        self.check_command(command)?;
        if prevent_default {
            out.push(Effect::PreventDefault);
        }
        self.run_command(command, host, out)
    }

    fn run_command(&mut self, command: Command, host: &mut dyn Host, out: &mut Outbox) -> Result<()> {
        tracing::debug!(?command, "key command");
        match command {
            Command::Dismiss => {
                self.cards.exit_selection_mode(out);
                self.cards.collapse_all();
                self.cards.close_menu(out);
                self.a11y.close_all_dialogs(out);
            }
            Command::ActivateCard => {
                if let Some(card) = self.a11y.focused_card() {
                    self.a11y.activate(card, &mut self.cards, host, out)?;
                }
            }
            Command::FocusNext => {
                self.a11y.navigate(Direction::Next, &self.cards, out);
            }
            Command::FocusPrevious => {
                self.a11y.navigate(Direction::Previous, &self.cards, out);
            }
            Command::ToggleFavorite => {
                if let Some(card) = self.a11y.focused_card() {
                    self.cards.toggle_favorite(card, out)?;
                }
            }
            Command::ToggleSelectionMode => {
                self.cards.toggle_selection_mode(out);
            }
            Command::FocusSearch => self.a11y.focus_search(out),
            Command::FocusFirstInteractive => self.a11y.focus_first_interactive(out),
        }
        Ok(())
    }

    fn advance(&mut self, ms: u64, effects: &mut Vec<Effect>) {
        let target = self.timers.now().saturating_add(ms);
        while let Some(timer) = self.timers.pop_due(target) {
            let mut out = Outbox::new();
            self.fire(timer, &mut out);
            self.drain(&mut out, effects);
        }
        self.timers.set_now(target);
    }

    fn fire(&mut self, timer: Timer, out: &mut Outbox) {
        tracing::trace!(?timer, now = self.timers.now(), "timer fired");
        match timer {
            Timer::RevealCard { card } => self.cards.reveal(card),
            Timer::RemoveCard { card } => {
                if self.cards.finish_removal(card, out) {
                    self.a11y.forget_card(card);
                }
            }
            Timer::ClearAnnouncement { generation } => {
                if self.a11y.live_mut().clear_if_current(generation) {
                    out.push(Effect::ClearAnnouncement);
                }
            }
            Timer::DismissNotification { id } => {
                if self.toasts.dismiss(id) {
                    out.push(Effect::DismissNotification { id });
                    out.schedule(
                        self.options.timings.notification_exit_ms,
                        Timer::RemoveNotification { id },
                    );
                }
            }
            Timer::RemoveNotification { id } => {
                if self.toasts.remove(id) {
                    out.push(Effect::RemoveNotification { id });
                }
            }
        }
    }

    /// Turn collected entries into effects, registering toasts,
    /// announcements and timers along the way.
    fn drain(&mut self, out: &mut Outbox, effects: &mut Vec<Effect>) {
        let timings = self.options.timings;
        for item in out.items.drain(..) {
            match item {
                Pending::Effect(effect) => effects.push(effect),
                Pending::Notice { level, message } => {
                    let id = self.toasts.notify(level, message.clone(), self.timers.now());
                    self.timers
                        .schedule(timings.notification_ms, Timer::DismissNotification { id });
                    effects.push(Effect::Notify { id, level, message });
                }
                Pending::Announcement {
                    message,
                    politeness,
                } => {
                    let generation = self.a11y.live_mut().announce(&message, politeness);
                    self.timers.schedule(
                        timings.announce_clear_ms,
                        Timer::ClearAnnouncement { generation },
                    );
                    effects.push(Effect::Announce {
                        message,
                        politeness,
                    });
                }
            }
        }
        for (delay, timer) in out.timers.drain(..) {
            self.timers.schedule(delay, timer);
        }
    }

    /// Project the whole page onto an element tree, ARIA upkeep included.
    pub fn render(&self) -> Element {
        let state = self.cards.state();
        let focused = self.a11y.focused_card();

        let mut container = Element::new("div")
            .class("project-list-container")
            .child(
                Element::new("div")
                    .class("project-list-header")
                    .child(Element::new("h2").text("Projects")),
            )
            .child(projection::render_controls(
                state,
                &self.store.categories(),
                &ProjectStore::statuses(),
            ))
            .child(projection::render_summary(&self.cards.summary()))
            .child(projection::render_grid(&self.cards, focused));
        if state.selection_mode {
            container.add_class("selection-mode");
            container = container.child(projection::render_selection_toolbar(state.selection_count()));
        }

        let mut body = Element::new("body").child(Element::new("main").id(MAIN_CONTENT_ID).child(container));
        if let Some(card) = state.open_menu {
            body = body.child(projection::render_menu(card));
        }
        body = body.child(self.toasts.render()).child(self.a11y.live().render());
        for class in self.a11y.media().document_classes() {
            body.add_class(class);
        }
        self.a11y.decorate(&mut body);
        body
    }

    pub fn to_html(&self) -> String {
        self.render().to_html()
    }

    /// Rendered element for one card.
    pub fn render_card(&self, key: CardKey) -> Result<Element> {
        self.cards.card(key)?;
        let root = self.render();
        root.find_all_by_class("project-card")
            .into_iter()
            .find(|el| el.get_attr("data-card") == Some(key.0.to_string().as_str()))
            .cloned()
            .ok_or(Error::CardNotFound(key))
    }
}
