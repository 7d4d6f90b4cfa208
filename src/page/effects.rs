//! Side effects the page asks its host to perform, and the collector
//! components push them into while handling an event.

use serde::Serialize;

use crate::a11y::{FocusTarget, Politeness};
use crate::cards::{CardKey, Summary};

use super::notifications::NotificationLevel;
use super::timers::Timer;

/// Something the host must do (or may want to mirror) after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// The browser default action for the key event must be suppressed
    PreventDefault,
    Announce {
        message: String,
        politeness: Politeness,
    },
    ClearAnnouncement,
    Notify {
        id: u64,
        level: NotificationLevel,
        message: String,
    },
    DismissNotification {
        id: u64,
    },
    RemoveNotification {
        id: u64,
    },
    ScrollIntoView {
        card: CardKey,
    },
    Focus {
        target: FocusTarget,
    },
    Share {
        title: String,
        url: String,
    },
    CopyToClipboard {
        text: String,
    },
    SummaryUpdated {
        summary: Summary,
    },
    GridReordered {
        order: Vec<CardKey>,
    },
    CardInserted {
        card: CardKey,
    },
    CardRemoved {
        card: CardKey,
    },
    MenuOpened {
        card: CardKey,
    },
    MenuClosed,
    SelectionChanged {
        mode: bool,
        count: usize,
    },
    DocumentClass {
        class: String,
        enabled: bool,
    },
    DialogClosed {
        id: String,
    },
}

/// An entry waiting to be turned into effects by the page.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Pending {
    Effect(Effect),
    Notice { level: NotificationLevel, message: String },
    Announcement { message: String, politeness: Politeness },
}

/// Collects effects, notifications, announcements and timers in the order
/// components produce them. The page drains it once per event.
#[derive(Debug, Default)]
pub struct Outbox {
    pub(crate) items: Vec<Pending>,
    pub(crate) timers: Vec<(u64, Timer)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.items.push(Pending::Effect(effect));
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.items.push(Pending::Notice {
            level,
            message: message.into(),
        });
    }

    pub fn announce(&mut self, message: impl Into<String>) {
        self.announce_with(message, Politeness::Polite);
    }

    pub fn announce_with(&mut self, message: impl Into<String>, politeness: Politeness) {
        self.items.push(Pending::Announcement {
            message: message.into(),
            politeness,
        });
    }

    /// Fire `timer` after `delay_ms` of virtual time.
    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) {
        self.timers.push((delay_ms, timer));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.timers.is_empty()
    }

    /// Messages announced so far, oldest first.
    pub fn announcements(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Pending::Announcement { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Notification messages queued so far, oldest first.
    pub fn notices(&self) -> Vec<(NotificationLevel, &str)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Pending::Notice { level, message } => Some((*level, message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn effects(&self) -> Vec<&Effect> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Pending::Effect(effect) => Some(effect),
                _ => None,
            })
            .collect()
    }

    pub fn timers(&self) -> &[(u64, Timer)] {
        &self.timers
    }
}
