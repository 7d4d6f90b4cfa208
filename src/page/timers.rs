//! Virtual-time timer queue.
//!
//! Timers are fire-and-forget: once scheduled they cannot be cancelled, so
//! every handler re-checks the state it acts on when it fires. Time only
//! moves when the host advances it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cards::CardKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "timer", rename_all = "snake_case")]
pub enum Timer {
    /// Fade an entering card in
    RevealCard { card: CardKey },
    /// Take a leaving card out of the grid
    RemoveCard { card: CardKey },
    /// Empty the live region if nothing newer was announced
    ClearAnnouncement { generation: u64 },
    /// Start a toast's exit animation
    DismissNotification { id: u64 },
    /// Drop a toast after its exit animation
    RemoveNotification { id: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct Timers {
    now: u64,
    seq: u64,
    /// Keyed by (due time, scheduling order) so equal deadlines fire FIFO
    queue: BTreeMap<(u64, u64), Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) {
        let due = self.now.saturating_add(delay_ms);
        self.queue.insert((due, self.seq), timer);
        self.seq += 1;
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<Timer> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        self.now = self.now.max(due);
        self.queue.remove(&(due, seq))
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}
