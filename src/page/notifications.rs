//! Toast notifications.
//!
//! Toasts slide in, stay for a fixed time, then slide out and are dropped.
//! Every notify call creates a new toast; repeated messages are not merged.

use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Notification level (determines styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Informational message
    Info,
    /// Success message (card duplicated, link copied, ...)
    Success,
    /// Error message
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }

    /// Background color of the toast
    pub fn color(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "#3B82F6",
            NotificationLevel::Success => "#10B981",
            NotificationLevel::Error => "#EF4444",
        }
    }

    /// Get icon/prefix for this level
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✗",
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Unique ID for this toast
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    /// Virtual time (ms) the toast was created
    pub created_at: u64,
    /// Set once the exit animation has started
    pub dismissed: bool,
}

impl Toast {
    pub fn render(&self) -> Element {
        let transform = if self.dismissed {
            "translateX(100%)"
        } else {
            "translateX(0)"
        };
        Element::new("div")
            .class("notification")
            .class(&format!("notification-{}", self.level.as_str()))
            .attr("data-notification", self.id.to_string())
            .css("background", self.level.color())
            .css("transform", transform)
            .text(self.message.clone())
    }
}

/// Active toasts, oldest first.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a new toast. Returns its id for the dismiss timers.
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>, now: u64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            level,
            message: message.into(),
            created_at: now,
            dismissed: false,
        });
        id
    }

    /// Start the exit animation. False if the toast is gone or already leaving.
    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if !toast.dismissed => {
                toast.dismissed = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    pub fn render(&self) -> Element {
        Element::new("div")
            .class("notifications")
            .children(self.toasts.iter().map(Toast::render))
    }
}
