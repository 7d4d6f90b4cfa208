//! What the page needs to ask of its embedding environment.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::cards::CardKey;

/// Vertical extent of an element relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Whether any part of the element falls outside `[0, viewport_height]`.
    pub fn overflows(&self, viewport_height: f64) -> bool {
        self.top < 0.0 || self.bottom > viewport_height
    }
}

/// Synchronous queries the page makes while handling an event.
pub trait Host {
    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Whether a native share sheet is available.
    fn supports_share(&self) -> bool {
        false
    }

    /// Current on-screen bounds of a card, if the host lays cards out.
    fn card_bounds(&self, _card: CardKey) -> Option<Bounds> {
        None
    }

    fn viewport_height(&self) -> f64 {
        f64::INFINITY
    }
}

/// Scripted host for the CLI and tests.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    answers: VecDeque<bool>,
    default_answer: bool,
    share: bool,
    bounds: HashMap<CardKey, Bounds>,
    viewport_height: f64,
    prompts: Vec<String>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            answers: VecDeque::new(),
            default_answer: true,
            share: false,
            bounds: HashMap::new(),
            viewport_height: f64::INFINITY,
            prompts: Vec::new(),
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer given once the scripted answers run out.
    pub fn with_default_answer(mut self, answer: bool) -> Self {
        self.default_answer = answer;
        self
    }

    /// Queue answers for upcoming confirmation prompts.
    pub fn with_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn with_share(mut self, supported: bool) -> Self {
        self.share = supported;
        self
    }

    pub fn with_viewport_height(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn set_bounds(&mut self, card: CardKey, bounds: Bounds) {
        self.bounds.insert(card, bounds);
    }

    /// Every confirmation message shown, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Host for HeadlessHost {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(self.default_answer)
    }

    fn supports_share(&self) -> bool {
        self.share
    }

    fn card_bounds(&self, card: CardKey) -> Option<Bounds> {
        self.bounds.get(&card).copied()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}
