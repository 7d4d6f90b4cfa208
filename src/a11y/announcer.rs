//! The single polite live region used for screen-reader announcements.

use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Id of the live region element.
pub const LIVE_REGION_ID: &str = "announcer";

/// `aria-live` politeness level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Politeness::Polite => "polite",
            Politeness::Assertive => "assertive",
        }
    }
}

/// Live region content. Each announcement replaces the previous one.
///
/// Every announcement bumps a generation counter; a scheduled clear only
/// takes effect when it still belongs to the current generation, so an
/// older timer never erases a newer message.
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    text: String,
    politeness: Politeness,
    generation: u64,
}

impl LiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region's text. Returns the generation to clear later.
    pub fn announce(&mut self, message: &str, politeness: Politeness) -> u64 {
        self.generation += 1;
        self.text = message.to_string();
        self.politeness = politeness;
        tracing::trace!(generation = self.generation, message, "announce");
        self.generation
    }

    /// Empty the region if `generation` is still the latest announcement.
    pub fn clear_if_current(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.text.is_empty() {
            return false;
        }
        self.text.clear();
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The visually hidden region element.
    pub fn render(&self) -> Element {
        Element::new("div")
            .id(LIVE_REGION_ID)
            .class("sr-only")
            .attr("aria-live", self.politeness.as_str())
            .attr("aria-atomic", "true")
            .text(self.text.clone())
    }
}
