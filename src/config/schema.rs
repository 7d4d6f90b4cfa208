//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The [`FolioConfig`] struct representing the file
//! - Serialization/deserialization to/from KDL format
//! - Validation
//! - [`Timings`], the cosmetic delays with their built-in defaults

use std::path::PathBuf;

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

use crate::models::SortKey;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cosmetic delays of the page, in milliseconds of virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// How long a toast stays before sliding out
    pub notification_ms: u64,
    /// Toast slide-out duration
    pub notification_exit_ms: u64,
    /// Delay before the live region is emptied
    pub announce_clear_ms: u64,
    /// Entrance delay between consecutive cards
    pub stagger_ms: u64,
    /// Delay before a card shown by a filter fades in
    pub fade_in_ms: u64,
    /// Card slide-out duration before removal
    pub exit_transition_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            notification_ms: 3000,
            notification_exit_ms: 300,
            announce_clear_ms: 1000,
            stagger_ms: 100,
            fade_in_ms: 10,
            exit_transition_ms: 300,
        }
    }
}

/// Timing keys as they appear in config.kdl.
const TIMING_KEYS: &[&str] = &[
    "notification-ms",
    "notification-exit-ms",
    "announce-clear-ms",
    "stagger-ms",
    "fade-in-ms",
    "exit-transition-ms",
];

/// Upper bound for any single delay.
const MAX_DELAY_MS: u64 = 60_000;

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"  // or "json"
/// default-sort "name"    // date, name, priority, progress
/// page-url "https://example.com/projects"
/// data-file "/path/to/projects.json"
/// notification-ms 3000
/// stagger-ms 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Initial grid ordering
    pub default_sort: Option<SortKey>,

    /// URL shared or copied by the share action
    pub page_url: Option<String>,

    /// Project dataset to load instead of the bundled one
    pub data_file: Option<PathBuf>,

    pub notification_ms: Option<u64>,
    pub notification_exit_ms: Option<u64>,
    pub announce_clear_ms: Option<u64>,
    pub stagger_ms: Option<u64>,
    pub fade_in_ms: Option<u64>,
    pub exit_transition_ms: Option<u64>,
}

impl FolioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn timing(&self, key: &str) -> Option<u64> {
        match key {
            "notification-ms" => self.notification_ms,
            "notification-exit-ms" => self.notification_exit_ms,
            "announce-clear-ms" => self.announce_clear_ms,
            "stagger-ms" => self.stagger_ms,
            "fade-in-ms" => self.fade_in_ms,
            "exit-transition-ms" => self.exit_transition_ms,
            _ => None,
        }
    }

    fn timing_mut(&mut self, key: &str) -> Option<&mut Option<u64>> {
        match key {
            "notification-ms" => Some(&mut self.notification_ms),
            "notification-exit-ms" => Some(&mut self.notification_exit_ms),
            "announce-clear-ms" => Some(&mut self.announce_clear_ms),
            "stagger-ms" => Some(&mut self.stagger_ms),
            "fade-in-ms" => Some(&mut self.fade_in_ms),
            "exit-transition-ms" => Some(&mut self.exit_transition_ms),
            _ => None,
        }
    }

    /// Whether any timing key is set.
    pub fn has_timings(&self) -> bool {
        TIMING_KEYS.iter().any(|key| self.timing(key).is_some())
    }

    /// Apply the timing keys that are set on top of `base`.
    pub fn apply_timings(&self, base: Timings) -> Timings {
        Timings {
            notification_ms: self.notification_ms.unwrap_or(base.notification_ms),
            notification_exit_ms: self
                .notification_exit_ms
                .unwrap_or(base.notification_exit_ms),
            announce_clear_ms: self.announce_clear_ms.unwrap_or(base.announce_clear_ms),
            stagger_ms: self.stagger_ms.unwrap_or(base.stagger_ms),
            fade_in_ms: self.fade_in_ms.unwrap_or(base.fade_in_ms),
            exit_transition_ms: self.exit_transition_ms.unwrap_or(base.exit_transition_ms),
        }
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for key in TIMING_KEYS {
            if let Some(ms) = self.timing(key) {
                if ms > MAX_DELAY_MS {
                    return Err(format!("{} must be at most {}, got {}", key, MAX_DELAY_MS, ms));
                }
            }
        }
        if let Some(ref url) = self.page_url {
            if url.trim().is_empty() {
                return Err("page-url must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes and malformed values
    /// are skipped.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        if let Some(s) = first_string(doc, "default-sort") {
            config.default_sort = s.parse().ok();
        }

        if let Some(s) = first_string(doc, "page-url") {
            config.page_url = Some(s.to_string());
        }

        if let Some(s) = first_string(doc, "data-file") {
            config.data_file = Some(PathBuf::from(s));
        }

        for key in TIMING_KEYS {
            let value = doc
                .get(key)
                .and_then(|node| node.entries().first())
                .and_then(|entry| entry.value().as_integer())
                .and_then(|i| u64::try_from(i).ok());
            if let (Some(ms), Some(slot)) = (value, config.timing_mut(key)) {
                *slot = Some(ms);
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(format) = self.output_format {
            push_string(&mut doc, "output-format", format.as_str());
        }
        if let Some(sort) = self.default_sort {
            push_string(&mut doc, "default-sort", sort.as_str());
        }
        if let Some(ref url) = self.page_url {
            push_string(&mut doc, "page-url", url);
        }
        if let Some(ref path) = self.data_file {
            push_string(&mut doc, "data-file", &path.to_string_lossy());
        }
        for key in TIMING_KEYS {
            if let Some(ms) = self.timing(key) {
                let mut node = KdlNode::new(*key);
                node.push(KdlEntry::new(KdlValue::Integer(ms as i128)));
                doc.nodes_mut().push(node);
            }
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &FolioConfig) {
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.default_sort.is_some() {
            self.default_sort = other.default_sort;
        }
        if other.page_url.is_some() {
            self.page_url = other.page_url.clone();
        }
        if other.data_file.is_some() {
            self.data_file = other.data_file.clone();
        }
        for key in TIMING_KEYS {
            if let Some(ms) = other.timing(key) {
                if let Some(slot) = self.timing_mut(key) {
                    *slot = Some(ms);
                }
            }
        }
    }

    /// Set one key from its textual value, as `folio config set` does.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "output-format" => {
                self.output_format = Some(
                    OutputFormat::parse(value)
                        .ok_or_else(|| format!("output-format must be json or human, got {}", value))?,
                );
            }
            "default-sort" => self.default_sort = Some(value.parse()?),
            "page-url" => self.page_url = Some(value.to_string()),
            "data-file" => self.data_file = Some(PathBuf::from(value)),
            _ => {
                let slot = self
                    .timing_mut(key)
                    .ok_or_else(|| format!("Unknown config key: {}", key))?;
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("{} must be a number of milliseconds, got {}", key, value))?;
                *slot = Some(ms);
            }
        }
        self.validate()
    }

    /// Textual value of one key, if set.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "output-format" => self.output_format.map(|f| f.as_str().to_string()),
            "default-sort" => self.default_sort.map(|s| s.as_str().to_string()),
            "page-url" => self.page_url.clone(),
            "data-file" => self.data_file.as_ref().map(|p| p.display().to_string()),
            _ => self.timing(key).map(|ms| ms.to_string()),
        }
    }

    /// Every key config.kdl understands.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        ["output-format", "default-sort", "page-url", "data-file"]
            .into_iter()
            .chain(TIMING_KEYS.iter().copied())
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

fn push_string(doc: &mut KdlDocument, name: &str, value: &str) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    doc.nodes_mut().push(node);
}
