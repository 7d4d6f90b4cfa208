//! Card content, per-card view state and the coordinator's application state.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Filter, Priority, Project, ProjectLink, ProjectMetrics, ProjectStatus, SortKey,
};

/// Stable handle for one card in the grid.
///
/// Keys are never reused, so a duplicate of a card gets a fresh key even
/// though it shows the same project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardKey(pub u32);

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// Transition a card is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Faded out, waiting for its reveal timer
    Entering,
    #[default]
    Idle,
    /// Sliding out; removed from the grid when its timer fires
    Leaving,
}

/// The source of truth for how a card is shown. DOM attributes are derived
/// from this, never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub expanded: bool,
    pub visible: bool,
    pub favorite: bool,
    pub archived: bool,
    pub hovered: bool,
    pub motion: Motion,
}

impl CardView {
    pub fn new(favorite: bool) -> Self {
        Self {
            expanded: false,
            visible: true,
            favorite,
            archived: false,
            hovered: false,
            motion: Motion::Idle,
        }
    }

    pub fn is_leaving(&self) -> bool {
        self.motion == Motion::Leaving
    }
}

/// Display content captured from a project record when the card is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardContent {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub full_description: String,
    /// Whitespace-separated categories, as in `data-category`
    pub category: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub progress: u8,
    pub owner: Option<String>,
    pub last_updated: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub links: Vec<ProjectLink>,
    pub metrics: ProjectMetrics,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl CardContent {
    /// Whether any of the card's category tokens equals `category`.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.split_whitespace().any(|c| c == category)
    }
}

impl From<&Project> for CardContent {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            full_description: project.full_description.clone(),
            category: project.category.clone(),
            status: project.status,
            priority: project.priority,
            progress: project.progress,
            owner: project.owner.clone(),
            last_updated: project.last_updated.clone(),
            updated_at: project.updated_at,
            tags: project.tags.clone(),
            technologies: project.technologies.clone(),
            links: project.links.clone(),
            metrics: project.metrics,
            start_date: project.start_date.clone(),
            end_date: project.end_date.clone(),
        }
    }
}

/// One card: what it shows and how it is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub key: CardKey,
    pub content: CardContent,
    pub view: CardView,
}

/// Current criteria of the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub category: Filter<String>,
    pub status: Filter<ProjectStatus>,
    /// Lower-cased search text; empty means no search
    pub search: String,
}

impl Filters {
    /// Logical AND of category, status and search.
    pub fn matches(&self, content: &CardContent) -> bool {
        let category = match &self.category {
            Filter::All => true,
            Filter::Only(category) => content.in_category(category),
        };
        let search = self.search.is_empty()
            || content.title.to_lowercase().contains(&self.search)
            || content.description.to_lowercase().contains(&self.search);
        category && self.status.accepts(&content.status) && search
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Counts over the currently visible cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub visible: usize,
    pub active: usize,
    pub progress: usize,
    pub completed: usize,
}

impl Summary {
    /// Lines shown in the summary bar.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("{} projects", self.visible),
            format!("{} active", self.active),
            format!("{} in progress", self.progress),
            format!("{} completed", self.completed),
        ]
    }
}

/// Coordinator-owned page state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub filters: Filters,
    pub sort: SortKey,
    pub selection_mode: bool,
    pub selected: BTreeSet<CardKey>,
    /// Card whose context menu is open, if any
    pub open_menu: Option<CardKey>,
}

impl AppState {
    pub fn is_selected(&self, key: CardKey) -> bool {
        self.selected.contains(&key)
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }
}
