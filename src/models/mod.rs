//! Data models for Folio project records.
//!
//! This module defines the core data structures:
//! - `Project` - One portfolio project with display text, tags and metrics
//! - `ProjectStatus` / `Priority` - The fixed tag sets a project is drawn from
//! - `ProjectUpdate` - A shallow patch applied by the store's `update`
//! - `Filter` - A filter criterion where `all` means "no filtering"
//! - `SortKey` - The orderings offered by the page's sort buttons

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel accepted by every filter control meaning "do not filter".
pub const ALL: &str = "all";

/// Project status in the portfolio workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    /// Work underway but not finished ("In Progress" on the page)
    Progress,
    Hold,
    Completed,
}

impl ProjectStatus {
    /// Every status, in the order the status filter lists them.
    pub fn all() -> &'static [ProjectStatus] {
        &[
            ProjectStatus::Active,
            ProjectStatus::Progress,
            ProjectStatus::Hold,
            ProjectStatus::Completed,
        ]
    }

    /// Wire value used in data files and `data-status` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Progress => "progress",
            ProjectStatus::Hold => "hold",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Display label shown on status badges.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Progress => "In Progress",
            ProjectStatus::Hold => "On Hold",
            ProjectStatus::Completed => "Completed",
        }
    }

    /// Badge color tag.
    pub fn color(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "#10B981",
            ProjectStatus::Progress => "#F59E0B",
            ProjectStatus::Hold => "#6B7280",
            ProjectStatus::Completed => "#3B82F6",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "progress" | "in_progress" => Ok(ProjectStatus::Progress),
            "hold" | "on_hold" => Ok(ProjectStatus::Hold),
            "completed" => Ok(ProjectStatus::Completed),
            _ => Err(format!(
                "Invalid status: {}. Valid values: active, progress, hold, completed",
                s
            )),
        }
    }
}

/// Project priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Every priority, highest first.
    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }

    /// Sort rank; higher ranks sort first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Priority::High => "#EF4444",
            Priority::Medium => "#F59E0B",
            Priority::Low => "#6B7280",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!(
                "Invalid priority: {}. Valid values: high, medium, low",
                s
            )),
        }
    }
}

/// An external reference shown as a link button on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    /// Link kind (e.g., "details", "demo", "github")
    #[serde(rename = "type")]
    pub kind: String,

    /// Button label
    pub label: String,

    /// Target URL, opaque to the store
    pub url: String,

    /// Icon class (e.g., "fab fa-github")
    pub icon: String,
}

/// Completed/total task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub completed: u32,
    pub total: u32,
}

/// Display-only activity counts; never recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    #[serde(default)]
    pub tasks: TaskCounts,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub contributors: u32,
}

/// A portfolio project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier (e.g., "fraud-detection"), stable for the record's lifetime
    pub id: String,

    /// Card title
    pub title: String,

    /// Short description shown on the collapsed card
    pub description: String,

    /// Long description shown in the expanded region
    #[serde(default)]
    pub full_description: String,

    /// Category slug (e.g., "data-science")
    pub category: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default)]
    pub priority: Priority,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Free-text relative time for display (e.g., "3 days ago")
    #[serde(default)]
    pub last_updated: String,

    /// True last-modified instant, used by the date sort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub links: Vec<ProjectLink>,

    #[serde(default)]
    pub metrics: ProjectMetrics,

    #[serde(default)]
    pub technologies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default)]
    pub is_favorite: bool,
}

impl Project {
    /// Create a project with the given identity and defaults for everything else.
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            full_description: String::new(),
            category: category.into(),
            status: ProjectStatus::default(),
            priority: Priority::default(),
            progress: 0,
            owner: None,
            last_updated: String::new(),
            updated_at: None,
            tags: Vec::new(),
            links: Vec::new(),
            metrics: ProjectMetrics::default(),
            technologies: Vec::new(),
            start_date: None,
            end_date: None,
            is_favorite: false,
        }
    }

    /// Case-insensitive substring match against title, description and tags.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Shallow patch for [`Project`]; `None` fields are left untouched.
///
/// The identifier is deliberately absent: ids are immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub progress: Option<u8>,
    pub owner: Option<String>,
    pub last_updated: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
}

impl ProjectUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the patch against record invariants.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(progress) = self.progress {
            if progress > 100 {
                return Err(format!("progress must be 0-100, got {}", progress));
            }
        }
        Ok(())
    }

    /// True when the patch sets no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the patch into `project`.
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(full_description) = self.full_description {
            project.full_description = full_description;
        }
        if let Some(category) = self.category {
            project.category = category;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if self.owner.is_some() {
            project.owner = self.owner;
        }
        if let Some(last_updated) = self.last_updated {
            project.last_updated = last_updated;
        }
        if self.updated_at.is_some() {
            project.updated_at = self.updated_at;
        }
        if let Some(tags) = self.tags {
            project.tags = tags;
        }
        if let Some(technologies) = self.technologies {
            project.technologies = technologies;
        }
        if let Some(is_favorite) = self.is_favorite {
            project.is_favorite = is_favorite;
        }
    }
}

/// Aggregate counts over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    pub progress: usize,
    pub completed: usize,
    pub favorites: usize,
}

/// One entry of a filter `<select>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<ProjectStatus> for FilterOption {
    fn from(status: ProjectStatus) -> Self {
        Self {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            color: Some(status.color().to_string()),
        }
    }
}

impl From<Priority> for FilterOption {
    fn from(priority: Priority) -> Self {
        Self {
            value: priority.as_str().to_string(),
            label: priority.label().to_string(),
            color: Some(priority.color().to_string()),
        }
    }
}

/// Turn a category slug into its display label ("data-analysis" -> "Data Analysis").
pub fn category_label(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A filter criterion: everything, or only values equal to `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    /// Whether `value` passes this filter.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Filter<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "{}", ALL),
            Filter::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<T: fmt::Display> Serialize for Filter<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Filter<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Orderings offered by the sort buttons (`data-sort` values).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    Date,
    Name,
    Priority,
    Progress,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Date,
            SortKey::Name,
            SortKey::Priority,
            SortKey::Progress,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Name => "name",
            SortKey::Priority => "priority",
            SortKey::Progress => "progress",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            "priority" => Ok(SortKey::Priority),
            "progress" => Ok(SortKey::Progress),
            _ => Err(format!(
                "Invalid sort key: {}. Valid values: date, name, priority, progress",
                s
            )),
        }
    }
}

/// Title ordering used by the name sort: case-insensitive first, then exact.
pub fn compare_titles(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
