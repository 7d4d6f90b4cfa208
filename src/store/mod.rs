//! The project store: canonical records and their queries.
//!
//! Every query returns a fresh `Vec` of references in collection order (or in
//! the requested sort order); the canonical collection is only changed by
//! [`ProjectStore::toggle_favorite`] and [`ProjectStore::update`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{
    Filter, FilterOption, Priority, Project, ProjectStats, ProjectStatus, ProjectUpdate, SortKey,
    category_label, compare_titles,
};
use crate::{Error, Result};

/// Dataset shipped with the binary.
const BUNDLED_PROJECTS: &str = include_str!("../../data/projects.json");

/// A conjunction of store filters plus an optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectQuery {
    pub category: Filter<String>,
    pub status: Filter<ProjectStatus>,
    pub priority: Filter<Priority>,
    pub search: String,
    pub favorites_only: bool,
    pub sort: Option<SortKey>,
}

/// Owns the canonical sequence of project records.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Build a store, rejecting duplicate ids and out-of-range progress.
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut seen = HashSet::new();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(Error::DuplicateId(project.id.clone()));
            }
            if project.progress > 100 {
                return Err(Error::InvalidInput(format!(
                    "{}: progress must be 0-100, got {}",
                    project.id, project.progress
                )));
            }
        }
        tracing::debug!(count = projects.len(), "project store loaded");
        Ok(Self { projects })
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let projects: Vec<Project> = serde_json::from_str(json)?;
        Self::new(projects)
    }

    /// Load a JSON dataset from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the collection back as a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.projects)?;
        std::fs::write(path, json + "\n")?;
        tracing::debug!(path = %path.display(), count = self.projects.len(), "project store saved");
        Ok(())
    }

    /// The dataset embedded at build time.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_PROJECTS)
    }

    /// All records in collection order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn filter_by_category(&self, category: &Filter<String>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| category.accepts(&p.category))
            .collect()
    }

    pub fn filter_by_status(&self, status: &Filter<ProjectStatus>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| status.accepts(&p.status))
            .collect()
    }

    pub fn filter_by_priority(&self, priority: &Filter<Priority>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| priority.accepts(&p.priority))
            .collect()
    }

    pub fn favorites(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.is_favorite).collect()
    }

    /// Case-insensitive substring search over title, description and tags.
    pub fn search(&self, query: &str) -> Vec<&Project> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return self.projects.iter().collect();
        }
        self.projects
            .iter()
            .filter(|p| p.matches_query(&needle))
            .collect()
    }

    /// A newly ordered view; the collection itself keeps its order.
    pub fn sort(&self, key: SortKey) -> Vec<&Project> {
        let mut sorted: Vec<&Project> = self.projects.iter().collect();
        sort_projects(&mut sorted, key);
        sorted
    }

    /// Apply every criterion of `query` (logical AND), then its ordering.
    pub fn query(&self, query: &ProjectQuery) -> Vec<&Project> {
        let needle = query.search.to_lowercase();
        let mut matched: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| query.category.accepts(&p.category))
            .filter(|p| query.status.accepts(&p.status))
            .filter(|p| query.priority.accepts(&p.priority))
            .filter(|p| !query.favorites_only || p.is_favorite)
            .filter(|p| needle.is_empty() || p.matches_query(&needle))
            .collect();
        if let Some(key) = query.sort {
            sort_projects(&mut matched, key);
        }
        matched
    }

    /// Flip a record's favorite flag and return the new value.
    ///
    /// Returns `None` (and changes nothing) when `id` is unknown.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let project = self.projects.iter_mut().find(|p| p.id == id)?;
        project.is_favorite = !project.is_favorite;
        tracing::debug!(id, favorite = project.is_favorite, "favorite toggled");
        Some(project.is_favorite)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Shallow-merge `update` into the record with `id`.
    pub fn update(&mut self, id: &str, update: ProjectUpdate) -> Result<&Project> {
        update.validate().map_err(Error::InvalidInput)?;
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        update.apply(project);
        tracing::debug!(id, "project updated");
        Ok(project)
    }

    /// Counts by status plus favorites, recomputed on every call.
    pub fn stats(&self) -> ProjectStats {
        let count = |status: ProjectStatus| self.projects.iter().filter(|p| p.status == status).count();
        ProjectStats {
            total: self.projects.len(),
            active: count(ProjectStatus::Active),
            progress: count(ProjectStatus::Progress),
            completed: count(ProjectStatus::Completed),
            favorites: self.projects.iter().filter(|p| p.is_favorite).count(),
        }
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<FilterOption> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .filter(|p| seen.insert(p.category.as_str()))
            .map(|p| FilterOption {
                value: p.category.clone(),
                label: category_label(&p.category),
                color: None,
            })
            .collect()
    }

    pub fn statuses() -> Vec<FilterOption> {
        ProjectStatus::all().iter().copied().map(FilterOption::from).collect()
    }

    pub fn priorities() -> Vec<FilterOption> {
        Priority::all().iter().copied().map(FilterOption::from).collect()
    }
}

/// Stable in-place ordering shared by [`ProjectStore::sort`] and [`ProjectStore::query`].
fn sort_projects(projects: &mut [&Project], key: SortKey) {
    match key {
        SortKey::Name => projects.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::Priority => projects.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::Progress => projects.sort_by(|a, b| b.progress.cmp(&a.progress)),
        // Newest first; records without a timestamp keep their order at the end.
        SortKey::Date => projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project(id: &str, status: ProjectStatus, priority: Priority) -> Project {
        let mut p = Project::new(id, format!("Project {}", id), "ai");
        p.status = status;
        p.priority = priority;
        p
    }

    /// Eleven records, six of them completed.
    fn eleven_records() -> ProjectStore {
        use ProjectStatus::*;
        let statuses = [
            Completed, Active, Completed, Progress, Completed, Hold, Completed, Completed, Progress,
            Completed, Active,
        ];
        let projects = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| project(&format!("p{}", i), *status, Priority::Medium))
            .collect();
        ProjectStore::new(projects).unwrap()
    }

    #[test]
    fn test_bundled_dataset_loads() {
        let store = ProjectStore::bundled().unwrap();
        assert_eq!(store.len(), 10);
        assert!(store.get_by_id("fraud-detection").is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let projects = vec![
            project("dup", ProjectStatus::Active, Priority::High),
            project("dup", ProjectStatus::Hold, Priority::Low),
        ];
        assert!(matches!(
            ProjectStore::new(projects),
            Err(Error::DuplicateId(id)) if id == "dup"
        ));
    }

    #[test]
    fn test_progress_over_100_rejected() {
        let mut p = project("p", ProjectStatus::Active, Priority::High);
        p.progress = 120;
        assert!(matches!(
            ProjectStore::new(vec![p]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_all_filters_return_everything_in_order() {
        let store = ProjectStore::bundled().unwrap();
        let ids: Vec<&str> = store.projects().iter().map(|p| p.id.as_str()).collect();

        let by_category: Vec<&str> = store
            .filter_by_category(&Filter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        let by_status: Vec<&str> = store
            .filter_by_status(&Filter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        let by_priority: Vec<&str> = store
            .filter_by_priority(&Filter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(by_category, ids);
        assert_eq!(by_status, ids);
        assert_eq!(by_priority, ids);
    }

    #[test]
    fn test_filter_by_category() {
        let store = ProjectStore::bundled().unwrap();
        let ai = store.filter_by_category(&Filter::Only("ai".to_string()));
        assert_eq!(ai.len(), 4);
        assert!(ai.iter().all(|p| p.category == "ai"));
    }

    #[test]
    fn test_eleven_records_six_completed() {
        let store = eleven_records();
        assert_eq!(store.len(), 11);
        assert_eq!(
            store
                .filter_by_status(&Filter::Only(ProjectStatus::Completed))
                .len(),
            6
        );
        assert_eq!(store.stats().completed, 6);
    }

    #[test]
    fn test_search_empty_returns_all() {
        let store = ProjectStore::bundled().unwrap();
        assert_eq!(store.search("").len(), store.len());
    }

    #[test]
    fn test_search_matches_exactly_title_description_or_tag() {
        let store = ProjectStore::bundled().unwrap();
        for query in ["RAG", "python", "dashboard", "terraform", "zzz-nothing"] {
            let needle = query.to_lowercase();
            let expected: Vec<&str> = store
                .projects()
                .iter()
                .filter(|p| {
                    p.title.to_lowercase().contains(&needle)
                        || p.description.to_lowercase().contains(&needle)
                        || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                })
                .map(|p| p.id.as_str())
                .collect();
            let found: Vec<&str> = store.search(query).iter().map(|p| p.id.as_str()).collect();
            assert_eq!(found, expected, "query {}", query);
        }
        assert!(store.search("zzz-nothing").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = ProjectStore::bundled().unwrap();
        assert_eq!(store.search("PYTORCH").len(), store.search("pytorch").len());
        assert!(!store.search("PyTorch").is_empty());
    }

    #[test]
    fn test_sort_name_non_decreasing() {
        let store = ProjectStore::bundled().unwrap();
        let sorted = store.sort(SortKey::Name);
        for pair in sorted.windows(2) {
            assert_ne!(
                compare_titles(&pair[0].title, &pair[1].title),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[test]
    fn test_sort_does_not_mutate_collection() {
        let store = ProjectStore::bundled().unwrap();
        let before: Vec<String> = store.projects().iter().map(|p| p.id.clone()).collect();
        let _ = store.sort(SortKey::Name);
        let after: Vec<String> = store.projects().iter().map(|p| p.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sort_priority_is_grouped_and_stable() {
        let projects = vec![
            project("a", ProjectStatus::Active, Priority::Low),
            project("b", ProjectStatus::Active, Priority::High),
            project("c", ProjectStatus::Active, Priority::Medium),
            project("d", ProjectStatus::Active, Priority::High),
            project("e", ProjectStatus::Active, Priority::Low),
            project("f", ProjectStatus::Active, Priority::Medium),
        ];
        let store = ProjectStore::new(projects).unwrap();
        let ids: Vec<&str> = store
            .sort(SortKey::Priority)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "d", "c", "f", "a", "e"]);
    }

    #[test]
    fn test_sort_progress_descending() {
        let store = ProjectStore::bundled().unwrap();
        let sorted = store.sort(SortKey::Progress);
        for pair in sorted.windows(2) {
            assert!(pair[0].progress >= pair[1].progress);
        }
        assert_eq!(sorted.last().unwrap().id, "website-deploy");
    }

    #[test]
    fn test_sort_date_is_deterministic_newest_first() {
        let store = ProjectStore::bundled().unwrap();
        let first: Vec<&str> = store.sort(SortKey::Date).iter().map(|p| p.id.as_str()).collect();
        let second: Vec<&str> = store.sort(SortKey::Date).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "visa-dashboard");
        assert_eq!(*first.last().unwrap(), "food-delivery-analysis");
    }

    #[test]
    fn test_sort_date_untimestamped_last() {
        let mut older = project("older", ProjectStatus::Active, Priority::Low);
        older.updated_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let undated = project("undated", ProjectStatus::Active, Priority::Low);
        let mut newer = project("newer", ProjectStatus::Active, Priority::Low);
        newer.updated_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let store = ProjectStore::new(vec![older, undated, newer]).unwrap();
        let ids: Vec<&str> = store.sort(SortKey::Date).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older", "undated"]);
    }

    #[test]
    fn test_toggle_favorite_twice_restores() {
        let mut store = ProjectStore::bundled().unwrap();
        let original = store.get_by_id("visa-dashboard").unwrap().is_favorite;
        assert_eq!(store.toggle_favorite("visa-dashboard"), Some(!original));
        assert_eq!(store.toggle_favorite("visa-dashboard"), Some(original));
        assert_eq!(store.get_by_id("visa-dashboard").unwrap().is_favorite, original);
    }

    #[test]
    fn test_toggle_favorite_unknown_id() {
        let mut store = ProjectStore::bundled().unwrap();
        let before = store.projects().to_vec();
        assert_eq!(store.toggle_favorite("missing"), None);
        assert_eq!(store.projects(), before.as_slice());
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = ProjectStore::bundled().unwrap();
        let update = ProjectUpdate {
            status: Some(ProjectStatus::Completed),
            progress: Some(100),
            ..Default::default()
        };
        let updated = store.update("website-deploy", update).unwrap();
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert_eq!(updated.progress, 100);
        assert_eq!(updated.title, "Static Website on S3 + Terraform + GitHub Actions");
    }

    #[test]
    fn test_update_unknown_and_invalid() {
        let mut store = ProjectStore::bundled().unwrap();
        assert!(matches!(
            store.update("missing", ProjectUpdate::new()),
            Err(Error::NotFound(_))
        ));
        let bad = ProjectUpdate {
            progress: Some(150),
            ..Default::default()
        };
        assert!(matches!(
            store.update("visa-dashboard", bad),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(store.get_by_id("visa-dashboard").unwrap().progress, 85);
    }

    #[test]
    fn test_stats_bundled() {
        let store = ProjectStore::bundled().unwrap();
        let stats = store.stats();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.progress, 2);
        assert_eq!(stats.completed, 7);
        assert_eq!(stats.favorites, 3);
    }

    #[test]
    fn test_categories_first_appearance_order() {
        let store = ProjectStore::bundled().unwrap();
        let values: Vec<String> = store.categories().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["data-analysis", "cloud", "data-science", "ai"]);
        assert_eq!(store.categories()[0].label, "Data Analysis");
    }

    #[test]
    fn test_status_and_priority_options_have_colors() {
        let statuses = ProjectStore::statuses();
        assert_eq!(statuses.len(), 4);
        assert!(statuses.iter().all(|o| o.color.is_some()));
        let priorities = ProjectStore::priorities();
        assert_eq!(priorities[0].value, "high");
        assert_eq!(priorities[0].color.as_deref(), Some("#EF4444"));
    }

    #[test]
    fn test_query_combines_criteria() {
        let store = ProjectStore::bundled().unwrap();
        let query = ProjectQuery {
            category: Filter::Only("ai".to_string()),
            status: Filter::Only(ProjectStatus::Completed),
            search: "rag".to_string(),
            ..Default::default()
        };
        let ids: Vec<&str> = store.query(&query).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ai-study-agent"]);

        let favorites = ProjectQuery {
            favorites_only: true,
            sort: Some(SortKey::Name),
            ..Default::default()
        };
        let ids: Vec<&str> = store.query(&favorites).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["ai-study-agent", "movie-recommendation", "website-deploy"]
        );
    }
}
