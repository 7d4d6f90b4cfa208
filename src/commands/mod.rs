//! Command implementations for the folio CLI.
//!
//! Each command takes the loaded store (and page options where a page is
//! built) and returns a result struct implementing [`Output`]. Commands are
//! grouped by what they touch:
//! - store queries: `list`, `show`, `stats`, `options`
//! - store mutations: `favorite`, `update`
//! - the page: `render`, `replay`
//! - configuration: `config show|get|set`

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cards::{CardKey, Summary};
use crate::config::{
    ConfigOverrides, FolioConfig, ResolvedConfig,
    resolver::{config_dir, read_config_file, write_config_file},
};
use crate::models::{FilterOption, Project, ProjectStats, ProjectUpdate, SortKey};
use crate::page::{ClickTarget, Control, Effect, HeadlessHost, InputEvent, Page, PageOptions};
use crate::store::{ProjectQuery, ProjectStore};
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
}

fn project_line(project: &Project) -> String {
    let star = if project.is_favorite { "*" } else { " " };
    format!(
        "{} {:<24} {:<11} {:>3}%  {}",
        star,
        project.id,
        project.status.label(),
        project.progress,
        project.title
    )
}

// === Overview ===

#[derive(Serialize)]
pub struct Overview {
    pub total: usize,
    pub stats: ProjectStats,
    pub categories: Vec<String>,
    pub data_file: Option<PathBuf>,
}

impl Output for Overview {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("{} projects", self.total),
            format!(
                "  {} active, {} in progress, {} completed, {} favorites",
                self.stats.active, self.stats.progress, self.stats.completed, self.stats.favorites
            ),
            format!("  categories: {}", self.categories.join(", ")),
        ];
        match &self.data_file {
            Some(path) => lines.push(format!("  data: {}", path.display())),
            None => lines.push("  data: bundled".to_string()),
        }
        lines.push(String::new());
        lines.push("Run `folio list` to see the projects, `folio --help` for more.".to_string());
        lines.join("\n")
    }
}

pub fn overview(store: &ProjectStore, data_file: Option<&Path>) -> Overview {
    Overview {
        total: store.len(),
        stats: store.stats(),
        categories: store.categories().into_iter().map(|c| c.value).collect(),
        data_file: data_file.map(Path::to_path_buf),
    }
}

// === Store queries ===

#[derive(Serialize)]
pub struct ProjectList {
    pub count: usize,
    pub projects: Vec<Project>,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects found.".to_string();
        }
        let mut lines = vec![format!("{} project(s):", self.count)];
        lines.extend(self.projects.iter().map(project_line));
        lines.join("\n")
    }
}

pub fn list(store: &ProjectStore, query: &ProjectQuery) -> ProjectList {
    let projects: Vec<Project> = store.query(query).into_iter().cloned().collect();
    tracing::debug!(matched = projects.len(), "list");
    ProjectList {
        count: projects.len(),
        projects,
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ProjectShow(pub Project);

impl Output for ProjectShow {
    fn to_json(&self) -> String {
        json(&self.0)
    }

    fn to_human(&self) -> String {
        let p = &self.0;
        let mut lines = vec![
            format!("{} [{}]", p.title, p.id),
            format!(
                "  Status: {}  Priority: {}  Progress: {}%",
                p.status.label(),
                p.priority.label(),
                p.progress
            ),
            format!("  Category: {}", p.category),
        ];
        if let Some(ref owner) = p.owner {
            lines.push(format!("  Owner: {}", owner));
        }
        if !p.last_updated.is_empty() {
            lines.push(format!("  Updated: {}", p.last_updated));
        }
        if p.is_favorite {
            lines.push("  Favorite".to_string());
        }
        lines.push(String::new());
        lines.push(format!("  {}", p.description));
        if !p.full_description.is_empty() {
            lines.push(format!("  {}", p.full_description));
        }
        if !p.tags.is_empty() {
            lines.push(format!("  Tags: {}", p.tags.join(", ")));
        }
        if !p.technologies.is_empty() {
            lines.push(format!("  Technologies: {}", p.technologies.join(", ")));
        }
        for link in &p.links {
            lines.push(format!("  {}: {}", link.label, link.url));
        }
        lines.join("\n")
    }
}

pub fn show(store: &ProjectStore, id: &str) -> Result<ProjectShow> {
    store
        .get_by_id(id)
        .cloned()
        .map(ProjectShow)
        .ok_or_else(|| Error::NotFound(id.to_string()))
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct StatsResult(pub ProjectStats);

impl Output for StatsResult {
    fn to_json(&self) -> String {
        json(&self.0)
    }

    fn to_human(&self) -> String {
        let s = &self.0;
        format!(
            "Total: {}\nActive: {}\nIn progress: {}\nCompleted: {}\nFavorites: {}",
            s.total, s.active, s.progress, s.completed, s.favorites
        )
    }
}

pub fn stats(store: &ProjectStore) -> StatsResult {
    StatsResult(store.stats())
}

#[derive(Serialize)]
pub struct FilterOptions {
    pub categories: Vec<FilterOption>,
    pub statuses: Vec<FilterOption>,
    pub priorities: Vec<FilterOption>,
    pub sorts: Vec<&'static str>,
}

impl Output for FilterOptions {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let section = |name: &str, options: &[FilterOption]| {
            let mut lines = vec![format!("{}:", name)];
            lines.extend(options.iter().map(|o| format!("  {:<16} {}", o.value, o.label)));
            lines.join("\n")
        };
        [
            section("Categories", &self.categories),
            section("Statuses", &self.statuses),
            section("Priorities", &self.priorities),
            format!("Sorts: {}", self.sorts.join(", ")),
        ]
        .join("\n")
    }
}

pub fn options(store: &ProjectStore) -> FilterOptions {
    FilterOptions {
        categories: store.categories(),
        statuses: ProjectStore::statuses(),
        priorities: ProjectStore::priorities(),
        sorts: SortKey::all().iter().map(SortKey::as_str).collect(),
    }
}

// === Store mutations ===

#[derive(Serialize)]
pub struct FavoriteResult {
    pub id: String,
    pub is_favorite: bool,
    /// Where the change was written, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

impl Output for FavoriteResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let verb = if self.is_favorite { "Added" } else { "Removed" };
        let mut out = format!("{} {} {} favorites", verb, self.id, if self.is_favorite { "to" } else { "from" });
        if let Some(ref path) = self.saved_to {
            out.push_str(&format!(" (saved to {})", path.display()));
        }
        out
    }
}

/// Flip a favorite flag. With `save_to`, the whole dataset is written back.
pub fn favorite(store: &mut ProjectStore, id: &str, save_to: Option<&Path>) -> Result<FavoriteResult> {
    let is_favorite = store
        .toggle_favorite(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    if let Some(path) = save_to {
        store.save(path)?;
    }
    Ok(FavoriteResult {
        id: id.to_string(),
        is_favorite,
        saved_to: save_to.map(Path::to_path_buf),
    })
}

#[derive(Serialize)]
pub struct UpdateResult {
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

impl Output for UpdateResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut out = format!("Updated {}\n{}", self.project.id, project_line(&self.project));
        if let Some(ref path) = self.saved_to {
            out.push_str(&format!("\n(saved to {})", path.display()));
        }
        out
    }
}

pub fn update(
    store: &mut ProjectStore,
    id: &str,
    patch: ProjectUpdate,
    save_to: Option<&Path>,
) -> Result<UpdateResult> {
    if patch.is_empty() {
        return Err(Error::InvalidInput(
            "Nothing to update: pass at least one field".to_string(),
        ));
    }
    let project = store.update(id, patch)?.clone();
    if let Some(path) = save_to {
        store.save(path)?;
    }
    Ok(UpdateResult {
        project,
        saved_to: save_to.map(Path::to_path_buf),
    })
}

// === Page ===

/// Page state to set up before rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    /// Project ids whose cards start expanded
    pub expand: Vec<String>,
    pub selection_mode: bool,
}

#[derive(Serialize)]
pub struct RenderResult {
    pub summary: Summary,
    pub html: String,
}

impl Output for RenderResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.html.clone()
    }
}

fn card_for_project(page: &Page, id: &str) -> Result<CardKey> {
    page.cards()
        .grid()
        .iter()
        .find(|card| card.content.project_id == id)
        .map(|card| card.key)
        .ok_or_else(|| Error::NotFound(id.to_string()))
}

/// Build the page, apply the request through ordinary events, let every
/// transition finish and project the result.
pub fn render(store: ProjectStore, options: PageOptions, request: &RenderRequest) -> Result<RenderResult> {
    let mut page = Page::new(store, options);
    let mut host = HeadlessHost::new();
    let mut events = Vec::new();
    if let Some(ref category) = request.category {
        events.push(InputEvent::control(Control::CategoryFilter, category.clone()));
    }
    if let Some(ref status) = request.status {
        events.push(InputEvent::control(Control::StatusFilter, status.clone()));
    }
    if let Some(ref search) = request.search {
        events.push(InputEvent::control(Control::Search, search.clone()));
    }
    if let Some(sort) = request.sort {
        events.push(InputEvent::click(ClickTarget::Sort { sort }));
    }
    for id in &request.expand {
        events.push(InputEvent::click_card(card_for_project(&page, id)?));
    }
    if request.selection_mode {
        events.push(InputEvent::click(ClickTarget::SelectionToggle));
    }
    for event in events {
        page.handle(event, &mut host)?;
    }
    page.settle();
    Ok(RenderResult {
        summary: page.cards().summary(),
        html: page.to_html(),
    })
}

/// How the headless host answers prompts during a replay.
#[derive(Debug, Clone)]
pub struct ReplayHost {
    pub confirm: bool,
    pub share: bool,
    pub viewport_height: Option<f64>,
}

impl Default for ReplayHost {
    fn default() -> Self {
        Self {
            confirm: true,
            share: false,
            viewport_height: None,
        }
    }
}

#[derive(Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: InputEvent,
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ReplayResult {
    pub steps: Vec<ReplayStep>,
    /// Virtual time after the last event
    pub now: u64,
    pub summary: Summary,
    pub cards: usize,
    pub prompts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Output for ReplayResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for step in &self.steps {
            lines.push(format!("#{} {}", step.index, json(&step.event)));
            for effect in &step.effects {
                lines.push(format!("    -> {}", json(effect)));
            }
            if let Some(ref error) = step.error {
                lines.push(format!("    !! {}", error));
            }
        }
        for prompt in &self.prompts {
            lines.push(format!("confirm: {}", prompt));
        }
        lines.push(format!(
            "t={}ms, {} cards, {}",
            self.now,
            self.cards,
            self.summary.lines().join(", ")
        ));
        if let Some(ref html) = self.html {
            lines.push(html.clone());
        }
        lines.join("\n")
    }
}

/// Feed a script of events to a fresh page and record the effects of each.
///
/// A failing event is recorded on its step and the replay continues.
pub fn replay(
    store: ProjectStore,
    options: PageOptions,
    script: &str,
    host_setup: &ReplayHost,
    include_html: bool,
) -> Result<ReplayResult> {
    let events = InputEvent::parse_script(script)?;
    let mut page = Page::new(store, options);
    let mut host = HeadlessHost::new()
        .with_default_answer(host_setup.confirm)
        .with_share(host_setup.share);
    if let Some(height) = host_setup.viewport_height {
        host = host.with_viewport_height(height);
    }

    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.into_iter().enumerate() {
        let (effects, error) = match page.handle(event.clone(), &mut host) {
            Ok(effects) => (effects, None),
            Err(e) => {
                tracing::warn!(index, error = %e, "replay event rejected");
                (Vec::new(), Some(e.to_string()))
            }
        };
        steps.push(ReplayStep {
            index,
            event,
            effects,
            error,
        });
    }

    Ok(ReplayResult {
        steps,
        now: page.now(),
        summary: page.cards().summary(),
        cards: page.cards().grid().len(),
        prompts: host.prompts().to_vec(),
        html: include_html.then(|| page.to_html()),
    })
}

// === Config ===

#[derive(Serialize)]
#[serde(transparent)]
pub struct ConfigShow(pub ResolvedConfig);

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(&self.0)
    }

    fn to_human(&self) -> String {
        let c = &self.0;
        let t = c.timings.value;
        let mut lines = vec![
            format!("output-format: {} ({})", c.output_format.value, c.output_format.source),
            format!("default-sort: {} ({})", c.default_sort.value, c.default_sort.source),
            format!("page-url: {} ({})", c.page_url.value, c.page_url.source),
        ];
        match &c.data_file {
            Some(file) => lines.push(format!("data-file: {} ({})", file.value.display(), file.source)),
            None => lines.push("data-file: bundled (default)".to_string()),
        }
        lines.push(format!("timings ({}):", c.timings.source));
        lines.push(format!("  notification-ms: {}", t.notification_ms));
        lines.push(format!("  notification-exit-ms: {}", t.notification_exit_ms));
        lines.push(format!("  announce-clear-ms: {}", t.announce_clear_ms));
        lines.push(format!("  stagger-ms: {}", t.stagger_ms));
        lines.push(format!("  fade-in-ms: {}", t.fade_in_ms));
        lines.push(format!("  exit-transition-ms: {}", t.exit_transition_ms));
        lines.join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    ConfigShow(config.clone())
}

#[derive(Serialize)]
pub struct ConfigValue {
    pub key: String,
    pub value: Option<String>,
    pub path: PathBuf,
}

impl Output for ConfigValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.key, value),
            None => format!("{} is not set in {}", self.key, self.path.display()),
        }
    }
}

fn require_config_dir(overrides: &ConfigOverrides) -> Result<PathBuf> {
    config_dir(overrides)
        .ok_or_else(|| Error::Other("Could not determine a config directory".to_string()))
}

fn check_key(key: &str) -> Result<()> {
    if FolioConfig::keys().any(|k| k == key) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Unknown config key: {}", key)))
    }
}

/// Value of one key as written in config.kdl (not the resolved value).
pub fn config_get(overrides: &ConfigOverrides, key: &str) -> Result<ConfigValue> {
    check_key(key)?;
    let dir = require_config_dir(overrides)?;
    let config = read_config_file(&dir)?;
    Ok(ConfigValue {
        key: key.to_string(),
        value: config.get(key),
        path: dir.join(crate::config::resolver::CONFIG_FILE_NAME),
    })
}

pub fn config_set(overrides: &ConfigOverrides, key: &str, value: &str) -> Result<ConfigValue> {
    check_key(key)?;
    let dir = require_config_dir(overrides)?;
    let mut config = read_config_file(&dir)?;
    config.set(key, value).map_err(Error::InvalidInput)?;
    let path = write_config_file(&dir, &config)?;
    tracing::debug!(key, path = %path.display(), "config value written");
    Ok(ConfigValue {
        key: key.to_string(),
        value: config.get(key),
        path,
    })
}
