//! Projects coordinator state onto elements.
//!
//! Everything here is a pure function of the view state; rendering twice
//! gives the same tree.

use crate::dom::Element;
use crate::models::{ALL, FilterOption, SortKey};

use super::coordinator::{CardCoordinator, MenuAction};
use super::state::{AppState, Card, CardKey, Motion, Summary};

pub const GRID_ID: &str = "projectCardsGrid";
pub const CATEGORY_FILTER_ID: &str = "categoryFilter";
pub const STATUS_FILTER_ID: &str = "statusFilter";
pub const SEARCH_INPUT_ID: &str = "searchInput";
pub const SELECTION_TOGGLE_ID: &str = "selectionToggle";

/// Per-render context not owned by the card itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    pub focused: Option<CardKey>,
}

fn card_style(card: &Card, ctx: &RenderContext<'_>) -> Vec<(&'static str, &'static str)> {
    let view = &card.view;
    if !view.visible {
        return vec![("display", "none")];
    }
    match view.motion {
        Motion::Entering => vec![("opacity", "0"), ("transform", "translateY(20px)")],
        Motion::Leaving => vec![("opacity", "0"), ("transform", "translateX(-100%)")],
        Motion::Idle if view.archived => vec![("opacity", "0.5"), ("transform", "scale(0.95)")],
        Motion::Idle if view.hovered && !ctx.state.selection_mode => {
            vec![("opacity", "1"), ("transform", "translateY(-2px)")]
        }
        Motion::Idle => vec![("opacity", "1"), ("transform", "translateY(0)")],
    }
}

/// One card element.
pub fn render_card(card: &Card, ctx: &RenderContext<'_>) -> Element {
    let content = &card.content;
    let view = &card.view;
    let focused = ctx.focused == Some(card.key);

    let mut el = Element::new("div")
        .class("project-card")
        .attr("data-card", card.key.0.to_string())
        .attr("data-project", content.project_id.clone())
        .attr("data-category", content.category.clone())
        .attr("data-status", content.status.as_str())
        .attr("data-priority", content.priority.as_str())
        .attr("aria-expanded", view.expanded.to_string());
    for (property, value) in card_style(card, ctx) {
        el = el.css(property, value);
    }
    if view.expanded {
        el.add_class("expanded");
    }
    if view.archived {
        el.add_class("archived");
    }
    if focused {
        el.add_class("focused");
        el.set_attr("aria-selected", "true");
    }
    if ctx.state.is_selected(card.key) {
        el.add_class("selected");
    }

    let favorite_icon = if view.favorite { "fas fa-star" } else { "far fa-star" };
    let mut favorite = Element::new("button")
        .class("favorite-btn")
        .attr("type", "button")
        .child(Element::new("i").class(favorite_icon));
    if view.favorite {
        favorite.add_class("active");
    }

    let header = Element::new("div")
        .class("card-header")
        .child(Element::new("h3").class("card-title").text(content.title.clone()))
        .child(
            Element::new("span")
                .class("status-badge")
                .class(&format!("status-{}", content.status.as_str()))
                .text(content.status.label()),
        )
        .child(
            Element::new("span")
                .class("priority-badge")
                .class(&format!("priority-{}", content.priority.as_str()))
                .text(content.priority.label()),
        )
        .child(favorite);

    let width = format!("{}%", content.progress);
    let progress = Element::new("div")
        .class("progress-container")
        .child(
            Element::new("div")
                .class("progress-bar")
                .child(Element::new("div").class("progress-fill").css("width", width.clone())),
        )
        .child(Element::new("span").class("progress-text").text(width));

    let metrics = &content.metrics;
    let mut expandable = Element::new("div")
        .class("card-expandable")
        .attr("aria-hidden", (!view.expanded).to_string())
        .child(
            Element::new("p")
                .class("card-full-description")
                .text(content.full_description.clone()),
        )
        .child(
            Element::new("div").class("card-technologies").children(
                content
                    .technologies
                    .iter()
                    .map(|t| Element::new("span").class("tech-tag").text(t.clone())),
            ),
        )
        .child(
            Element::new("div")
                .class("card-metrics")
                .child(metric(
                    "Tasks",
                    format!("{}/{}", metrics.tasks.completed, metrics.tasks.total),
                ))
                .child(metric("Comments", metrics.comments.to_string()))
                .child(metric("Contributors", metrics.contributors.to_string())),
        );
    if content.start_date.is_some() || content.end_date.is_some() {
        let dates = format!(
            "{} - {}",
            content.start_date.as_deref().unwrap_or(""),
            content.end_date.as_deref().unwrap_or("Present")
        );
        expandable = expandable.child(Element::new("div").class("card-dates").text(dates));
    }
    if view.expanded {
        expandable.add_class("expanded");
    }

    let mut footer = Element::new("div")
        .class("card-footer")
        .child(
            Element::new("div").class("card-tags").children(
                content
                    .tags
                    .iter()
                    .map(|t| Element::new("span").class("tag").text(t.clone())),
            ),
        )
        .child(
            Element::new("span")
                .class("card-updated")
                .text(format!("Updated {}", content.last_updated)),
        );
    if let Some(ref owner) = content.owner {
        footer = footer.child(Element::new("span").class("card-owner").text(owner.clone()));
    }
    footer = footer.child(
        Element::new("div").class("card-links").children(content.links.iter().map(|link| {
            Element::new("a")
                .class("link-btn")
                .attr("href", link.url.clone())
                .attr("data-link", link.kind.clone())
                .child(Element::new("i").class(&link.icon))
                .text(link.label.clone())
        })),
    );

    let actions = Element::new("div")
        .class("card-actions")
        .child(action_button("share", "fas fa-share-alt"))
        .child(action_button("more", "fas fa-ellipsis-h"));

    el = el
        .child(header)
        .child(Element::new("p").class("card-description").text(content.description.clone()))
        .child(progress)
        .child(expandable)
        .child(footer)
        .child(actions);

    if ctx.state.selection_mode {
        let mut checkbox = Element::new("input")
            .class("card-checkbox")
            .attr("type", "checkbox")
            .attr("data-card", card.key.0.to_string());
        if ctx.state.is_selected(card.key) {
            checkbox.set_attr("checked", "checked");
        }
        el = el.child(checkbox);
    }
    el
}

fn metric(label: &str, value: String) -> Element {
    Element::new("div")
        .class("metric")
        .child(Element::new("span").class("metric-label").text(label))
        .child(Element::new("span").class("metric-value").text(value))
}

fn action_button(action: &str, icon: &str) -> Element {
    Element::new("button")
        .class("action-btn")
        .attr("type", "button")
        .attr("data-action", action)
        .child(Element::new("i").class(icon))
}

pub fn render_grid(coordinator: &CardCoordinator, focused: Option<CardKey>) -> Element {
    let ctx = RenderContext {
        state: coordinator.state(),
        focused,
    };
    Element::new("div")
        .id(GRID_ID)
        .class("project-cards-grid")
        .children(coordinator.grid().iter().map(|card| render_card(card, &ctx)))
}

pub fn render_summary(summary: &Summary) -> Element {
    Element::new("div").class("project-summary").children(
        summary
            .lines()
            .into_iter()
            .map(|line| Element::new("div").class("summary-item").child(Element::new("span").text(line))),
    )
}

fn select(id: &str, options: &[FilterOption], current: &str) -> Element {
    let all = FilterOption {
        value: ALL.to_string(),
        label: "All".to_string(),
        color: None,
    };
    Element::new("select")
        .id(id)
        .class("filter-select")
        .children(std::iter::once(&all).chain(options.iter()).map(|option| {
            let mut el = Element::new("option")
                .attr("value", option.value.clone())
                .text(option.label.clone());
            if option.value == current {
                el.set_attr("selected", "selected");
            }
            el
        }))
}

/// Filter selects, search box, sort buttons and the selection toggle.
pub fn render_controls(state: &AppState, categories: &[FilterOption], statuses: &[FilterOption]) -> Element {
    let filters = &state.filters;
    let search = Element::new("input")
        .id(SEARCH_INPUT_ID)
        .class("search-input")
        .attr("type", "search")
        .attr("placeholder", "Search projects...")
        .attr("value", filters.search.clone());

    let sort_buttons = SortKey::all().iter().map(|key| {
        let mut button = Element::new("button")
            .class("sort-btn")
            .attr("type", "button")
            .attr("data-sort", key.as_str())
            .text(sort_label(*key));
        if *key == state.sort {
            button.add_class("active");
        }
        button
    });

    let mut toggle = Element::new("button")
        .id(SELECTION_TOGGLE_ID)
        .class("selection-toggle")
        .attr("type", "button")
        .text(if state.selection_mode { "Cancel" } else { "Select" });
    if state.selection_mode {
        toggle.add_class("active");
    }

    Element::new("div")
        .class("project-controls")
        .child(
            Element::new("div")
                .class("filter-controls")
                .child(select(CATEGORY_FILTER_ID, categories, &filters.category.to_string()))
                .child(select(STATUS_FILTER_ID, statuses, &filters.status.to_string()))
                .child(search)
                .child(
                    Element::new("span")
                        .id("search-help")
                        .class("sr-only")
                        .text("Search by project title or description"),
                ),
        )
        .child(Element::new("div").class("sort-controls").children(sort_buttons))
        .child(toggle)
}

fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Date => "Date",
        SortKey::Name => "Name",
        SortKey::Priority => "Priority",
        SortKey::Progress => "Progress",
    }
}

/// Toolbar shown while selecting.
pub fn render_selection_toolbar(count: usize) -> Element {
    let button = |id: &str, label: &str| {
        Element::new("button")
            .id(id)
            .class("toolbar-btn")
            .attr("type", "button")
            .text(label)
    };
    Element::new("div")
        .class("selection-toolbar")
        .child(
            Element::new("span")
                .id("selectionCount")
                .class("selection-count")
                .text(format!("{} selected", count)),
        )
        .child(button("selectAll", "Select All"))
        .child(button("deselectAll", "Deselect All"))
        .child(button("deleteSelected", "Delete Selected"))
        .child(button("closeSelection", "Close"))
}

/// The context menu anchored to a card's "more" button.
pub fn render_menu(card: CardKey) -> Element {
    Element::new("div")
        .class("card-dropdown-menu")
        .attr("role", "menu")
        .attr("data-card", card.0.to_string())
        .children(MenuAction::all().iter().map(|action| {
            Element::new("button")
                .class("dropdown-item")
                .attr("type", "button")
                .attr("role", "menuitem")
                .attr("data-action", action.as_str())
                .child(Element::new("i").class(action.icon()))
                .text(action.label())
        }))
}
