//! ARIA upkeep over the projected element tree.
//!
//! Runs after every render. Values are derived from what the projection
//! rendered (texts, classes, the progress fill width), so this pass never
//! needs the underlying state.

use crate::cards::projection::{CATEGORY_FILTER_ID, GRID_ID, SEARCH_INPUT_ID, STATUS_FILTER_ID};
use crate::dom::{Element, Node};

use super::labels::{action_label, card_description, card_label, favorite_label, parse_percentage};

pub const MAIN_CONTENT_ID: &str = "main-content";

/// Decorate `root` in place.
pub fn decorate(root: &mut Element) {
    root.for_each_with_class("project-card", &mut decorate_card);
    decorate_landmarks(root);
    decorate_controls(root);
    ensure_skip_link(root);
}

fn decorate_card(card: &mut Element) {
    let title = card
        .find_by_class("card-title")
        .map(Element::text_content)
        .unwrap_or_default();
    let description = card
        .find_by_class("card-description")
        .map(Element::text_content)
        .unwrap_or_default();
    let status = card
        .find_by_class("status-badge")
        .map(Element::text_content)
        .unwrap_or_default();
    let width = card
        .find_by_class("progress-fill")
        .and_then(|fill| fill.get_style("width"))
        .map(str::to_string);

    card.set_attr("role", "button");
    card.set_attr("tabindex", "0");
    if card.get_attr("aria-expanded").is_none() {
        card.set_attr("aria-expanded", "false");
    }
    if title.is_empty() {
        tracing::debug!("card without a title, skipping label");
    } else {
        card.set_attr("aria-label", card_label(&title, &description));
    }

    card.for_each_with_class("card-title", &mut |el| {
        el.set_attr("role", "heading");
        el.set_attr("aria-level", "3");
    });

    card.for_each_with_class("status-badge", &mut |el| {
        let text = el.text_content();
        el.set_attr("role", "status");
        el.set_attr("aria-label", format!("Project status: {}", text.trim()));
    });

    let percent = width.as_deref().and_then(parse_percentage);
    card.for_each_with_class("progress-bar", &mut |el| {
        el.set_attr("role", "progressbar");
        el.set_attr("aria-valuemin", "0");
        el.set_attr("aria-valuemax", "100");
        match (percent, width.as_deref()) {
            (Some(value), Some(width)) => {
                el.set_attr("aria-valuenow", value.to_string());
                el.set_attr("aria-label", format!("Progress: {}", width));
            }
            _ => tracing::debug!(?width, "progress width not a percentage"),
        }
    });

    card.for_each_with_class("action-btn", &mut |el| {
        let icon = el
            .find_all_by_tag("i")
            .first()
            .map(|i| i.class_name())
            .unwrap_or_default();
        let label = action_label(&icon);
        el.set_attr("aria-label", label);
        el.set_attr("title", label);
    });

    card.for_each_with_class("favorite-btn", &mut |el| {
        let active = el.has_class("active");
        el.set_attr("aria-label", favorite_label(active));
        el.set_attr("aria-pressed", active.to_string());
        el.set_attr("title", favorite_label(active));
    });

    if card.find_by_class("sr-only").is_none() {
        let progress = width.as_deref().unwrap_or("0%");
        let text = card_description(&title, &status, &description, progress);
        card.children
            .push(Node::Element(Element::new("div").class("sr-only").text(text)));
    }
}

fn decorate_landmarks(root: &mut Element) {
    root.for_each_descendant(&mut |el| {
        if el.tag == "main" {
            el.set_attr("role", "main");
            if el.get_attr("id").is_none() {
                el.set_attr("id", MAIN_CONTENT_ID);
            }
        } else if el.tag == "nav" {
            el.set_attr("role", "navigation");
        }
    });
    root.for_each_descendant(&mut |el| {
        if el.get_attr("id") == Some(GRID_ID) {
            el.set_attr("role", "grid");
            el.set_attr("aria-label", "Project cards grid");
        }
    });
}

fn decorate_controls(root: &mut Element) {
    root.for_each_descendant(&mut |el| {
        let id = el.get_attr("id").map(str::to_string);
        match id.as_deref() {
            Some(CATEGORY_FILTER_ID) => el.set_attr("aria-label", "Filter projects by category"),
            Some(STATUS_FILTER_ID) => el.set_attr("aria-label", "Filter projects by status"),
            Some(SEARCH_INPUT_ID) => {
                el.set_attr("aria-label", "Search projects");
                el.set_attr("aria-describedby", "search-help");
            }
            _ => {}
        }
        if el.has_class("sort-btn") {
            if let Some(sort) = el.get_attr("data-sort").map(str::to_string) {
                el.set_attr("aria-label", format!("Sort by {}", sort));
            }
        }
        if el.has_class("quick-action-btn") {
            let text = el.text_content();
            el.set_attr("aria-label", text.trim());
        }
    });
}

fn ensure_skip_link(root: &mut Element) {
    if root.find_by_class("skip-link").is_some() {
        return;
    }
    let link = Element::new("a")
        .class("skip-link")
        .attr("href", format!("#{}", MAIN_CONTENT_ID))
        .text("Skip to main content");
    root.children.insert(0, Node::Element(link));
}
