//! Accessible names and descriptions derived from card content.

/// Icon class fragments and the label their button gets. First match wins.
const ICON_LABELS: &[(&str, &str)] = &[
    ("share", "Share project"),
    ("ellipsis", "More options"),
    ("star", "Toggle favorite"),
    ("eye", "View project"),
    ("external-link", "Open demo"),
    ("github", "View on GitHub"),
];

const FALLBACK_ACTION_LABEL: &str = "Action";

/// Label for an icon-only button, from its icon's class list.
pub fn action_label(icon_class: &str) -> &'static str {
    ICON_LABELS
        .iter()
        .find(|(fragment, _)| icon_class.contains(fragment))
        .map(|(_, label)| *label)
        .unwrap_or(FALLBACK_ACTION_LABEL)
}

pub fn favorite_label(active: bool) -> &'static str {
    if active {
        "Remove from favorites"
    } else {
        "Add to favorites"
    }
}

/// Parse a CSS percentage width such as `"85%"` into a whole percent.
pub fn parse_percentage(width: &str) -> Option<u8> {
    let number = width.trim().strip_suffix('%')?.trim();
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// `aria-label` of a card: "Title. Description".
pub fn card_label(title: &str, description: &str) -> String {
    format!("{}. {}", title.trim(), description.trim())
}

/// Hidden text appended to each card for screen readers.
pub fn card_description(title: &str, status: &str, description: &str, progress: &str) -> String {
    format!(
        "{}. Status: {}. {}. Progress: {}. Click to expand for more details.",
        title.trim(),
        status.trim(),
        description.trim(),
        progress.trim()
    )
}

/// Announcement when a card receives focus.
pub fn focus_announcement(title: &str, status: &str, description: &str) -> String {
    format!(
        "Focused on project: {}. Status: {}. {}",
        title.trim(),
        status.trim(),
        description.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_labels_by_icon() {
        assert_eq!(action_label("fas fa-share-alt"), "Share project");
        assert_eq!(action_label("fas fa-ellipsis-h"), "More options");
        assert_eq!(action_label("far fa-star"), "Toggle favorite");
        assert_eq!(action_label("fas fa-external-link-alt"), "Open demo");
        assert_eq!(action_label("fab fa-github"), "View on GitHub");
        assert_eq!(action_label("fas fa-cog"), "Action");
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("85%"), Some(85));
        assert_eq!(parse_percentage(" 100% "), Some(100));
        assert_eq!(parse_percentage("12.6%"), Some(13));
        assert_eq!(parse_percentage("85px"), None);
        assert_eq!(parse_percentage("%"), None);
    }

    #[test]
    fn test_card_description() {
        assert_eq!(
            card_description("Alpha", "Active", "First one", "85%"),
            "Alpha. Status: Active. First one. Progress: 85%. Click to expand for more details."
        );
    }
}
