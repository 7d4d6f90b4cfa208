//! Events the host feeds into the page.

use serde::{Deserialize, Serialize};

use crate::a11y::{FocusTarget, MediaFeature};
use crate::cards::{CardKey, MenuAction};
use crate::cards::projection::{CATEGORY_FILTER_ID, SEARCH_INPUT_ID, STATUS_FILTER_ID};
use crate::input::KeyEvent;
use crate::models::SortKey;

/// Part of a card that was clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRegion {
    /// Anywhere outside the footer and action areas
    #[default]
    Body,
    Footer,
    Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Share,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarButton {
    SelectAll,
    DeselectAll,
    DeleteSelected,
    Close,
}

/// Filter controls, named by their element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    #[serde(rename = "categoryFilter")]
    CategoryFilter,
    #[serde(rename = "statusFilter")]
    StatusFilter,
    #[serde(rename = "searchInput")]
    Search,
}

impl Control {
    pub fn id(&self) -> &'static str {
        match self {
            Control::CategoryFilter => CATEGORY_FILTER_ID,
            Control::StatusFilter => STATUS_FILTER_ID,
            Control::Search => SEARCH_INPUT_ID,
        }
    }
}

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickTarget {
    Card {
        card: CardKey,
        #[serde(default)]
        region: CardRegion,
    },
    Favorite {
        card: CardKey,
    },
    Action {
        card: CardKey,
        action: CardAction,
    },
    MenuItem {
        action: MenuAction,
    },
    Sort {
        sort: SortKey,
    },
    SelectionToggle,
    Toolbar {
        button: ToolbarButton,
    },
    /// Anywhere not covered above
    Elsewhere,
}

/// One host event. JSON shape: `{"type": "click", "target": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Click {
        target: ClickTarget,
    },
    Key {
        #[serde(flatten)]
        event: KeyEvent,
    },
    FocusIn {
        target: FocusTarget,
    },
    FocusOut {
        target: FocusTarget,
    },
    ControlChanged {
        control: Control,
        value: String,
    },
    CheckboxChanged {
        card: CardKey,
        checked: bool,
    },
    PointerEnter {
        card: CardKey,
    },
    PointerLeave {
        card: CardKey,
    },
    MediaChanged {
        feature: MediaFeature,
        matches: bool,
    },
    DialogOpened {
        id: String,
    },
    /// Let `ms` of virtual time pass, firing due timers
    Advance {
        ms: u64,
    },
}

impl InputEvent {
    pub fn click(target: ClickTarget) -> Self {
        InputEvent::Click { target }
    }

    pub fn click_card(card: CardKey) -> Self {
        InputEvent::Click {
            target: ClickTarget::Card {
                card,
                region: CardRegion::Body,
            },
        }
    }

    pub fn key(event: KeyEvent) -> Self {
        InputEvent::Key { event }
    }

    pub fn focus_card(card: CardKey) -> Self {
        InputEvent::FocusIn {
            target: FocusTarget::Card(card),
        }
    }

    pub fn control(control: Control, value: impl Into<String>) -> Self {
        InputEvent::ControlChanged {
            control,
            value: value.into(),
        }
    }

    pub fn advance(ms: u64) -> Self {
        InputEvent::Advance { ms }
    }

    /// Parse one event per non-empty line; lines starting with `#` are
    /// comments.
    pub fn parse_script(script: &str) -> crate::Result<Vec<InputEvent>> {
        script
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| serde_json::from_str(line).map_err(crate::Error::from))
            .collect()
    }
}
