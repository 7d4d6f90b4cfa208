//! End-to-end page scenarios driven through the library API.
//!
//! These mirror what a browser host does: feed events, apply effects,
//! advance virtual time, and inspect the projected tree.

use folio::a11y::FocusTarget;
use folio::cards::{CardKey, MenuAction};
use folio::input::{Key, KeyEvent};
use folio::models::{Filter, Project, ProjectStatus, SortKey};
use folio::page::{
    CardAction, ClickTarget, Control, Effect, HeadlessHost, InputEvent, Page, PageOptions,
    ToolbarButton,
};
use folio::store::ProjectStore;

fn store(titles: &[(&str, ProjectStatus)]) -> ProjectStore {
    let projects = titles
        .iter()
        .enumerate()
        .map(|(i, (title, status))| {
            let mut p = Project::new(format!("p{}", i), *title, "ai");
            p.status = *status;
            p.description = format!("{} description", title);
            p
        })
        .collect();
    ProjectStore::new(projects).unwrap()
}

fn three() -> Page {
    use ProjectStatus::*;
    Page::new(
        store(&[("Alpha", Active), ("Beta", Completed), ("Gamma", Progress)]),
        PageOptions::default(),
    )
}

fn send(page: &mut Page, host: &mut HeadlessHost, event: InputEvent) -> Vec<Effect> {
    page.handle(event, host).unwrap()
}

#[test]
fn test_eleven_records_six_completed() {
    use ProjectStatus::*;
    let store = store(&[
        ("A", Completed),
        ("B", Active),
        ("C", Completed),
        ("D", Progress),
        ("E", Completed),
        ("F", Hold),
        ("G", Completed),
        ("H", Completed),
        ("I", Progress),
        ("J", Completed),
        ("K", Active),
    ]);
    assert_eq!(store.filter_by_status(&Filter::Only(Completed)).len(), 6);
    assert_eq!(store.stats().completed, 6);

    let page = Page::new(store, PageOptions::default());
    assert_eq!(page.cards().summary().completed, 6);
    assert_eq!(page.cards().summary().visible, 11);
}

#[test]
fn test_expand_then_collapse_restores_card() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    page.settle();
    let before = page.render_card(CardKey(1)).unwrap();

    send(&mut page, &mut host, InputEvent::click_card(CardKey(1)));
    let expanded = page.render_card(CardKey(1)).unwrap();
    assert_eq!(expanded.get_attr("aria-expanded"), Some("true"));
    assert!(expanded.has_class("expanded"));

    send(&mut page, &mut host, InputEvent::click_card(CardKey(1)));
    assert_eq!(page.render_card(CardKey(1)).unwrap(), before);
}

#[test]
fn test_click_in_footer_does_not_toggle() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(
        &mut page,
        &mut host,
        InputEvent::click(ClickTarget::Card {
            card: CardKey(0),
            region: folio::page::CardRegion::Footer,
        }),
    );
    assert!(!page.cards().card(CardKey(0)).unwrap().view.expanded);
}

#[test]
fn test_enter_and_exit_selection_mode() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(&mut page, &mut host, InputEvent::key(KeyEvent::ctrl(Key::Char('s'))));
    let root = page.render();
    assert_eq!(root.find_all_by_class("card-checkbox").len(), 3);
    assert!(root.find_by_id("selectAll").is_some());

    send(&mut page, &mut host, InputEvent::click(ClickTarget::Toolbar { button: ToolbarButton::SelectAll }));
    assert_eq!(page.cards().state().selection_count(), 3);

    send(&mut page, &mut host, InputEvent::key(KeyEvent::new(Key::Escape)));
    assert!(page.cards().state().selected.is_empty());
    let root = page.render();
    assert!(root.find_by_class("card-checkbox").is_none());
    assert!(root.find_by_id("selectAll").is_none());
    assert!(!root.find_by_class("project-list-container").unwrap().has_class("selection-mode"));
}

#[test]
fn test_arrow_down_from_last_card_wraps() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(&mut page, &mut host, InputEvent::focus_card(CardKey(2)));
    let effects = send(&mut page, &mut host, InputEvent::key(KeyEvent::new(Key::ArrowDown)));
    assert!(effects.contains(&Effect::Focus {
        target: FocusTarget::Card(CardKey(0))
    }));
    assert_eq!(page.a11y().live().text(), "Navigated to Alpha");

    let effects = send(&mut page, &mut host, InputEvent::key(KeyEvent::new(Key::ArrowLeft)));
    assert!(effects.contains(&Effect::Focus {
        target: FocusTarget::Card(CardKey(2))
    }));
}

#[test]
fn test_navigation_skips_hidden_cards() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(&mut page, &mut host, InputEvent::control(Control::StatusFilter, "progress"));
    send(&mut page, &mut host, InputEvent::focus_card(CardKey(2)));
    send(&mut page, &mut host, InputEvent::key(KeyEvent::new(Key::ArrowDown)));
    assert_eq!(page.a11y().focused_card(), Some(CardKey(2)));
}

#[test]
fn test_delete_two_of_three() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(&mut page, &mut host, InputEvent::click(ClickTarget::SelectionToggle));
    for card in [CardKey(0), CardKey(2)] {
        send(&mut page, &mut host, InputEvent::CheckboxChanged { card, checked: true });
    }
    send(
        &mut page,
        &mut host,
        InputEvent::click(ClickTarget::Toolbar {
            button: ToolbarButton::DeleteSelected,
        }),
    );
    assert!(page.cards().state().selected.is_empty());
    // Cards leave after their exit transition.
    assert_eq!(page.cards().grid().len(), 3);
    send(&mut page, &mut host, InputEvent::advance(300));
    assert_eq!(page.cards().grid().keys(), vec![CardKey(1)]);
    assert_eq!(page.cards().summary().visible, 1);
}

#[test]
fn test_cancelled_delete_changes_nothing() {
    let mut page = three();
    let mut host = HeadlessHost::new().with_default_answer(false);
    send(&mut page, &mut host, InputEvent::click(ClickTarget::SelectionToggle));
    send(&mut page, &mut host, InputEvent::CheckboxChanged { card: CardKey(1), checked: true });
    let effects = send(
        &mut page,
        &mut host,
        InputEvent::click(ClickTarget::Toolbar {
            button: ToolbarButton::DeleteSelected,
        }),
    );
    assert!(effects.is_empty());
    assert_eq!(page.cards().state().selection_count(), 1);
    page.settle();
    assert_eq!(page.cards().grid().len(), 3);
}

#[test]
fn test_duplicate_is_a_full_card() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    send(
        &mut page,
        &mut host,
        InputEvent::click(ClickTarget::Action {
            card: CardKey(0),
            action: CardAction::More,
        }),
    );
    send(&mut page, &mut host, InputEvent::click(ClickTarget::MenuItem { action: MenuAction::Duplicate }));
    let copy = CardKey(3);
    assert_eq!(page.cards().card(copy).unwrap().content.title, "Alpha (Copy)");
    assert_eq!(page.cards().summary().visible, 4);

    send(&mut page, &mut host, InputEvent::click_card(copy));
    assert!(page.cards().card(copy).unwrap().view.expanded);
    send(&mut page, &mut host, InputEvent::click(ClickTarget::Favorite { card: copy }));
    assert!(page.cards().card(copy).unwrap().view.favorite);
    assert!(!page.cards().card(CardKey(0)).unwrap().view.favorite);
}

#[test]
fn test_sort_by_name_is_non_decreasing() {
    use ProjectStatus::*;
    let mut page = Page::new(
        store(&[("delta", Active), ("Alpha", Active), ("charlie", Active), ("Bravo", Active)]),
        PageOptions::default(),
    );
    let mut host = HeadlessHost::new();
    send(&mut page, &mut host, InputEvent::click(ClickTarget::Sort { sort: SortKey::Name }));
    let titles: Vec<String> = page
        .cards()
        .grid()
        .iter()
        .map(|c| c.content.title.to_lowercase())
        .collect();
    assert!(titles.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(page.a11y().live().text(), "Sorting by name");
}

#[test]
fn test_unknown_card_is_a_typed_error() {
    let mut page = three();
    let mut host = HeadlessHost::new();
    let err = page
        .handle(InputEvent::click_card(CardKey(42)), &mut host)
        .unwrap_err();
    assert!(matches!(err, folio::Error::CardNotFound(CardKey(42))));
}

#[test]
fn test_scroll_into_view_only_when_partially_hidden() {
    let mut page = three();
    let mut host = HeadlessHost::new().with_viewport_height(600.0);
    host.set_bounds(CardKey(0), folio::page::Bounds { top: 100.0, bottom: 300.0 });
    host.set_bounds(CardKey(1), folio::page::Bounds { top: 500.0, bottom: 800.0 });

    let effects = send(&mut page, &mut host, InputEvent::click_card(CardKey(0)));
    assert!(!effects.iter().any(|e| matches!(e, Effect::ScrollIntoView { .. })));
    let effects = send(&mut page, &mut host, InputEvent::click_card(CardKey(1)));
    assert!(effects.contains(&Effect::ScrollIntoView { card: CardKey(1) }));
}
