//! The ordered collection of cards in the grid container.

use crate::models::{Project, ProjectStatus, SortKey, compare_titles};
use crate::{Error, Result};

use super::state::{Card, CardContent, CardKey, CardView, Motion, Summary};

/// Grid container: owns every card and their on-screen order.
#[derive(Debug, Clone, Default)]
pub struct CardGrid {
    cards: Vec<Card>,
    next_key: u32,
}

impl CardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one card per project, in collection order.
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let mut grid = Self::new();
        for project in projects {
            grid.push(CardContent::from(project), CardView::new(project.is_favorite));
        }
        grid
    }

    fn push(&mut self, content: CardContent, view: CardView) -> CardKey {
        let key = CardKey(self.next_key);
        self.next_key += 1;
        self.cards.push(Card { key, content, view });
        key
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    /// Keys in on-screen order.
    pub fn keys(&self) -> Vec<CardKey> {
        self.cards.iter().map(|c| c.key).collect()
    }

    /// Keys of cards that can take focus: shown and not sliding out.
    pub fn visible_keys(&self) -> Vec<CardKey> {
        self.cards
            .iter()
            .filter(|c| c.view.visible && !c.view.is_leaving())
            .map(|c| c.key)
            .collect()
    }

    pub fn position(&self, key: CardKey) -> Option<usize> {
        self.cards.iter().position(|c| c.key == key)
    }

    pub fn contains(&self, key: CardKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: CardKey) -> Result<&Card> {
        self.cards.iter().find(|c| c.key == key).ok_or_else(|| {
            tracing::debug!(%key, "card lookup failed");
            Error::CardNotFound(key)
        })
    }

    pub fn get_mut(&mut self, key: CardKey) -> Result<&mut Card> {
        self.cards.iter_mut().find(|c| c.key == key).ok_or_else(|| {
            tracing::debug!(%key, "card lookup failed");
            Error::CardNotFound(key)
        })
    }

    /// Append a copy of `key` with " (Copy)" added to its title.
    pub fn duplicate(&mut self, key: CardKey) -> Result<CardKey> {
        let source = self.get(key)?;
        let mut content = source.content.clone();
        content.title = format!("{} (Copy)", content.title);
        let view = CardView {
            hovered: false,
            motion: Motion::Idle,
            ..source.view
        };
        Ok(self.push(content, view))
    }

    pub fn remove(&mut self, key: CardKey) -> Result<Card> {
        let index = self.position(key).ok_or(Error::CardNotFound(key))?;
        Ok(self.cards.remove(index))
    }

    /// Stable reorder of the grid.
    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self
                .cards
                .sort_by(|a, b| compare_titles(&a.content.title, &b.content.title)),
            SortKey::Priority => self.cards.sort_by(|a, b| {
                b.content.priority.rank().cmp(&a.content.priority.rank())
            }),
            SortKey::Progress => self
                .cards
                .sort_by(|a, b| b.content.progress.cmp(&a.content.progress)),
            SortKey::Date => self
                .cards
                .sort_by(|a, b| b.content.updated_at.cmp(&a.content.updated_at)),
        }
    }

    /// Counts over visible cards that are not on their way out.
    pub fn summary(&self) -> Summary {
        let shown: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| c.view.visible && !c.view.is_leaving())
            .collect();
        let count = |status: ProjectStatus| shown.iter().filter(|c| c.content.status == status).count();
        Summary {
            visible: shown.len(),
            active: count(ProjectStatus::Active),
            progress: count(ProjectStatus::Progress),
            completed: count(ProjectStatus::Completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn grid() -> CardGrid {
        let mut a = Project::new("a", "Beta", "ai");
        a.priority = Priority::Low;
        a.progress = 10;
        let mut b = Project::new("b", "alpha", "cloud");
        b.priority = Priority::High;
        b.progress = 90;
        b.status = ProjectStatus::Completed;
        let mut c = Project::new("c", "Gamma", "ai");
        c.priority = Priority::High;
        c.progress = 50;
        c.is_favorite = true;
        CardGrid::from_projects(&[a, b, c])
    }

    fn titles(grid: &CardGrid) -> Vec<String> {
        grid.iter().map(|c| c.content.title.clone()).collect()
    }

    #[test]
    fn test_from_projects_assigns_keys_in_order() {
        let grid = grid();
        assert_eq!(grid.keys(), vec![CardKey(0), CardKey(1), CardKey(2)]);
        assert!(grid.get(CardKey(2)).unwrap().view.favorite);
    }

    #[test]
    fn test_get_unknown_is_error() {
        let grid = grid();
        assert!(matches!(
            grid.get(CardKey(99)),
            Err(Error::CardNotFound(CardKey(99)))
        ));
    }

    #[test]
    fn test_sort_name_and_priority() {
        let mut grid = grid();
        grid.sort(SortKey::Name);
        assert_eq!(titles(&grid), vec!["alpha", "Beta", "Gamma"]);
        grid.sort(SortKey::Priority);
        assert_eq!(titles(&grid), vec!["alpha", "Gamma", "Beta"]);
    }

    #[test]
    fn test_sort_progress() {
        let mut grid = grid();
        grid.sort(SortKey::Progress);
        assert_eq!(titles(&grid), vec!["alpha", "Gamma", "Beta"]);
    }

    #[test]
    fn test_duplicate_appends_copy_with_fresh_key() {
        let mut grid = grid();
        grid.get_mut(CardKey(0)).unwrap().view.expanded = true;
        let copy = grid.duplicate(CardKey(0)).unwrap();
        assert_eq!(copy, CardKey(3));
        let card = grid.get(copy).unwrap();
        assert_eq!(card.content.title, "Beta (Copy)");
        assert_eq!(card.content.project_id, "a");
        assert!(card.view.expanded);
        assert_eq!(grid.position(copy), Some(3));
    }

    #[test]
    fn test_keys_not_reused_after_remove() {
        let mut grid = grid();
        grid.remove(CardKey(2)).unwrap();
        let copy = grid.duplicate(CardKey(0)).unwrap();
        assert_eq!(copy, CardKey(3));
    }

    #[test]
    fn test_summary_counts_visible_only() {
        let mut grid = grid();
        assert_eq!(grid.summary().visible, 3);
        grid.get_mut(CardKey(1)).unwrap().view.visible = false;
        let summary = grid.summary();
        assert_eq!(summary.visible, 2);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.active, 2);

        grid.get_mut(CardKey(0)).unwrap().view.motion = Motion::Leaving;
        assert_eq!(grid.summary().visible, 1);
        assert_eq!(grid.visible_keys(), vec![CardKey(2)]);
    }
}
