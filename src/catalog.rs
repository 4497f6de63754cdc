//! Quiz listing grouped by phase, with collapsible sections.

use crate::api::{Catalog, CatalogItem};
use crate::prefs::PrefsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogRow<'a> {
    Section {
        name: &'a str,
        collapsed: bool,
        count: usize,
    },
    Item(&'a CatalogItem),
}

/// What pressing enter on the selected row asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    Toggled { section: String, collapsed: bool },
    Open(String),
    Nothing,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    catalog: Catalog,
    cursor: usize,
    /// Shown instead of the list when the catalog could not be loaded.
    pub message: Option<String>,
}

impl CatalogView {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cursor: 0,
            message: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.quizzes.iter().all(|s| s.items.is_empty())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rows<'a>(&'a self, prefs: &PrefsStore) -> Vec<CatalogRow<'a>> {
        let mut rows = Vec::new();
        for section in &self.catalog.quizzes {
            let collapsed = prefs.is_collapsed(&section.phase);
            rows.push(CatalogRow::Section {
                name: &section.phase,
                collapsed,
                count: section.items.len(),
            });
            if !collapsed {
                rows.extend(section.items.iter().map(CatalogRow::Item));
            }
        }
        rows
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, prefs: &PrefsStore) {
        let len = self.rows(prefs).len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn select(&mut self, row: usize, prefs: &PrefsStore) {
        if row < self.rows(prefs).len() {
            self.cursor = row;
        }
    }

    /// Act on the selected row: sections collapse or expand, items open.
    pub fn activate(&mut self, prefs: &mut PrefsStore) -> CatalogAction {
        let target = match self.rows(prefs).get(self.cursor) {
            Some(CatalogRow::Section { name, .. }) => Err(name.to_string()),
            Some(CatalogRow::Item(item)) => Ok(item.file.clone()),
            None => return CatalogAction::Nothing,
        };
        match target {
            Ok(file) => CatalogAction::Open(file),
            Err(section) => {
                let collapsed = prefs.toggle_section(&section);
                tracing::debug!(section = %section, collapsed, "catalog section toggled");
                CatalogAction::Toggled { section, collapsed }
            }
        }
    }

    /// Lines for `--list`.
    pub fn listing(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for section in &self.catalog.quizzes {
            lines.push(format!("{}:", section.phase));
            for item in &section.items {
                let count = item
                    .count
                    .map(|c| format!(" ({} questions)", c))
                    .unwrap_or_default();
                lines.push(format!("  {}  {}{}", item.file, item.title, count));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogSection;

    fn item(file: &str, title: &str) -> CatalogItem {
        CatalogItem {
            file: file.into(),
            title: title.into(),
            count: Some(10),
        }
    }

    fn view() -> CatalogView {
        CatalogView::new(Catalog {
            quizzes: vec![
                CatalogSection {
                    phase: "Phase 1".into(),
                    items: vec![
                        item("p1/01_quiz.md", "Basics"),
                        item("p1/02_quiz.md", "Graphs"),
                    ],
                },
                CatalogSection {
                    phase: "Phase 2".into(),
                    items: vec![item("p2/01_quiz.md", "Dataflow")],
                },
            ],
        })
    }

    #[test]
    fn collapsing_hides_items() {
        let mut prefs = PrefsStore::in_memory();
        let mut view = view();
        assert_eq!(view.rows(&prefs).len(), 5);

        let action = view.activate(&mut prefs);
        assert_eq!(
            action,
            CatalogAction::Toggled {
                section: "Phase 1".into(),
                collapsed: true
            }
        );
        let rows = view.rows(&prefs);
        assert_eq!(rows.len(), 3);
        assert!(matches!(
            rows[0],
            CatalogRow::Section {
                collapsed: true,
                count: 2,
                ..
            }
        ));
        assert!(matches!(rows[1], CatalogRow::Section { name: "Phase 2", .. }));
    }

    #[test]
    fn activating_item_opens_its_file() {
        let mut prefs = PrefsStore::in_memory();
        let mut view = view();
        view.move_down(&prefs);
        view.move_down(&prefs);
        assert_eq!(view.activate(&mut prefs), CatalogAction::Open("p1/02_quiz.md".into()));
    }

    #[test]
    fn cursor_stays_in_range() {
        let prefs = PrefsStore::in_memory();
        let mut view = view();
        view.move_up();
        assert_eq!(view.cursor(), 0);
        for _ in 0..10 {
            view.move_down(&prefs);
        }
        assert_eq!(view.cursor(), 4);
        view.select(9, &prefs);
        assert_eq!(view.cursor(), 4);
    }

    #[test]
    fn listing_names_every_quiz() {
        let lines = view().listing();
        assert_eq!(lines[0], "Phase 1:");
        assert_eq!(lines[1], "  p1/01_quiz.md  Basics (10 questions)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn unavailable_catalog_is_empty() {
        let mut prefs = PrefsStore::in_memory();
        let mut view = CatalogView::unavailable("server unreachable");
        assert!(view.is_empty());
        assert_eq!(view.activate(&mut prefs), CatalogAction::Nothing);
    }
}
