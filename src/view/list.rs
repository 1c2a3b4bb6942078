//! Selectable list
//!
//! Two-column (Name, Date) table. The parent owns the selection: the view
//! only marks the row whose name matches and reports clicks back.

use crate::client::EcgRecord;

/// Anything with a name and a display date
pub trait ListItem {
    fn name(&self) -> &str;
    fn date(&self) -> &str;
}

impl ListItem for EcgRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn date(&self) -> &str {
        &self.date
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub name: String,
    pub date: String,
    pub selected: bool,
}

/// Controlled list view over borrowed items
pub struct ListView<'a, T> {
    items: &'a [T],
    selected: Option<&'a str>,
    on_select: Option<Box<dyn Fn(&str) + 'a>>,
}

impl<'a, T: ListItem> ListView<'a, T> {
    pub fn new(items: &'a [T], selected: Option<&'a str>) -> Self {
        Self {
            items,
            selected,
            on_select: None,
        }
    }

    /// Builder method: callback for row clicks
    pub fn on_select(mut self, callback: impl Fn(&str) + 'a) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// Rows in input order
    pub fn rows(&self) -> Vec<ListRow> {
        self.items
            .iter()
            .map(|item| ListRow {
                name: item.name().to_string(),
                date: item.date().to_string(),
                selected: self.selected == Some(item.name()),
            })
            .collect()
    }

    /// Click the row at `index`. Returns false when there is no such row.
    pub fn click(&self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        if let Some(callback) = &self.on_select {
            callback(item.name());
        }
        true
    }

    /// Text shown beneath the table: the raw selection, matched or not
    pub fn footer(&self) -> &str {
        self.selected.unwrap_or("")
    }

    /// Plain-text table. Selected rows carry a `>` marker.
    pub fn render(&self) -> String {
        let rows = self.rows();
        let width = rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain(std::iter::once("Name".len()))
            .max()
            .unwrap_or(0);

        let mut out = format!("  {:<width$}  {}\n", "Name", "Date", width = width);
        for row in &rows {
            let marker = if row.selected { '>' } else { ' ' };
            out.push_str(&format!(
                "{} {:<width$}  {}\n",
                marker,
                row.name,
                row.date,
                width = width
            ));
        }
        out.push_str(self.footer());
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn items() -> Vec<EcgRecord> {
        vec![
            EcgRecord::new("a", "2024-01-01"),
            EcgRecord::new("b", "2024-01-02"),
        ]
    }

    #[test]
    fn test_only_matching_row_is_selected() {
        let items = items();
        let view = ListView::new(&items, Some("b"));

        let selected: Vec<_> = view
            .rows()
            .into_iter()
            .filter(|r| r.selected)
            .map(|r| r.name)
            .collect();
        assert_eq!(selected, vec!["b"]);
    }

    #[test]
    fn test_click_reports_row_name() {
        let items = items();
        let clicked = RefCell::new(Vec::new());
        let view = ListView::new(&items, Some("b"))
            .on_select(|name| clicked.borrow_mut().push(name.to_string()));

        assert!(view.click(0));
        assert!(!view.click(5));
        assert_eq!(*clicked.borrow(), vec!["a"]);
    }

    #[test]
    fn test_unmatched_selection_marks_nothing_but_is_shown() {
        let items = items();
        let view = ListView::new(&items, Some("zzz"));

        assert!(view.rows().iter().all(|r| !r.selected));
        assert_eq!(view.footer(), "zzz");
        assert!(view.render().ends_with("zzz\n"));
    }

    #[test]
    fn test_order_is_preserved() {
        let items = vec![
            EcgRecord::new("z", "3"),
            EcgRecord::new("a", "1"),
            EcgRecord::new("m", "2"),
        ];
        let names: Vec<_> = ListView::new(&items, None)
            .rows()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_render_marks_selected_row() {
        let items = items();
        let text = ListView::new(&items, Some("a")).render();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "  Name  Date");
        assert_eq!(lines[1], "> a     2024-01-01");
        assert_eq!(lines[2], "  b     2024-01-02");
        assert_eq!(lines[3], "a");
    }
}
