//! Searchable, sortable table of records.

use std::cmp::Ordering;

use serde::Serialize;

use super::routes::Route;
use super::ViewRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub header: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            sortable: true,
        }
    }

    pub const fn plain(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

/// Placeholder shown instead of an empty table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub description: &'static str,
    pub create_route: Route,
    pub create_label: &'static str,
}

/// Rows plus the current search text and sort.
#[derive(Debug, Clone)]
pub struct Table<E: ViewRecord> {
    rows: Vec<E>,
    search: String,
    sort: Option<Sort>,
}

impl<E: ViewRecord> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            search: String::new(),
            sort: None,
        }
    }
}

impl<E: ViewRecord> Table<E> {
    pub fn new(rows: Vec<E>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Replace the rows, keeping search and sort.
    pub fn set_rows(&mut self, rows: Vec<E>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Header click: ascending first, then flips on each further click.
    /// Returns `false` for unknown or non-sortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let Some(column) = E::columns().iter().find(|c| c.key == key && c.sortable) else {
            return false;
        };
        let direction = match self.sort {
            Some(Sort {
                column: current,
                direction: Direction::Asc,
            }) if current == column.key => Direction::Desc,
            _ => Direction::Asc,
        };
        self.sort = Some(Sort {
            column: column.key,
            direction,
        });
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }

    /// Rows matching the search, in sort order.
    pub fn visible(&self) -> Vec<&E> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<&E> = self
            .rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || row
                        .cell(E::search_column())
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect();

        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare(&a.cell(sort.column), &b.cell(sort.column));
                match sort.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }
        rows
    }
}

fn compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed, Horse, Patient};

    fn names(rows: &[&Patient]) -> Vec<String> {
        rows.iter().map(|p| p.first_name.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut table = Table::new(seed::patients());
        table.set_search("  CAR ");
        assert_eq!(names(&table.visible()), vec!["Carlos"]);

        table.set_search("zzz");
        assert!(table.visible().is_empty());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_sort_toggles_direction() {
        let mut table = Table::new(seed::patients());
        assert!(table.toggle_sort("first_name"));
        assert_eq!(names(&table.visible()), vec!["Ana", "Carlos", "María"]);

        assert!(table.toggle_sort("first_name"));
        assert_eq!(names(&table.visible()), vec!["María", "Carlos", "Ana"]);

        assert!(table.toggle_sort("first_name"));
        assert_eq!(table.sort().unwrap().direction, Direction::Asc);
    }

    #[test]
    fn test_switching_column_resets_to_ascending() {
        let mut table = Table::new(seed::patients());
        table.toggle_sort("first_name");
        table.toggle_sort("first_name");
        table.toggle_sort("document_id");
        assert_eq!(
            table.sort(),
            Some(Sort {
                column: "document_id",
                direction: Direction::Asc
            })
        );
    }

    #[test]
    fn test_non_sortable_column_is_ignored() {
        let mut table = Table::new(seed::horses());
        assert!(!table.toggle_sort("breed"));
        assert!(!table.toggle_sort("nope"));
        assert!(table.sort().is_none());
        let visible: Vec<&Horse> = table.visible();
        let order: Vec<&str> = visible.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(order, vec!["Luna", "Estrella", "Trueno"]);
    }

    #[test]
    fn test_remove_row() {
        let mut table = Table::new(seed::patients());
        assert!(table.remove("pat-2").is_some());
        assert!(table.remove("pat-2").is_none());
        assert_eq!(table.len(), 2);
    }
}
