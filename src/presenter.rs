//! List/grid presentation: free-text search and display state.
//!
//! Collections are always fetched whole and filtered here, client-side.
//! [`ListView`] separates "still loading", "nothing stored yet" and "nothing
//! matched the search" so each renders differently.

use crate::{
    entities::{BadgeModel, CertificateModel, ProgramModel, TaskModel, TripModel, UserModel},
    query::QuerySnapshot,
};

/// A record that can be matched by a free-text query.
pub trait Searchable {
    /// Fields the query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Whether any searchable field contains `query`, ignoring case.
pub fn matches<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching `query`, in their original order. A blank query keeps
/// everything.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(*item, query)).collect()
}

/// What a list screen should show.
#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a, T> {
    /// Nothing fetched yet
    Loading,
    /// The fetch failed and there is no earlier data to show
    Failed(String),
    /// The collection itself is empty
    Empty,
    /// The collection has records but none matched the query
    NoResults {
        /// The query that matched nothing
        query: String,
    },
    /// Matching records
    Rows(Vec<&'a T>),
}

impl<'a, T: Searchable> ListView<'a, T> {
    /// Classifies an already-fetched collection.
    pub fn from_rows(items: &'a [T], query: &str) -> Self {
        if items.is_empty() {
            return Self::Empty;
        }
        let rows = filter_items(items, query);
        if rows.is_empty() {
            Self::NoResults {
                query: query.trim().to_string(),
            }
        } else {
            Self::Rows(rows)
        }
    }

    /// Classifies a cached query; earlier data is shown even while a refetch
    /// is in flight.
    pub fn from_snapshot(snapshot: &'a QuerySnapshot<T>, query: &str) -> Self {
        match (&snapshot.data, &snapshot.error) {
            (Some(data), _) => Self::from_rows(data.as_slice(), query),
            (None, Some(error)) if !snapshot.loading => Self::Failed(error.clone()),
            (None, _) => Self::Loading,
        }
    }
}

impl Searchable for BadgeModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for CertificateModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Searchable for UserModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.national_id.as_str()]
    }
}

impl Searchable for TripModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Searchable for TaskModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Searchable for ProgramModel {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Item(&'static str, &'static str);

    impl Searchable for Item {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0, self.1]
        }
    }

    fn certificates() -> Vec<Item> {
        vec![
            Item("شهادة الإسعافات الأولية", "دورة أساسية"),
            Item("Leadership", "شهادة القيادة الكشفية"),
            Item("Camping", "Outdoor skills"),
        ]
    }

    #[test]
    fn test_filter_matches_name_or_description() {
        let items = certificates();
        let found = filter_items(&items, "شهادة");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "شهادة الإسعافات الأولية");
        assert_eq!(found[1].0, "Leadership");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let items = certificates();
        let found = filter_items(&items, "OUTDOOR");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "Camping");
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let items = certificates();
        assert_eq!(filter_items(&items, "").len(), 3);
        assert_eq!(filter_items(&items, "   ").len(), 3);
    }

    #[test]
    fn test_list_view_states() {
        let empty: Vec<Item> = Vec::new();
        assert!(matches!(ListView::from_rows(&empty, ""), ListView::Empty));

        let items = certificates();
        assert!(matches!(
            ListView::from_rows(&items, "astronomy"),
            ListView::NoResults { ref query } if query == "astronomy"
        ));
        assert!(matches!(ListView::from_rows(&items, "camp"), ListView::Rows(ref rows) if rows.len() == 1));
    }

    #[test]
    fn test_list_view_from_snapshot() {
        let loading: QuerySnapshot<Item> = QuerySnapshot {
            loading: true,
            data: None,
            error: None,
        };
        assert!(matches!(ListView::from_snapshot(&loading, ""), ListView::Loading));

        let failed: QuerySnapshot<Item> = QuerySnapshot {
            loading: false,
            data: None,
            error: Some("offline".to_string()),
        };
        assert!(matches!(
            ListView::from_snapshot(&failed, ""),
            ListView::Failed(ref message) if message == "offline"
        ));

        let stale_with_error = QuerySnapshot {
            loading: false,
            data: Some(Arc::new(certificates())),
            error: Some("offline".to_string()),
        };
        assert!(matches!(
            ListView::from_snapshot(&stale_with_error, ""),
            ListView::Rows(ref rows) if rows.len() == 3
        ));
    }
}
