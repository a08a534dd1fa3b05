//! Literal name filter.
//!
//! # Invariants
//! - A blank query matches every item.
//! - Matching is substring containment on lowercased `name` only.

use crate::model::item::Item;

/// Normalized search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameQuery {
    needle: String,
}

impl NameQuery {
    /// Trims and lowercases raw user input.
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    /// Returns the normalized needle.
    pub fn needle(&self) -> &str {
        self.needle.as_str()
    }

    /// Returns whether this query matches everything.
    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.is_blank() || item.name.to_lowercase().contains(self.needle.as_str())
    }
}

/// Returns the items whose name contains `query`, in catalog order.
pub fn filter_by_name(items: &[Item], query: &NameQuery) -> Vec<Item> {
    if query.is_blank() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| query.matches(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_by_name, NameQuery};
    use crate::model::item::{Item, ItemId};

    fn item(id: &str, name: &str, description: &str) -> Item {
        Item {
            id: ItemId::from(id),
            name: name.to_string(),
            description: description.to_string(),
            photo_uri: None,
            location: None,
        }
    }

    #[test]
    fn query_is_trimmed_and_lowercased() {
        let query = NameQuery::new("  BoX \n");
        assert_eq!(query.needle(), "box");
        assert!(NameQuery::new("   ").is_blank());
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let items = vec![item("1", "b", "x"), item("2", "a", "y")];
        assert_eq!(filter_by_name(&items, &NameQuery::new("")), items);
    }

    #[test]
    fn matches_name_only_not_description() {
        let items = vec![
            item("1", "Winter Coat", "hall closet"),
            item("2", "Closet Key", "drawer"),
        ];
        let hits = filter_by_name(&items, &NameQuery::new("closet"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "2");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let items = vec![item("1", "SKI Boots", "x"), item("2", "Skillet", "y")];
        let hits = filter_by_name(&items, &NameQuery::new("ski"));
        assert_eq!(hits.len(), 2);
        assert!(filter_by_name(&items, &NameQuery::new("sk b")).is_empty());
    }
}
