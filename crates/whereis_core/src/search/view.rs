//! Recomputing filtered view for list screens.
//!
//! Holds the last loaded catalog and the current query; the visible list is
//! rebuilt whenever either changes.

use super::filter::{filter_by_name, NameQuery};
use crate::model::item::{Item, ItemId};

/// Catalog snapshot plus the query currently applied to it.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    items: Vec<Item>,
    query: NameQuery,
    visible: Vec<Item>,
}

impl CatalogView {
    pub fn new(items: Vec<Item>) -> Self {
        let mut view = Self {
            items,
            ..Self::default()
        };
        view.recompute();
        view
    }

    /// Replaces the catalog snapshot, e.g. after `ItemRepository::reload`.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.recompute();
    }

    /// Replaces the raw query text.
    pub fn set_query(&mut self, text: &str) {
        let query = NameQuery::new(text);
        if query == self.query {
            return;
        }
        self.query = query;
        self.recompute();
    }

    pub fn query(&self) -> &str {
        self.query.needle()
    }

    /// Items matching the current query, in catalog order.
    pub fn visible(&self) -> &[Item] {
        &self.visible
    }

    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn recompute(&mut self) {
        self.visible = filter_by_name(&self.items, &self.query);
    }
}
