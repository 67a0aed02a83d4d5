//! Wishlist of product variant IDs.
//!
//! Insertion order is preserved so the wishlist page lists items in the
//! order they were saved. Entries are unique by ID.

use serde::{Deserialize, Serialize};

/// Deduplicated, ordered list of variant IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Wishlist {
    ids: Vec<String>,
}

impl From<Vec<String>> for Wishlist {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<Wishlist> for Vec<String> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.ids
    }
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build a wishlist from stored IDs, dropping duplicates and blanks.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut wishlist = Self::new();
        for id in ids {
            wishlist.add(id);
        }
        wishlist
    }

    /// Add an ID. Returns `false` (and changes nothing) if already present.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.trim().is_empty() || self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an ID. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Add the ID if absent, remove it otherwise. Returns whether it is now saved.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(id)
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
