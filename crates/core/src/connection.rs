//! Cursor-paginated connections.
//!
//! Shopify lists are Relay-style connections: `edges { cursor node }` plus
//! `pageInfo`. The order history page loads nested lists (line items,
//! fulfillments) one page at a time and splices each follow-up page into
//! the list already on screen.

use serde::{Deserialize, Serialize};

/// Pagination information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    #[serde(default)]
    pub has_previous_page: bool,
    /// Cursor for the first item.
    #[serde(default)]
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One edge of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: T,
}

/// A page of nodes with its pagination info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

impl<T> Connection<T> {
    /// Iterate over the nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Consume into the nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }

    /// Map every node, keeping cursors and page info.
    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge {
                    cursor: edge.cursor,
                    node: f(edge.node),
                })
                .collect(),
            page_info: self.page_info,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Append a follow-up page fetched with `after: end_cursor`.
    ///
    /// Edges are appended in order; `has_next_page` and `end_cursor` are
    /// taken from the new page while the existing start of the list is kept.
    pub fn splice(&mut self, next: Self) {
        self.edges.extend(next.edges);
        self.page_info.has_next_page = next.page_info.has_next_page;
        if next.page_info.end_cursor.is_some() {
            self.page_info.end_cursor = next.page_info.end_cursor;
        }
    }
}

/// Direction of a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First page.
    First,
    /// Page after the given cursor (`first: n, after: cursor`).
    After(String),
    /// Page before the given cursor (`last: n, before: cursor`).
    Before(String),
}

impl PageRequest {
    /// Build from `?after=` / `?before=` query values. `after` wins when both are set.
    #[must_use]
    pub fn from_cursors(after: Option<String>, before: Option<String>) -> Self {
        match (after.filter(|c| !c.is_empty()), before.filter(|c| !c.is_empty())) {
            (Some(after), _) => Self::After(after),
            (None, Some(before)) => Self::Before(before),
            (None, None) => Self::First,
        }
    }

    /// GraphQL pagination arguments `(first, after, last, before)` for a page size.
    #[must_use]
    pub fn arguments(
        &self,
        page_size: u32,
    ) -> (Option<u32>, Option<&str>, Option<u32>, Option<&str>) {
        match self {
            Self::First => (Some(page_size), None, None, None),
            Self::After(cursor) => (Some(page_size), Some(cursor), None, None),
            Self::Before(cursor) => (None, None, Some(page_size), Some(cursor)),
        }
    }
}
