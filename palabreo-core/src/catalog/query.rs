//! Listing queries over the catalog

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Ordering of public listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkSort {
    /// Newest first
    #[default]
    Recent,
    /// Most liked first, then most viewed
    Popular,
}

/// Filter, sort and pagination for public work listings
#[derive(Debug, Clone, Deserialize)]
pub struct WorkQuery {
    /// Page number (1-indexed, 0 treated as 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Case-insensitive match on title or genre
    pub search: Option<String>,

    #[serde(default)]
    pub sort: WorkSort,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for WorkQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            sort: WorkSort::default(),
        }
    }
}

impl WorkQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: WorkSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Page number with 0 treated as 1
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Normalised search needle, if any
    pub(crate) fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Cut one page out of an already sorted result list
    pub fn paginate(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let total = all.len();
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let items = all
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Self {
            items,
            total,
            page,
            per_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let page = Page::paginate((1..=45).collect::<Vec<_>>(), 3, 20);
        assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
        assert_eq!(page.total, 45);
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let page = Page::paginate(vec![1, 2, 3], 9, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_query_normalisation() {
        let query = WorkQuery::default().with_page(0, 500).with_search("  Niebla ");
        assert_eq!(query.effective_page(), 1);
        assert_eq!(query.effective_per_page(), MAX_PER_PAGE);
        assert_eq!(query.needle().as_deref(), Some("niebla"));
    }
}
