//! Ink for a whole document, one independent engine per page.

use crate::config::InkConfig;
use crate::page::{PageInk, PersistedInk};
use std::collections::BTreeMap;

/// Pages are created on first access and never share state, so a two-page
/// spread simply drives two entries side by side.
#[derive(Debug, Default)]
pub struct InkDocument {
    config: InkConfig,
    pages: BTreeMap<u32, PageInk>,
}

impl InkDocument {
    pub fn new(config: InkConfig) -> Self {
        Self {
            config,
            pages: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &InkConfig {
        &self.config
    }

    pub fn page(&self, page_number: u32) -> Option<&PageInk> {
        self.pages.get(&page_number)
    }

    /// Get a page's engine, creating an empty one if needed.
    pub fn page_mut(&mut self, page_number: u32) -> &mut PageInk {
        let config = &self.config;
        self.pages
            .entry(page_number)
            .or_insert_with(|| PageInk::new(page_number, config.clone()))
    }

    /// Drop a page's engine (e.g. when it scrolls out of view after saving).
    pub fn remove_page(&mut self, page_number: u32) -> Option<PageInk> {
        self.pages.remove(&page_number)
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageInk> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page numbers with unsaved ink changes, ascending.
    pub fn dirty_pages(&self) -> Vec<u32> {
        self.pages
            .values()
            .filter(|p| p.has_unsaved_changes())
            .map(|p| p.page_number())
            .collect()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.pages.values().any(|p| p.has_unsaved_changes())
    }

    /// For every dirty page: the record to write, or `None` if the page's
    /// stored record should be deleted.
    pub fn collect_persist(&self) -> Vec<(u32, Option<PersistedInk>)> {
        self.pages
            .values()
            .filter(|p| p.has_unsaved_changes())
            .map(|p| (p.page_number(), p.data_to_persist()))
            .collect()
    }

    pub fn mark_all_saved(&mut self) {
        for page in self.pages.values_mut() {
            page.mark_saved();
        }
    }
}
