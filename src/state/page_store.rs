use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::models::{Cursor, IndexPath, MediaItem, MediaItemId, Page};

/// Where an album's children stand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildrenState {
    NotRequested,
    Fetching,
    Fetched,
}

/// Forward cursor of the most recently stored page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastCursor<'a> {
    /// Nothing fetched yet
    NoPages,
    /// The last page said there is nothing after it
    End,
    Next(&'a Cursor),
}

/// In-memory pagination state: pages in fetch order plus lazily fetched album children.
///
/// Performs no I/O. Pages are only ever appended, or replaced wholesale by [`reset`].
///
/// [`reset`]: PageStore::reset
#[derive(Debug, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    children: HashMap<MediaItemId, Vec<MediaItem>>,
    children_loading: HashSet<MediaItemId>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every stored page with `first_page`. Children are kept.
    pub fn reset(&mut self, first_page: Page) {
        self.pages.clear();
        self.pages.push(first_page);
    }

    /// Append a page and return its section index
    pub fn append(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Store children for `id`. Only the first write for an id sticks.
    pub fn record_children(&mut self, id: MediaItemId, items: Vec<MediaItem>) -> bool {
        match self.children.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(items);
                true
            }
        }
    }

    /// Children of `id`, empty when unknown; see [`has_children`](Self::has_children)
    pub fn children_for(&self, id: &str) -> &[MediaItem] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether children were fetched for `id`, even if there were none
    pub fn has_children(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    /// Mark a children fetch as in flight; false if one already is
    pub fn begin_children_fetch(&mut self, id: &MediaItemId) -> bool {
        self.children_loading.insert(id.clone())
    }

    pub fn finish_children_fetch(&mut self, id: &str) {
        self.children_loading.remove(id);
    }

    pub fn children_state(&self, id: &str) -> ChildrenState {
        if self.has_children(id) {
            ChildrenState::Fetched
        } else if self.children_loading.contains(id) {
            ChildrenState::Fetching
        } else {
            ChildrenState::NotRequested
        }
    }

    /// First position holding `id`, scanning pages in fetch order
    pub fn locate(&self, id: &str) -> Option<IndexPath> {
        self.pages.iter().enumerate().find_map(|(section, page)| {
            page.items
                .iter()
                .position(|item| item.id.as_str() == id)
                .map(|row| IndexPath::new(section, row))
        })
    }

    pub fn item_at(&self, section: usize, row: usize) -> Option<&MediaItem> {
        self.pages.get(section)?.items.get(row)
    }

    pub fn section_count(&self) -> usize {
        self.pages.len()
    }

    pub fn row_count(&self, section: usize) -> usize {
        self.pages.get(section).map(Page::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn last_page_cursor(&self) -> LastCursor<'_> {
        match self.pages.last() {
            None => LastCursor::NoPages,
            Some(page) => page.next.as_ref().map_or(LastCursor::End, LastCursor::Next),
        }
    }

    pub fn can_load_more(&self) -> bool {
        !matches!(self.last_page_cursor(), LastCursor::End)
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}
