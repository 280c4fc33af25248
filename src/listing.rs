//! Per-screen listing state: one filter query plus one [`PageState`] over
//! a record set, in either of the two fetch modes the backend exposes.
//!
//! Franchises and meta-info arrive as a full snapshot and page client
//! side; technicians arrive one server window at a time. A screen picks
//! its mode with a single `set_full`/`set_window` call and the rest of
//! the listing behaves identically.

use crate::paging::{apply_filter, paginate, PageState, DEFAULT_PAGE_SIZE};

/// Case-insensitive match against the user's search text. Implemented per
/// entity over its searchable fields.
pub trait Queryable {
    fn matches(&self, query: &str) -> bool;
}

/// Folded substring match used by the entity `Queryable` impls.
#[must_use]
pub fn text_contains(field: &str, query: &str) -> bool {
    field.to_lowercase().contains(&query.to_lowercase())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordSet<T> {
    /// Whole collection fetched once; filtering and paging happen here.
    Full(Vec<T>),
    /// One server page plus the server's total count. The filter query is
    /// not applied in this mode — the fetch boundary has no filter
    /// parameter.
    Window { items: Vec<T>, total: usize },
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self::Full(Vec::new())
    }
}

/// The rows to render for the current page, with everything the paging
/// controls need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleRows<'a, T> {
    pub rows: Vec<&'a T>,
    pub start_index: usize,
    pub end_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing<T> {
    records: RecordSet<T>,
    query: String,
    page: PageState,
}

impl<T: Queryable> Listing<T> {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            records: RecordSet::default(),
            query: String::new(),
            page: PageState::new(page_size),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn page(&self) -> &PageState {
        &self.page
    }

    /// The raw records currently held, regardless of mode.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match &self.records {
            RecordSet::Full(items) | RecordSet::Window { items, .. } => items,
        }
    }

    /// Replace the collection with a full client-side snapshot.
    pub fn set_full(&mut self, items: Vec<T>) {
        self.records = RecordSet::Full(items);
        self.sync_total();
    }

    /// Replace the collection with one server page window.
    pub fn set_window(&mut self, items: Vec<T>, total: usize) {
        self.records = RecordSet::Window { items, total };
        self.page.set_total(total);
    }

    /// Drop all records, e.g. after a failed fetch.
    pub fn clear(&mut self) {
        self.records = RecordSet::default();
        self.page.set_total(0);
    }

    /// Fresh query and first page, keeping the page size. Used on screen
    /// mount.
    pub fn reset(&mut self) {
        self.query.clear();
        self.page.reset();
    }

    /// Change the filter query. Always returns to page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page.reset();
        self.sync_total();
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page.set_page_size(size);
        self.sync_total();
    }

    pub fn go_to(&mut self, page: usize) {
        self.page.go_to(page);
    }

    pub fn next(&mut self) {
        self.page.next();
    }

    pub fn prev(&mut self) {
        self.page.prev();
    }

    #[must_use]
    pub fn visible(&self) -> VisibleRows<'_, T> {
        match &self.records {
            RecordSet::Full(items) => {
                let filtered = self.filtered(items);
                let window = paginate(&filtered, &self.page);
                VisibleRows {
                    rows: window.page_items.to_vec(),
                    start_index: window.start_index,
                    end_index: window.end_index,
                    total_pages: window.total_pages,
                    total_count: filtered.len(),
                }
            }
            RecordSet::Window { items, total } => {
                let start_index = self.page.offset().min(*total);
                VisibleRows {
                    rows: items.iter().collect(),
                    start_index,
                    end_index: (start_index + items.len()).min(*total),
                    total_pages: self.page.total_pages(),
                    total_count: *total,
                }
            }
        }
    }

    fn filtered<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        apply_filter(items, |item| {
            self.query.is_empty() || item.matches(&self.query)
        })
    }

    fn sync_total(&mut self) {
        let total = match &self.records {
            RecordSet::Full(items) => self.filtered(items).len(),
            RecordSet::Window { total, .. } => *total,
        };
        self.page.set_total(total);
    }
}

impl<T: Queryable> Default for Listing<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
