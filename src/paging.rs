//! Page-window derivation for record collections.
//!
//! A [`PageState`] is a value object mutated only through the operations
//! here; none of them can fail. Out-of-range navigation is a no-op (the
//! UI disables the buttons, but the functions stay safe to call at any
//! page), and the current page is re-clamped on every mutation of the
//! underlying set or the page size.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_CHOICES: &[usize] = &[10, 25, 50, 100];

/// 1-based page position over a collection of `total_count` records.
///
/// `page_size == 0` is a programming error, guarded by `debug_assert!`
/// and tests rather than a runtime recovery path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
    total_count: usize,
}

impl PageState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        debug_assert!(page_size > 0, "page size must be positive");
        Self {
            current_page: 1,
            page_size,
            total_count: 0,
        }
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        pages_for(self.total_count, self.page_size)
    }

    /// 0-based offset of the first record on the current page. Doubles as
    /// the `offset` of a server page fetch.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Record a new collection size, clamping the current page back into
    /// range. This is the one reconciliation rule that must run on every
    /// mutation of the underlying set.
    pub fn set_total(&mut self, total: usize) {
        self.total_count = total;
        self.current_page = self.current_page.min(self.total_pages());
    }

    /// Change the page size. Resets to page 1, like a filter change.
    pub fn set_page_size(&mut self, size: usize) {
        debug_assert!(size > 0, "page size must be positive");
        self.page_size = size;
        self.current_page = 1;
    }

    /// Back to page 1; called whenever the filter predicate changes.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Navigate to `page`, ignoring requests outside `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
        }
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn prev(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn pages_for(total: usize, page_size: usize) -> usize {
    if total == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// The visible slice of `records` for a page state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageWindow<'a, T> {
    pub page_items: &'a [T],
    /// 0-based index of the first visible record.
    pub start_index: usize,
    /// One past the last visible record.
    pub end_index: usize,
    pub total_pages: usize,
}

/// Slice the current page out of `records`.
///
/// Callers keep `page` clamped via [`PageState::set_total`] whenever the
/// set shrinks; a still-stale page degrades to an empty window here
/// rather than panicking.
#[must_use]
pub fn paginate<'a, T>(records: &'a [T], page: &PageState) -> PageWindow<'a, T> {
    let total_pages = pages_for(records.len(), page.page_size());
    let start_index = page.offset().min(records.len());
    let end_index = (start_index + page.page_size()).min(records.len());
    PageWindow {
        page_items: &records[start_index..end_index],
        start_index,
        end_index,
        total_pages,
    }
}

/// Total filtering; case-insensitivity is the predicate's concern. A new
/// filter must be paired with [`PageState::reset`] — `Listing` in this
/// crate enforces that pairing.
pub fn apply_filter<'a, T>(records: &'a [T], predicate: impl Fn(&T) -> bool) -> Vec<&'a T> {
    records.iter().filter(|&item| predicate(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    mod window_tests {
        use super::*;

        #[test]
        fn twenty_five_records_make_three_pages_of_ten() {
            let records = records(25);
            let mut page = PageState::new(10);
            page.set_total(25);

            assert_eq!(page.total_pages(), 3);

            let window = paginate(&records, &page);
            assert_eq!(window.page_items, &records[0..10]);
            assert_eq!((window.start_index, window.end_index), (0, 10));

            page.go_to(3);
            let window = paginate(&records, &page);
            assert_eq!(window.page_items.len(), 5);
            assert_eq!(window.page_items, &records[20..25]);
            assert_eq!((window.start_index, window.end_index), (20, 25));
        }

        #[test]
        fn empty_collection_is_one_empty_page() {
            let records: Vec<usize> = Vec::new();
            let page = PageState::new(10);
            let window = paginate(&records, &page);
            assert_eq!(window.total_pages, 1);
            assert!(window.page_items.is_empty());
            assert_eq!((window.start_index, window.end_index), (0, 0));
        }

        #[test]
        fn stale_page_beyond_the_set_degrades_to_empty() {
            // The caller is expected to clamp via set_total; paginate must
            // still not panic if it has not happened yet.
            let records = records(5);
            let mut page = PageState::new(10);
            page.set_total(25);
            page.go_to(3);
            let window = paginate(&records, &page);
            assert!(window.page_items.is_empty());
            assert_eq!((window.start_index, window.end_index), (5, 5));
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn go_to_ignores_out_of_range_pages() {
            let mut page = PageState::new(10);
            page.set_total(25);
            page.go_to(2);

            page.go_to(0);
            assert_eq!(page.current_page(), 2);
            page.go_to(4);
            assert_eq!(page.current_page(), 2);
        }

        #[test]
        fn next_and_prev_are_boundary_safe() {
            let mut page = PageState::new(10);
            page.set_total(25);

            page.prev();
            assert_eq!(page.current_page(), 1);
            assert!(!page.has_prev());

            page.next();
            page.next();
            assert_eq!(page.current_page(), 3);
            assert!(!page.has_next());
            page.next();
            assert_eq!(page.current_page(), 3);
        }

        #[test]
        fn shrinking_the_set_clamps_the_page() {
            let mut page = PageState::new(10);
            page.set_total(45);
            page.go_to(5);

            page.set_total(12);
            assert_eq!(page.current_page(), 2);

            page.set_total(0);
            assert_eq!(page.current_page(), 1);
        }

        #[test]
        fn page_size_change_resets_to_first_page() {
            let mut page = PageState::new(10);
            page.set_total(100);
            page.go_to(7);

            page.set_page_size(25);
            assert_eq!(page.current_page(), 1);
            assert_eq!(page.total_pages(), 4);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn filter_is_total() {
            let records = vec!["alpha", "Beta", "gamma"];
            let matched = apply_filter(&records, |r| r.to_lowercase().contains('a'));
            assert_eq!(matched, vec![&"alpha", &"Beta", &"gamma"]);

            let matched = apply_filter(&records, |r| r.contains('z'));
            assert!(matched.is_empty());
        }

        #[test]
        fn filtered_output_paginates_like_any_collection() {
            let records = records(30);
            let even: Vec<&usize> = apply_filter(&records, |n| n % 2 == 0);
            let mut page = PageState::new(10);
            page.set_total(even.len());

            page.go_to(2);
            let window = paginate(&even, &page);
            assert_eq!(window.page_items.len(), 5);
            assert_eq!(window.total_pages, 2);
        }
    }

    mod properties {
        use super::*;

        proptest! {
            // Every record appears on exactly one page, in order.
            #[test]
            fn pages_partition_the_collection(
                len in 0usize..200,
                page_size in 1usize..20,
            ) {
                let records = records(len);
                let mut page = PageState::new(page_size);
                page.set_total(len);

                let mut seen = Vec::new();
                for p in 1..=page.total_pages() {
                    page.go_to(p);
                    let window = paginate(&records, &page);
                    prop_assert!(window.start_index <= window.end_index);
                    prop_assert!(window.end_index <= records.len());
                    seen.extend_from_slice(window.page_items);
                }
                prop_assert_eq!(seen, records);
            }

            // Navigation never leaves the valid range.
            #[test]
            fn navigation_stays_in_range(
                total in 0usize..500,
                page_size in 1usize..50,
                moves in proptest::collection::vec(0usize..600, 0..20),
            ) {
                let mut page = PageState::new(page_size);
                page.set_total(total);
                for target in moves {
                    page.go_to(target);
                    prop_assert!(page.current_page() >= 1);
                    prop_assert!(page.current_page() <= page.total_pages());
                }
            }
        }
    }
}
