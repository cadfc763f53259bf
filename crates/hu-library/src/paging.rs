//! Fixed-size pages over a list
//!
//! Lists are browsed four entries at a time and paging wraps in both
//! directions. An empty list still has one (empty) page.

use std::ops::Range;

pub const ITEMS_PER_PAGE: usize = 4;

/// Number of pages for `items` entries, at least 1
pub fn page_count(items: usize) -> usize {
    items.div_ceil(ITEMS_PER_PAGE).max(1)
}

/// Page holding entry `index`
pub fn page_for_index(index: usize) -> usize {
    index / ITEMS_PER_PAGE
}

/// Page to open a list on given a remembered position
///
/// Remembered positions are not validated against the list, so one past the
/// end lands on the last page.
pub fn initial_page(remembered: usize, items: usize) -> usize {
    page_for_index(remembered).min(page_count(items) - 1)
}

pub fn next_page(page: usize, items: usize) -> usize {
    if page + 1 < page_count(items) {
        page + 1
    } else {
        0
    }
}

pub fn prev_page(page: usize, items: usize) -> usize {
    let last = page_count(items) - 1;
    if page == 0 || page > last {
        last
    } else {
        page - 1
    }
}

/// Entry indices shown on `page`, clamped to the list
pub fn page_range(page: usize, items: usize) -> Range<usize> {
    let start = (page * ITEMS_PER_PAGE).min(items);
    let end = (start + ITEMS_PER_PAGE).min(items);
    start..end
}

/// List index of the entry in `slot` (0..4) of `page`
pub fn index_on_page(page: usize, slot: usize) -> usize {
    page * ITEMS_PER_PAGE + slot
}
