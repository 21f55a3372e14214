use std::num::NonZeroUsize;

/// Number of pages needed for `count` items; at least 1 even when empty.
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// The contiguous window `[(n-1)*size, n*size)` of `items` for 1-based page `n`.
///
/// Page 0 and pages past the end yield an empty slice.
pub fn page<T>(items: &[T], page_size: NonZeroUsize, page_number: usize) -> &[T] {
    let Some(index) = page_number.checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(page_size.get());
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size.get()).min(items.len());
    &items[start..end]
}

/// Pagination controls state for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
}

impl Pagination {
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// Controls are only shown when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }
}
