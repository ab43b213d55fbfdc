//! Pagination
//!
//! Page count and the sliding window of page buttons.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Rows per page, or no paging at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Disabled,
    Rows(NonZeroUsize),
}

impl PageSize {
    /// `None` when `rows` is zero
    pub fn rows(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(PageSize::Rows)
    }

    pub fn get(&self) -> Option<usize> {
        match self {
            PageSize::Disabled => None,
            PageSize::Rows(rows) => Some(rows.get()),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, PageSize::Disabled)
    }
}

/// Number of pages needed for `total_count` rows, never less than 1
pub fn compute_total_pages(total_count: usize, page_size: PageSize) -> usize {
    match page_size.get() {
        None => 1,
        Some(size) => total_count.div_ceil(size).max(1),
    }
}

/// Consecutive page numbers to show as buttons around `current_page`.
///
/// The window holds `min(window_size, total_pages)` pages and slides to stay
/// inside `1..=total_pages`, so an out-of-range current page is clamped here.
pub fn compute_window(current_page: usize, total_pages: usize, window_size: usize) -> Vec<usize> {
    let size = window_size.min(total_pages);
    if size == 0 {
        return Vec::new();
    }

    let offset_left = size / 2;
    let offset_right = size.div_ceil(2) - 1;

    let (start, end) = if current_page <= offset_left {
        (1, size)
    } else if current_page.saturating_add(offset_right) > total_pages {
        (total_pages - size + 1, total_pages)
    } else {
        (current_page - offset_left, current_page + offset_right)
    };

    (start..=end).collect()
}

/// Row range of a page within `total_count` rows
pub fn page_range(page_index: usize, page_size: PageSize, total_count: usize) -> Range<usize> {
    match page_size.get() {
        None => 0..total_count,
        Some(size) => {
            let start = page_index
                .saturating_sub(1)
                .saturating_mul(size)
                .min(total_count);
            let end = start.saturating_add(size).min(total_count);
            start..end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> PageSize {
        PageSize::rows(n).expect("non-zero")
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(compute_total_pages(25, rows(10)), 3);
        assert_eq!(compute_total_pages(30, rows(10)), 3);
        assert_eq!(compute_total_pages(0, rows(10)), 1);
        assert_eq!(compute_total_pages(1, rows(10)), 1);
        assert_eq!(compute_total_pages(500, PageSize::Disabled), 1);
    }

    #[test]
    fn test_total_pages_property() {
        for total in 0..200 {
            for size in 1..15 {
                let pages = compute_total_pages(total, rows(size));
                assert!(pages >= 1);
                if total > 0 {
                    assert_eq!(pages, total.div_ceil(size));
                }
            }
        }
    }

    #[test]
    fn test_window_scenarios() {
        assert_eq!(compute_window(2, 3, 5), vec![1, 2, 3]);
        assert_eq!(compute_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(compute_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
        assert_eq!(compute_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(compute_window(5, 10, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_window_clamps_out_of_range_page() {
        assert_eq!(compute_window(0, 10, 3), vec![1, 2, 3]);
        assert_eq!(compute_window(42, 10, 3), vec![8, 9, 10]);
        assert_eq!(compute_window(usize::MAX, 10, 5), vec![6, 7, 8, 9, 10]);
        assert!(compute_window(1, 5, 0).is_empty());
    }

    #[test]
    fn test_window_property() {
        for total in 1..30 {
            for window in 1..=total {
                for current in 1..=total {
                    let pages = compute_window(current, total, window);
                    assert_eq!(pages.len(), window);
                    assert!(pages.contains(&current));
                    assert!(pages.iter().all(|p| (1..=total).contains(p)));
                    assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
                }
            }
        }
    }

    #[test]
    fn test_page_range() {
        assert_eq!(page_range(1, rows(10), 25), 0..10);
        assert_eq!(page_range(3, rows(10), 25), 20..25);
        assert_eq!(page_range(4, rows(10), 25), 25..25);
        assert_eq!(page_range(2, PageSize::Disabled, 25), 0..25);
    }
}
