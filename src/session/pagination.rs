//! Page-count estimation and the visible page window.
//!
//! The catalog never reports a total, so the total is a monotonic lower
//! bound grown from page fills: a full page implies at least one more item.

/// Most page numbers shown at once.
pub const WINDOW: u32 = 5;

/// Result of folding one fetched page into the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEstimate {
    pub has_more: bool,
    pub total_estimate: u32,
}

/// Fold a fetched page of `results_count` items into `previous_estimate`.
///
/// `current_page` is one-based. The estimate never decreases; a short page
/// turns `has_more` off and stops the "one more page" bump.
pub fn estimate(
    previous_estimate: u32,
    current_page: u32,
    page_size: u32,
    results_count: u32,
    max_results: u32,
) -> PageEstimate {
    let page_size = page_size.max(1);
    let current_page = current_page.max(1);
    let reached = u64::from(current_page) * u64::from(page_size);
    let max = u64::from(max_results);

    let has_more = results_count == page_size && reached < max;

    let seen = u64::from(current_page - 1) * u64::from(page_size) + u64::from(results_count);
    let mut total = seen.max(u64::from(previous_estimate)).min(max);
    if has_more {
        total = total.max((reached + 1).min(max));
    }

    PageEstimate {
        has_more,
        total_estimate: total as u32,
    }
}

/// `ceil(total_estimate / page_size)`.
pub fn total_pages(total_estimate: u32, page_size: u32) -> u32 {
    total_estimate.div_ceil(page_size.max(1))
}

/// Page numbers to show around `current_page`.
///
/// Up to [`WINDOW`] pages: all of them when they fit, otherwise a window
/// starting two before the current page, never below 1 or past the end.
pub fn visible_pages(current_page: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= WINDOW {
        return (1..=total_pages).collect();
    }
    let start = current_page.saturating_sub(2).max(1);
    let end = total_pages.min(start + WINDOW - 1);
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_page_scenario() {
        let first = estimate(0, 1, 8, 8, 48);
        assert_eq!(
            first,
            PageEstimate {
                has_more: true,
                total_estimate: 9
            }
        );
        assert_eq!(total_pages(first.total_estimate, 8), 2);

        let second = estimate(first.total_estimate, 2, 8, 5, 48);
        assert_eq!(
            second,
            PageEstimate {
                has_more: false,
                total_estimate: 13
            }
        );
        assert_eq!(total_pages(second.total_estimate, 8), 2);
    }

    #[test]
    fn short_page_means_no_more() {
        for count in 0..8 {
            assert!(!estimate(40, 3, 8, count, 48).has_more);
        }
    }

    #[test]
    fn ceiling_stops_growth() {
        let last = estimate(41, 6, 8, 8, 48);
        assert!(!last.has_more);
        assert_eq!(last.total_estimate, 48);

        let past = estimate(0, 1, 100, 100, 48);
        assert_eq!(past.total_estimate, 48);
    }

    #[test]
    fn revisiting_earlier_pages_never_shrinks_the_estimate() {
        let mut total = 0;
        let mut history = Vec::new();
        for (page, count) in [(1, 8), (2, 8), (3, 8), (1, 8), (2, 8), (4, 3), (1, 8)] {
            let next = estimate(total, page, 8, count, 48).total_estimate;
            assert!(next >= total, "estimate dropped from {total} to {next}");
            total = next;
            history.push(total);
        }
        assert_eq!(history, vec![9, 17, 25, 25, 25, 27, 27]);
    }

    #[test]
    fn window_examples() {
        assert_eq!(visible_pages(7, 10), vec![5, 6, 7, 8, 9]);
        assert_eq!(visible_pages(1, 3), vec![1, 2, 3]);
        assert_eq!(visible_pages(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(visible_pages(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(visible_pages(10, 10), vec![8, 9, 10]);
        assert!(visible_pages(1, 0).is_empty());
    }
}
