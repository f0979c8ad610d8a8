//! Offset/limit slicing over already-fetched rows.

/// Returns the window `[skip, skip + limit)` of `items`.
///
/// Follows sequence-slice semantics: a negative bound counts back from
/// the end, bounds past either end are clamped, and an empty or inverted
/// window yields an empty slice. Never fails.
#[must_use]
pub fn paginate<T>(items: &[T], skip: i64, limit: i64) -> &[T] {
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let start = resolve_bound(skip, len);
    let stop = resolve_bound(skip.saturating_add(limit), len);
    if stop <= start {
        return &[];
    }
    items.get(start..stop).unwrap_or(&[])
}

fn resolve_bound(index: i64, len: i64) -> usize {
    let resolved = if index < 0 {
        index.saturating_add(len).max(0)
    } else {
        index.min(len)
    };
    usize::try_from(resolved).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [u8; 5] = [1, 2, 3, 4, 5];

    #[test]
    fn first_page_returns_everything_when_limit_exceeds_total() {
        assert_eq!(paginate(&ROWS, 0, 20).len(), 5);
    }

    #[test]
    fn skip_inside_range_returns_the_tail() {
        assert_eq!(paginate(&ROWS, 3, 20), &[4, 5]);
    }

    #[test]
    fn skip_past_end_returns_nothing() {
        assert!(paginate(&ROWS, 10, 20).is_empty());
    }

    #[test]
    fn limit_bounds_the_window() {
        assert_eq!(paginate(&ROWS, 1, 2), &[2, 3]);
    }

    #[test]
    fn zero_limit_is_empty() {
        assert!(paginate(&ROWS, 0, 0).is_empty());
    }

    #[test]
    fn negative_skip_counts_from_the_end() {
        assert_eq!(paginate(&ROWS, -2, 20), &[4, 5]);
    }

    #[test]
    fn negative_limit_trims_from_the_end() {
        assert_eq!(paginate(&ROWS, 0, -1), &[1, 2, 3, 4]);
    }

    #[test]
    fn inverted_window_is_empty() {
        assert!(paginate(&ROWS, 3, -3).is_empty());
    }

    #[test]
    fn far_negative_skip_clamps_to_start() {
        assert_eq!(paginate(&ROWS, -100, 102), &[1, 2]);
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        assert_eq!(paginate(&ROWS, 0, i64::MAX).len(), 5);
        assert!(paginate(&ROWS, i64::MAX, i64::MAX).is_empty());
        assert!(paginate(&ROWS, i64::MIN, 1).is_empty());
    }

    #[test]
    fn empty_input_is_empty() {
        let empty: [u8; 0] = [];
        assert!(paginate(&empty, 0, 20).is_empty());
    }
}
