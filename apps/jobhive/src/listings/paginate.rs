//! Client-side truncation of the matched list. No server paging.

/// How many jobs the summary (home page) view shows.
pub const SUMMARY_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Summary,
    FullPage,
}

pub fn paginate<T>(items: &[T], mode: DisplayMode) -> &[T] {
    match mode {
        DisplayMode::Summary => &items[..items.len().min(SUMMARY_LIMIT)],
        DisplayMode::FullPage => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_shows_min_of_len_and_six() {
        for n in [0usize, 1, 5, 6, 7, 20] {
            let items: Vec<usize> = (0..n).collect();
            assert_eq!(paginate(&items, DisplayMode::Summary).len(), n.min(6));
        }
    }

    #[test]
    fn test_summary_keeps_leading_items() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(paginate(&items, DisplayMode::Summary), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_full_page_shows_everything() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(paginate(&items, DisplayMode::FullPage).len(), 10);
    }
}
