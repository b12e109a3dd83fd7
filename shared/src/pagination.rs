//! Page arithmetic and the page indicator strip under the transaction list.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows per page when the user has not picked a size
    pub default_page_size: u64,
    /// Sizes offered in the page size selector
    pub page_size_options: Vec<u64>,
    /// Number of page links shown around the current page
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            page_size_options: vec![20, 50, 100, 200],
            max_pages: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    Back(u64),
    Next(u64),
}

/// Number of pages needed for `total` rows. An empty result still has one page.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// 1-based page holding the row at 0-based `index`
pub fn page_of_index(index: usize, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    index as u64 / page_size + 1
}

/// Links to render for `curr_page` of `total_pages`, with first/last pages
/// always reachable and ellipses over skipped ranges.
pub fn indicators(curr_page: u64, total_pages: u64, max_pages: u64) -> Vec<PageIndicator> {
    let total_pages = total_pages.max(1);
    let curr_page = curr_page.clamp(1, total_pages);
    let max_pages = max_pages.max(1);

    let (start, end) = if total_pages <= max_pages {
        (1, total_pages)
    } else {
        let start = curr_page.saturating_sub(max_pages / 2).max(1);
        let end = start + max_pages - 1;
        if end > total_pages {
            (total_pages - max_pages + 1, total_pages)
        } else {
            (start, end)
        }
    };

    let mut out = Vec::new();
    if curr_page > 1 {
        out.push(PageIndicator::Back(curr_page - 1));
    }
    if start > 1 {
        out.push(PageIndicator::Page(1));
        if start > 2 {
            out.push(PageIndicator::Ellipsis);
        }
    }
    out.extend((start..=end).map(|page| {
        if page == curr_page {
            PageIndicator::CurrPage(page)
        } else {
            PageIndicator::Page(page)
        }
    }));
    if end < total_pages {
        if end + 1 < total_pages {
            out.push(PageIndicator::Ellipsis);
        }
        out.push(PageIndicator::Page(total_pages));
    }
    if curr_page < total_pages {
        out.push(PageIndicator::Next(curr_page + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::PageIndicator::*;
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
        assert_eq!(page_count(10, 0), 1);
    }

    #[test]
    fn test_page_of_index() {
        assert_eq!(page_of_index(0, 50), 1);
        assert_eq!(page_of_index(49, 50), 1);
        assert_eq!(page_of_index(50, 50), 2);
    }

    #[test]
    fn test_single_page_has_no_buttons() {
        assert_eq!(indicators(1, 1, 5), vec![CurrPage(1)]);
    }

    #[test]
    fn test_all_pages_fit() {
        assert_eq!(
            indicators(2, 4, 5),
            vec![Back(1), Page(1), CurrPage(2), Page(3), Page(4), Next(3)]
        );
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(
            indicators(1, 10, 5),
            vec![CurrPage(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10), Next(2)]
        );
    }

    #[test]
    fn test_window_in_middle() {
        assert_eq!(
            indicators(6, 10, 5),
            vec![
                Back(5),
                Page(1),
                Ellipsis,
                Page(4),
                Page(5),
                CurrPage(6),
                Page(7),
                Page(8),
                Ellipsis,
                Page(10),
                Next(7)
            ]
        );
    }

    #[test]
    fn test_window_at_end() {
        assert_eq!(
            indicators(10, 10, 5),
            vec![Back(9), Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), CurrPage(10)]
        );
    }

    #[test]
    fn test_no_ellipsis_for_adjacent_edge_page() {
        assert_eq!(
            indicators(4, 10, 5),
            vec![Back(3), Page(1), Page(2), Page(3), CurrPage(4), Page(5), Page(6), Ellipsis, Page(10), Next(5)]
        );
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        assert_eq!(indicators(9, 2, 5), vec![Back(1), Page(1), CurrPage(2)]);
    }
}
