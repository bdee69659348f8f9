//! Pagination of ordered collections.

use std::ops::RangeInclusive;

/// Number of page links shown around the current page.
const VISIBLE_PAGES: usize = 5;

/// Which page numbers a pagination bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    pub visible_start: usize,
    pub visible_end: usize,
    /// Page 1 is outside the visible range.
    pub show_first: bool,
    /// More than one page lies between page 1 and the visible range.
    pub show_first_ellipsis: bool,
    /// The last page is outside the visible range.
    pub show_last: bool,
    /// More than one page lies between the visible range and the last page.
    pub show_last_ellipsis: bool,
}

impl PaginationView {
    /// Compute the view for `current` of `total` pages (both 1-based).
    ///
    /// The range spans two pages either side of `current`, widened to five
    /// pages near either end when enough pages exist.
    pub fn new(current: usize, total: usize) -> Self {
        let total = total.max(1);
        let current = current.clamp(1, total);

        let mut start = current.saturating_sub(2).max(1);
        let mut end = (current + 2).min(total);

        if end - start + 1 < VISIBLE_PAGES && total > VISIBLE_PAGES - 1 {
            if start == 1 {
                end = VISIBLE_PAGES.min(total);
            } else if end == total {
                start = (total + 1).saturating_sub(VISIBLE_PAGES).max(1);
            }
        }

        Self {
            current_page: current,
            total_pages: total,
            visible_start: start,
            visible_end: end,
            show_first: start > 1,
            show_first_ellipsis: start > 2,
            show_last: end < total,
            show_last_ellipsis: total - end > 1,
        }
    }

    /// Page numbers in the visible range.
    pub fn visible_pages(&self) -> RangeInclusive<usize> {
        self.visible_start..=self.visible_end
    }

    /// Whether there is a previous page.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Whether there is a next page.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One page worth of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow<'a, T> {
    /// 1-based page number.
    pub page_number: usize,
    pub items: &'a [T],
    pub is_first_page: bool,
    pub pagination: PaginationView,
    /// Site-relative URL of this page.
    pub url: String,
}

/// How to split a collection.
#[derive(Debug, Clone, Copy)]
pub struct PaginateOptions<'p> {
    /// Items per page; zero is treated as one.
    pub per_page: usize,
    /// URL of page 1, ending in `/`.
    pub base_path: &'p str,
}

/// Split `items` into pages. No items means no pages.
pub fn paginate<'a, T>(items: &'a [T], options: PaginateOptions<'_>) -> Vec<PageWindow<'a, T>> {
    let per_page = options.per_page.max(1);
    let total = items.len().div_ceil(per_page);

    items
        .chunks(per_page)
        .enumerate()
        .map(|(i, chunk)| {
            let page_number = i + 1;
            PageWindow {
                page_number,
                items: chunk,
                is_first_page: page_number == 1,
                pagination: PaginationView::new(page_number, total),
                url: page_url(options.base_path, page_number),
            }
        })
        .collect()
}

/// URL of page `page` below `base_path`.
pub fn page_url(base_path: &str, page: usize) -> String {
    if page <= 1 {
        base_path.to_string()
    } else {
        format!("{base_path}page/{page}/")
    }
}

/// Path of the output file for a site-relative URL (`/page/2/` to
/// `page/2/index.html`).
pub fn output_file(url: &str) -> String {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{trimmed}/index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(per_page: usize) -> PaginateOptions<'static> {
        PaginateOptions {
            per_page,
            base_path: "/",
        }
    }

    #[test]
    fn test_paginate_sizes() {
        let items: Vec<u32> = (0..23).collect();
        let pages = paginate(&items, opts(10));

        let sizes: Vec<_> = pages.iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(pages[2].items, &[20, 21, 22]);
        assert!(pages[0].is_first_page);
        assert!(!pages[1].is_first_page);
        assert!(pages.iter().all(|p| p.pagination.total_pages == 3));
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        assert!(paginate(&items, opts(10)).is_empty());
    }

    #[test]
    fn test_paginate_zero_per_page() {
        let items = [1, 2];
        assert_eq!(paginate(&items, opts(0)).len(), 2);
    }

    #[test]
    fn test_page_urls() {
        let items: Vec<u32> = (0..5).collect();
        let pages = paginate(
            &items,
            PaginateOptions {
                per_page: 2,
                base_path: "/blog/",
            },
        );
        let urls: Vec<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/blog/", "/blog/page/2/", "/blog/page/3/"]);
    }

    #[test]
    fn test_view_middle() {
        let view = PaginationView::new(5, 10);
        assert_eq!(view.visible_pages(), 3..=7);
        assert!(view.show_first);
        assert!(view.show_first_ellipsis);
        assert!(view.show_last);
        assert!(view.show_last_ellipsis);
    }

    #[test]
    fn test_view_widens_at_edges() {
        let view = PaginationView::new(1, 10);
        assert_eq!(view.visible_pages(), 1..=5);
        assert!(!view.show_first);
        assert!(view.show_last_ellipsis);

        let view = PaginationView::new(10, 10);
        assert_eq!(view.visible_pages(), 6..=10);
        assert!(view.show_first_ellipsis);
        assert!(!view.show_last);

        let view = PaginationView::new(2, 6);
        assert_eq!(view.visible_pages(), 1..=5);
        assert!(view.show_last);
        assert!(!view.show_last_ellipsis);
    }

    #[test]
    fn test_view_gap_of_one_has_no_ellipsis() {
        let view = PaginationView::new(4, 10);
        assert_eq!(view.visible_pages(), 2..=6);
        assert!(view.show_first);
        assert!(!view.show_first_ellipsis);
    }

    #[test]
    fn test_view_few_pages() {
        let view = PaginationView::new(2, 3);
        assert_eq!(view.visible_pages(), 1..=3);
        assert!(!view.show_first && !view.show_last);
        assert!(view.has_prev() && view.has_next());

        let single = PaginationView::new(1, 1);
        assert!(!single.has_prev() && !single.has_next());
    }

    #[test]
    fn test_output_file() {
        assert_eq!(output_file("/"), "index.html");
        assert_eq!(output_file("/page/2/"), "page/2/index.html");
        assert_eq!(output_file("/posts/hello/"), "posts/hello/index.html");
    }
}
