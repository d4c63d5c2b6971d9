/// `ceil(total_rows / page_size)`, never less than one. A page size of zero
/// means everything fits on a single page.
pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_rows.div_ceil(page_size).max(1)
}

/// Slice `rows` to the requested 1-based page, clamping the page number into
/// `[1, total_pages]`. Returns the page rows and the page count.
pub fn paginate<T>(rows: &[T], page_size: usize, page: usize) -> (&[T], usize) {
    let pages = total_pages(rows.len(), page_size);
    if page_size == 0 {
        return (rows, pages);
    }

    let page = page.clamp(1, pages);
    let start = ((page - 1) * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());
    (&rows[start..end], pages)
}

/// Current-page state for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            current_page: 1,
            total_pages: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Recompute the page count for a new result size and clamp the current page.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_pages = total_pages(total_rows, self.page_size);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Jump to `page`, clamped to the known page count.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages);
    }

    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 0), 1);
    }

    #[test]
    fn test_paginate_slices_pages() {
        let rows: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&rows, 10, 1), (&rows[0..10], 3));
        assert_eq!(paginate(&rows, 10, 3), (&rows[20..25], 3));
    }

    #[test]
    fn test_paginate_clamps_out_of_range_pages() {
        let rows: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&rows, 10, 99), paginate(&rows, 10, 3));
        assert_eq!(paginate(&rows, 10, 0), paginate(&rows, 10, 1));
    }

    #[test]
    fn test_paginate_degenerate_inputs() {
        let empty: Vec<u32> = Vec::new();
        let (page, pages) = paginate(&empty, 10, 4);
        assert!(page.is_empty());
        assert_eq!(pages, 1);

        let rows = vec![1, 2, 3];
        assert_eq!(paginate(&rows, 0, 7), (&rows[..], 1));
    }

    #[test]
    fn test_paginate_is_idempotent_on_a_page() {
        let rows: Vec<u32> = (1..=25).collect();
        let (page, _) = paginate(&rows, 10, 2);
        let (again, pages) = paginate(page, 10, 1);
        assert_eq!(again, page);
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_navigation_is_idempotent_at_edges() {
        let mut paginator = Paginator::new(10);
        paginator.set_total_rows(25);

        assert!(!paginator.prev());
        assert_eq!(paginator.current_page(), 1);
        assert!(paginator.next());
        assert!(paginator.next());
        assert!(!paginator.next());
        assert_eq!(paginator.current_page(), 3);
        assert!(paginator.prev());
        assert_eq!(paginator.current_page(), 2);
    }

    #[test]
    fn test_shrinking_result_reclamps_page() {
        let mut paginator = Paginator::new(5);
        paginator.set_total_rows(40);
        paginator.go_to(8);
        assert_eq!(paginator.current_page(), 8);

        paginator.set_total_rows(12);
        assert_eq!(paginator.current_page(), 3);
        assert_eq!(paginator.total_pages(), 3);
    }
}
