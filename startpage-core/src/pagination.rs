use std::ops::Range;

/// Direction of travel for a page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Sign of horizontal travel on screen: next pages come in from the right.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Next => -1.0,
            Direction::Prev => 1.0,
        }
    }
}

/// Generic pagination over an ordered snapshot.
///
/// An empty snapshot has zero pages; `current_page` is then 0 and the caller
/// renders an empty state instead of a grid.
#[derive(Debug, Clone)]
pub struct PaginatedView<T> {
    items: Vec<T>,
    current_page: usize,
    items_per_page: usize,
}

impl<T> PaginatedView<T> {
    pub fn new(items: Vec<T>, items_per_page: usize) -> Self {
        Self::recompute(items, items_per_page, 0)
    }

    /// Build a view and clamp `current_page` into the new page range.
    pub fn recompute(items: Vec<T>, items_per_page: usize, current_page: usize) -> Self {
        let mut view = Self {
            items,
            current_page,
            items_per_page: items_per_page.max(1),
        };
        view.clamp();
        view
    }

    fn clamp(&mut self) {
        self.current_page = self.current_page.min(self.total_pages().saturating_sub(1));
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.items_per_page)
    }

    /// Replace the snapshot, keeping the current page where it still exists.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp();
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.clamp();
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page + 1 < self.total_pages()
    }

    pub fn prev_page(&mut self) -> bool {
        if self.can_go_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.can_go_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`. Returns the direction of travel, or `None` when the
    /// page is the current one or out of range.
    pub fn go_to_page(&mut self, page: usize) -> Option<Direction> {
        if page == self.current_page || page >= self.total_pages() {
            return None;
        }
        let direction = if page > self.current_page {
            Direction::Next
        } else {
            Direction::Prev
        };
        self.current_page = page;
        Some(direction)
    }

    pub fn page_range(&self, page: usize) -> Range<usize> {
        let start = (page * self.items_per_page).min(self.items.len());
        let end = (start + self.items_per_page).min(self.items.len());
        start..end
    }

    pub fn page(&self, page: usize) -> &[T] {
        &self.items[self.page_range(page)]
    }

    pub fn visible_items(&self) -> &[T] {
        self.page(self.current_page)
    }
}

impl<T> Default for PaginatedView<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_and_partition() {
        for n in 0..60usize {
            for per_page in 1..13usize {
                let view = PaginatedView::new((0..n).collect::<Vec<_>>(), per_page);
                assert_eq!(view.total_pages(), n.div_ceil(per_page));

                let covered: Vec<usize> = (0..view.total_pages())
                    .flat_map(|p| view.page(p).iter().copied())
                    .collect();
                assert_eq!(covered, (0..n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_twenty_six_links_two_pages() {
        let mut view = PaginatedView::new((0..26).collect::<Vec<_>>(), 24);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.visible_items(), &(0..24).collect::<Vec<_>>()[..]);

        assert!(view.next_page());
        assert_eq!(view.visible_items(), &[24, 25]);
    }

    #[test]
    fn test_empty_snapshot_has_zero_pages() {
        let view: PaginatedView<u8> = PaginatedView::new(Vec::new(), 24);
        assert_eq!(view.total_pages(), 0);
        assert_eq!(view.current_page(), 0);
        assert!(view.visible_items().is_empty());
        assert!(!view.can_go_next());
        assert!(!view.can_go_prev());
    }

    #[test]
    fn test_recompute_clamps_current_page() {
        // 50 items at 24 per page, viewing page 1, filter shrinks to 5 items
        let view = PaginatedView::recompute((0..50).collect::<Vec<_>>(), 24, 1);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.current_page(), 1);

        let view = PaginatedView::recompute((0..5).collect::<Vec<_>>(), 24, view.current_page());
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.current_page(), 0);

        let view = PaginatedView::recompute((0..30).collect::<Vec<_>>(), 10, 7);
        assert_eq!(view.current_page(), 2);

        let view = PaginatedView::recompute(Vec::<u8>::new(), 10, 4);
        assert_eq!(view.current_page(), 0);
    }

    #[test]
    fn test_items_per_page_change_clamps() {
        let mut view = PaginatedView::new((0..40).collect::<Vec<_>>(), 12);
        assert_eq!(view.go_to_page(3), Some(Direction::Next));
        view.set_items_per_page(30);
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.current_page(), 1);

        view.set_items_per_page(0);
        assert_eq!(view.items_per_page(), 1);
    }

    #[test]
    fn test_no_wraparound() {
        let mut view = PaginatedView::new((0..30).collect::<Vec<_>>(), 10);
        assert!(!view.prev_page());
        assert_eq!(view.current_page(), 0);

        view.go_to_page(2);
        assert!(!view.next_page());
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn test_go_to_page_direction_and_bounds() {
        let mut view = PaginatedView::new((0..30).collect::<Vec<_>>(), 10);
        assert_eq!(view.go_to_page(0), None);
        assert_eq!(view.go_to_page(3), None);
        assert_eq!(view.go_to_page(2), Some(Direction::Next));
        assert_eq!(view.go_to_page(1), Some(Direction::Prev));
        assert_eq!(view.current_page(), 1);
    }
}
