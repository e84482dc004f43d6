use serde::Serialize;

/// Which slice of a filtered list the current page shows.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl PageWindow {
    /// A page outside `1..=total_pages` falls back to the first one.
    pub fn new(total_items: usize, page_size: usize, requested: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let current = if requested == 0 || requested > total_pages {
            1
        } else {
            requested
        };

        Self {
            current,
            total_pages,
            total_items,
            page_size,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    fn bounds(&self) -> (usize, usize) {
        let start = ((self.current - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        (start, end)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let (start, end) = self.bounds();
        items.get(start..end).unwrap_or(&[])
    }

    /// Every page number, for the numbered pagination buttons.
    pub fn pages(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// "Showing 11 to 20 of 25"
    pub fn summary(&self) -> String {
        let (start, end) = self.bounds();
        if start == end {
            return format!("Showing 0 of {}", self.total_items);
        }
        format!("Showing {} to {} of {}", start + 1, end, self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use super::*;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    #[case(7, 5, 2)]
    fn total_pages_is_ceiling_division(#[case] items: usize, #[case] size: usize, #[case] pages: usize) {
        assert_eq!(PageWindow::new(items, size, 1).total_pages, pages);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(4, 1)]
    #[case(99, 1)]
    fn out_of_range_page_resets_to_first(#[case] requested: usize, #[case] current: usize) {
        assert_eq!(PageWindow::new(25, 10, requested).current, current);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let items: Vec<usize> = (0..25).collect();
        let window = PageWindow::new(items.len(), 10, 3);
        assert_eq!(window.slice(&items), &[20, 21, 22, 23, 24]);
        assert!(window.has_previous());
        assert!(!window.has_next());
        assert_eq!(window.pages(), vec![1, 2, 3]);
        assert_eq!(window.summary(), "Showing 21 to 25 of 25");
    }

    #[test]
    fn empty_list_has_no_neighbours() {
        let items: Vec<u8> = Vec::new();
        let window = PageWindow::new(0, 10, 1);
        assert!(window.slice(&items).is_empty());
        assert!(!window.has_previous());
        assert!(!window.has_next());
        assert_eq!(window.summary(), "Showing 0 of 0");
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        assert_eq!(PageWindow::new(3, 0, 2).total_pages, 3);
    }
}
