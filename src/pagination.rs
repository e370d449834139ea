//! Page/limit state shared by the paged tables

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    initial_per_page: u64,
}

impl Pagination {
    pub fn new(per_page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            page: 1,
            per_page,
            initial_per_page: per_page,
        }
    }

    pub fn next(&mut self) {
        self.page += 1;
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn go_to(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Changing the page size returns to the first page
    pub fn set_per_page(&mut self, per_page: u64) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    pub fn reset(&mut self) {
        self.page = 1;
        self.per_page = self.initial_per_page;
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page < self.total_pages(total)
    }

    /// 1-based index range shown, e.g. "26-50 of 120"
    pub fn range(&self, total: u64) -> (u64, u64) {
        if total == 0 {
            return (0, 0);
        }
        let start = (self.page - 1) * self.per_page + 1;
        (start.min(total), (self.page * self.per_page).min(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_never_goes_below_one() {
        let mut p = Pagination::new(25);
        p.prev();
        assert_eq!(p.page, 1);
        p.next();
        p.next();
        p.prev();
        assert_eq!(p.page, 2);
        p.go_to(0);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_set_per_page_resets_page() {
        let mut p = Pagination::new(25);
        p.go_to(4);
        p.set_per_page(50);
        assert_eq!((p.page, p.per_page), (1, 50));
        p.go_to(3);
        p.reset();
        assert_eq!((p.page, p.per_page), (1, 25));
    }

    #[test]
    fn test_total_pages_and_range() {
        let mut p = Pagination::new(25);
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(120), 5);
        p.go_to(2);
        assert_eq!(p.range(120), (26, 50));
        assert!(p.has_next(120));
        p.go_to(5);
        assert_eq!(p.range(120), (101, 120));
        assert!(!p.has_next(120));
    }
}
