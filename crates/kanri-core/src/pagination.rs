use kanri_api::PageRequest;

/// Server-side pagination state: 1-based page, page size and total count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Apply a pagination-control change. Page and size move together.
    ///
    /// Returns `true` when anything changed.
    pub fn set(&mut self, page: u32, page_size: u32) -> bool {
        let next = PageRequest::new(page, page_size);
        let changed = next.page != self.page || next.page_size != self.page_size;
        self.page = next.page;
        self.page_size = next.page_size;
        changed
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Last page index; 1 for an empty collection.
    pub fn last_page(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// How many items the current page should hold given `total`.
    pub fn expected_len(&self) -> u64 {
        let size = u64::from(self.page_size);
        let start = u64::from(self.page - 1) * size;
        self.total.saturating_sub(start).min(size)
    }

    /// "41-50 of 57" style summary.
    pub fn summary(&self) -> String {
        let len = self.expected_len();
        if len == 0 {
            return format!("0 of {}", self.total);
        }
        let start = u64::from(self.page - 1) * u64::from(self.page_size) + 1;
        format!("{start}-{} of {}", start + len - 1, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_last_page() {
        let pager = Pager {
            page: 2,
            page_size: 10,
            total: 25,
        };
        assert_eq!(pager.last_page(), 3);
        assert_eq!(pager.expected_len(), 10);

        let last = Pager { page: 3, ..pager };
        assert_eq!(last.expected_len(), 5);
        assert_eq!(last.summary(), "21-25 of 25");
    }

    #[test]
    fn test_empty_collection() {
        let pager = Pager::new(10);
        assert_eq!(pager.last_page(), 1);
        assert_eq!(pager.expected_len(), 0);
        assert_eq!(pager.summary(), "0 of 0");
    }

    #[test]
    fn test_set_is_atomic_and_reports_change() {
        let mut pager = Pager::new(10);
        assert!(pager.set(3, 20));
        assert_eq!(pager.request(), PageRequest::new(3, 20));
        assert!(!pager.set(3, 20));
        assert!(pager.set(0, 20));
        assert_eq!(pager.page, 1);
    }
}
