//! Page requests and the 10-page navigation window.

/// Default page size for post listings.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of page links shown per navigation group.
pub const PAGE_GROUP_SIZE: u32 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from optional query values.
    ///
    /// Missing values take the defaults; `page` is clamped to at least 1 and
    /// `size` to `1..=100`.
    ///
    /// ```
    /// use library_board::board::PageRequest;
    ///
    /// let req = PageRequest::new(Some(0), Some(500));
    /// assert_eq!((req.page, req.size), (1, 100));
    /// assert_eq!(PageRequest::new(Some(3), None).offset(), 16);
    /// ```
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, u32::MAX as i64) as u32;
        let size = size
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as u32;
        Self { page, size }
    }

    /// Zero-based row offset.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// Navigation metadata for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub start_page: u32,
    pub end_page: u32,
    pub has_prev_group: bool,
    pub prev_group_page: u32,
    pub has_next_group: bool,
    pub next_group_page: u32,
}

impl PageWindow {
    pub fn new(request: PageRequest, total_elements: i64) -> Self {
        let size = request.size.max(1) as i64;
        let total = total_elements.max(0);
        let total_pages = to_page_number((total + size - 1) / size);

        // Group arithmetic runs in i64 so the last group below u32::MAX
        // cannot overflow.
        let page = request.page.max(1) as i64;
        let group_size = PAGE_GROUP_SIZE as i64;
        let start = (page - 1) / group_size * group_size + 1;
        let end = (start + group_size - 1).min(total_pages as i64);

        Self {
            page: request.page,
            size: request.size,
            total_elements: total,
            total_pages,
            start_page: to_page_number(start),
            end_page: to_page_number(end),
            has_prev_group: start > 1,
            prev_group_page: to_page_number(start - 1),
            has_next_group: end < total_pages as i64,
            next_group_page: to_page_number(end + 1),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn to_page_number(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Items of one page plus their navigation window.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}
