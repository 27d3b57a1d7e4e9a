/// Page window arithmetic for list endpoints
///
/// Callers pass whatever `page` and `limit` the client sent. The values are
/// clamped into range, then resolved against the number of matching records:
///
/// - `limit` is clamped to `1..=100`; missing or zero means 10
/// - `page` is at least 1; missing or zero means 1
/// - with no records, `total_pages` is 0 and the window starts at the first row
/// - otherwise `page` is clamped down to the last page
///
/// # Example
///
/// ```
/// use minicrm_shared::pagination::PageWindow;
///
/// let window = PageWindow::resolve(Some(1000), Some(5000), 1);
/// assert_eq!(window.page, 1);
/// assert_eq!(window.limit, 100);
/// assert_eq!(window.total_pages, 1);
/// assert_eq!(window.offset, 0);
/// ```

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// A resolved page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page, 1-based
    pub page: i64,
    /// Rows per page
    pub limit: i64,
    /// Rows matching the listing's filter
    pub total_records: i64,
    /// Number of pages; 0 when there are no records
    pub total_pages: i64,
    /// Rows to skip
    pub offset: i64,
}

impl PageWindow {
    /// Normalizes a requested page and limit against a record count
    pub fn resolve(page: Option<i64>, limit: Option<i64>, total_records: i64) -> Self {
        let limit = match limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => limit,
        }
        .clamp(1, MAX_LIMIT);

        let requested_page = match page {
            None | Some(0) => DEFAULT_PAGE,
            Some(page) => page,
        }
        .max(1);

        let total_records = total_records.max(0);

        if total_records == 0 {
            return Self {
                page: 1,
                limit,
                total_records: 0,
                total_pages: 0,
                offset: 0,
            };
        }

        let total_pages = (total_records + limit - 1) / limit;
        let page = requested_page.min(total_pages);

        Self {
            page,
            limit,
            total_records,
            total_pages,
            offset: (page - 1) * limit,
        }
    }
}

/// One page of results as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub page: i64,
    pub limit: i64,
    pub total_records: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(window: PageWindow, data: Vec<T>) -> Self {
        Self {
            page: window.page,
            limit: window.limit,
            total_records: window.total_records,
            total_pages: window.total_pages,
            data,
        }
    }
}
