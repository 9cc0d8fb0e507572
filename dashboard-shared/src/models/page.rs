use serde::{Deserialize, Serialize};

/// Page envelope returned by the list endpoints (`/users/`, `/messages/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    /// Total number of rows across all pages.
    pub count: u64,
    /// Absolute URL of the following page, if any.
    pub next: Option<String>,
    /// Absolute URL of the preceding page, if any.
    pub previous: Option<String>,
    /// Rows on this page, in server order.
    pub results: Vec<T>,
}

/// One fetched page plus the navigation metadata a view needs.
///
/// Replaced wholesale on every fetch; pages are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Total rows reported by the server at fetch time.
    pub total_count: u64,
    /// Server reported a following page.
    pub has_next: bool,
    /// Server reported a preceding page.
    pub has_previous: bool,
    /// 1-based index of this page.
    pub page_index: u32,
}

impl<T> PageResult<T> {
    /// Converts a wire envelope fetched for `page_index`.
    #[must_use]
    pub fn from_response(page_index: u32, response: Paginated<T>) -> Self {
        Self {
            items: response.results,
            total_count: response.count,
            has_next: response.next.is_some(),
            has_previous: response.previous.is_some(),
            page_index: page_index.max(1),
        }
    }

    /// "Next" is offered only when the server reported a following page.
    #[must_use]
    pub const fn can_go_next(&self) -> bool {
        self.has_next
    }

    /// "Previous" is offered only past page 1 and when the server agrees.
    #[must_use]
    pub const fn can_go_previous(&self) -> bool {
        self.page_index > 1 && self.has_previous
    }

    /// Count label in the form `"{shown} of {total}"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} of {}", self.items.len(), self.total_count)
    }
}
