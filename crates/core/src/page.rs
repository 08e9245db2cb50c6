//! Pagination primitives for remote listings.

use serde::{Deserialize, Serialize};

/// An explicit page-size/page-number request against a remote listing.
///
/// Responses carry the next page number when more pages exist; its absence
/// terminates iteration. Both the child-item and cache listings use the
/// same termination rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// The first page of a listing.
    pub fn first(page_size: u32) -> Self {
        Self { page: 0, page_size }
    }

    /// The same listing at a different page number.
    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_starts_at_zero() {
        let page = PageRequest::first(100);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, 100);
    }

    #[test]
    fn with_page_keeps_size() {
        let page = PageRequest::first(50).with_page(3);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, 50);
    }
}
