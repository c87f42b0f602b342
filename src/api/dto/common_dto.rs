//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to the allowed maximum
    /// of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

impl PaginationMeta {
    /// Builds pagination metadata for a total item count. A zero
    /// `per_page` yields zero pages rather than dividing by zero.
    #[must_use]
    pub const fn new(page: u32, per_page: u32, total: u32) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Applies pagination to an already-materialized collection, returning the
/// page slice plus metadata.
pub fn paginate<T>(items: Vec<T>, params: &PaginationParams) -> (Vec<T>, PaginationMeta) {
    let params = params.clamped();
    #[allow(clippy::cast_possible_truncation)]
    let total = items.len().min(u32::MAX as usize) as u32;
    // Offset in usize with saturation: a huge page number must yield an
    // empty page, not an overflow panic.
    let start = (params.page.saturating_sub(1) as usize).saturating_mul(params.per_page as usize);
    let page: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(params.per_page as usize)
        .collect();
    (page, PaginationMeta::new(params.page, params.per_page, total))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamped_enforces_bounds() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
    }

    #[test]
    fn paginate_slices_and_counts() {
        let items: Vec<u32> = (0..45).collect();
        let params = PaginationParams {
            page: 2,
            per_page: 20,
        };
        let (page, meta) = paginate(items, &params);
        assert_eq!(page.len(), 20);
        assert_eq!(page.first().copied(), Some(20));
        assert_eq!(meta.total, 45);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let (page, meta) = paginate(
            Vec::<u32>::new(),
            &PaginationParams {
                page: 1,
                per_page: 20,
            },
        );
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn huge_page_number_yields_empty_page_without_panicking() {
        let items: Vec<u32> = (0..45).collect();
        let params = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        };
        let (page, meta) = paginate(items, &params);
        assert!(page.is_empty());
        assert_eq!(meta.page, u32::MAX);
        assert_eq!(meta.total, 45);
    }

    #[test]
    fn zero_per_page_meta_has_zero_pages() {
        let meta = PaginationMeta::new(1, 0, 45);
        assert_eq!(meta.total_pages, 0);
    }
}
