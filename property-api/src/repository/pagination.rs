//! Offset pagination for repository queries

/// Number of records to skip and to return
///
/// ```rust
/// use property_api::repository::Pagination;
///
/// let page3 = Pagination::page(3, 20);
/// assert_eq!(page3.skip, 40);
/// assert_eq!(page3.take, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub skip: i64,
    /// Maximum number of results to return
    pub take: i64,
}

impl Pagination {
    #[must_use]
    pub const fn new(skip: i64, take: i64) -> Self {
        Self { skip, take }
    }

    /// Pagination for a 1-indexed page number
    ///
    /// Page numbers below 1 behave like page 1. Values are otherwise passed
    /// through unclamped; adapters treat negative `take` as zero.
    #[must_use]
    pub const fn page(page: i64, per_page: i64) -> Self {
        let preceding = if page > 1 { page - 1 } else { 0 };
        Self {
            skip: preceding.saturating_mul(per_page),
            take: per_page,
        }
    }

    /// `skip` clamped to a usable offset
    #[must_use]
    pub fn offset(&self) -> usize {
        usize::try_from(self.skip).unwrap_or(0)
    }

    /// `take` clamped to a usable limit
    #[must_use]
    pub fn limit(&self) -> usize {
        usize::try_from(self.take).unwrap_or(0)
    }
}
