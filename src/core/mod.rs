//! Core business logic - framework-agnostic catalog, sales, reporting and account operations.
//!
//! Every function takes a `SeaORM` connection and returns [`crate::errors::Result`]. The web
//! layer only parses input and formats output; all invariants live here.

/// Account registration, login sessions and user profiles
pub mod auth;
/// Category management with unique names
pub mod category;
/// Client management and search
pub mod client;
/// Delivery location management
pub mod delivery_location;
/// Product management, stock queries and the price/stock lookup
pub mod product;
/// Revenue reports and dashboard statistics
pub mod report;
/// Sale recording with atomic stock decrement
pub mod sale;
/// Idempotent seeding of the initial catalog
pub mod seed;
/// Store management
pub mod store;

use sea_orm::{ConnectionTrait, PaginatorTrait, SelectorTrait};
use serde::Serialize;

/// Number of rows per page in paginated listings.
pub const PAGE_SIZE: u64 = 20;

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    /// Total number of matching rows
    pub total_items: u64,
    /// Total number of pages (at least 1)
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Converts the rows of the page, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Fetches the requested 1-based page from any paginable query.
///
/// Page numbers below 1 are treated as 1, and numbers past the last page as the
/// last page.
pub(crate) async fn fetch_page<'db, C, S>(
    db: &'db C,
    selector: S,
    page: u64,
) -> crate::errors::Result<Page<<S::Selector as SelectorTrait>::Item>>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let paginator = selector.paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let total_pages = totals.number_of_pages.max(1);
    let page = page.clamp(1, total_pages);
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page {
        items,
        page,
        total_items: totals.number_of_items,
        total_pages,
    })
}

/// Trims a string and maps blank values to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Rounds a money amount to whole cents.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(3.0 * 10.0), 30.0);
        assert_eq!(round_to_cents(3.0 * 0.1), 0.3);
        assert_eq!(round_to_cents(2.675_000_1), 2.68);
    }
}
