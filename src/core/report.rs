//! Reporting business logic - Aggregates over recorded sales.
//!
//! All reports read from the `sales` table only. An empty table yields zero totals and
//! empty lists, never an error.

use crate::{
    core::{
        product::low_stock_products,
        round_to_cents,
        sale::{SaleListing, recent_sales},
    },
    entities::{Client, Product, Sale, product, sale},
    errors::Result,
};
use sea_orm::{
    FromQueryResult, JoinType, PaginatorTrait, QueryOrder, QuerySelect, RelationTrait, Select,
    prelude::*, sea_query::Expr,
};
use serde::Serialize;

/// Number of months shown in the monthly revenue report.
pub const MONTHS_IN_REPORT: u64 = 12;
/// Number of products in the best-seller list.
pub const TOP_PRODUCTS_LIMIT: u64 = 10;
/// Number of low-stock products and recent sales on the dashboard.
pub const DASHBOARD_LIST_LIMIT: u64 = 5;

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// Month as `YYYY-MM`
    pub month: String,
    /// Sum of sale totals in that month
    pub total: f64,
}

/// A product ranked by units sold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    /// Product ID
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Total units sold
    pub quantity_sold: i64,
    /// Sum of sale totals
    pub revenue: f64,
}

/// Sales figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    /// Product ID
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Current list price
    pub list_price: f64,
    /// Total units sold
    pub quantity_sold: i64,
    /// Sum of sale totals
    pub revenue: f64,
    /// Mean of the unit prices charged, one value per sale
    pub average_unit_price: f64,
}

/// The revenue report page: monthly totals, grand total and best sellers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    /// Most recent month first
    pub monthly: Vec<MonthlyRevenue>,
    /// Sum of all sale totals
    pub total_revenue: f64,
    /// Best sellers by units sold
    pub top_products: Vec<TopProduct>,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Number of products
    pub product_count: u64,
    /// Number of clients
    pub client_count: u64,
    /// Number of sales
    pub sale_count: u64,
    /// Sum of all sale totals
    pub total_revenue: f64,
    /// Products running low, lowest stock first
    pub low_stock_products: Vec<product::Model>,
    /// Latest sales, newest first
    pub recent_sales: Vec<SaleListing>,
}

#[derive(Debug, FromQueryResult)]
struct ProductAggregate {
    product_id: i64,
    product_name: String,
    list_price: f64,
    quantity_sold: i64,
    revenue: f64,
    unit_price_sum: f64,
    sale_count: i64,
}

/// Sales grouped by product with quantity, revenue and unit-price sums.
fn product_aggregates() -> Select<Sale> {
    Sale::find()
        .select_only()
        .column_as(sale::Column::ProductId, "product_id")
        .column_as(product::Column::Name, "product_name")
        .column_as(product::Column::Price, "list_price")
        .column_as(
            Expr::col((Sale, sale::Column::Quantity)).sum(),
            "quantity_sold",
        )
        .column_as(Expr::col((Sale, sale::Column::Total)).sum(), "revenue")
        .column_as(
            Expr::col((Sale, sale::Column::UnitPrice)).sum(),
            "unit_price_sum",
        )
        .column_as(Expr::col((Sale, sale::Column::Id)).count(), "sale_count")
        .join(JoinType::InnerJoin, sale::Relation::Product.def())
        .group_by(sale::Column::ProductId)
        .group_by(product::Column::Name)
        .group_by(product::Column::Price)
}

/// Sum of all sale totals; `0.0` when there are no sales.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn total_revenue(db: &DatabaseConnection) -> Result<f64> {
    let total = Sale::find()
        .select_only()
        .column_as(Expr::col(sale::Column::Total).sum(), "total_revenue")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0.0);
    Ok(round_to_cents(total))
}

/// Revenue per calendar month, at most [`MONTHS_IN_REPORT`] months, most recent first.
///
/// Months without sales are omitted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn monthly_revenue(db: &DatabaseConnection) -> Result<Vec<MonthlyRevenue>> {
    // Stored timestamps are ISO-8601 text, so the first seven characters are `YYYY-MM`.
    let month = || Expr::cust(r#"substr("sales"."timestamp", 1, 7)"#);

    let rows = Sale::find()
        .select_only()
        .column_as(month(), "month")
        .column_as(Expr::col(sale::Column::Total).sum(), "total")
        .group_by(month())
        .order_by_desc(Expr::cust("month"))
        .limit(MONTHS_IN_REPORT)
        .into_tuple::<(String, f64)>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(month, total)| MonthlyRevenue {
            month,
            total: round_to_cents(total),
        })
        .collect())
}

/// Best-selling products by units sold, at most [`TOP_PRODUCTS_LIMIT`].
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn top_products(db: &DatabaseConnection) -> Result<Vec<TopProduct>> {
    let rows = product_aggregates()
        .order_by_desc(Expr::cust("quantity_sold"))
        .order_by_asc(sale::Column::ProductId)
        .limit(TOP_PRODUCTS_LIMIT)
        .into_model::<ProductAggregate>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| TopProduct {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity_sold: row.quantity_sold,
            revenue: round_to_cents(row.revenue),
        })
        .collect())
}

/// Per-product sales summary ordered by revenue, highest first.
///
/// Only products with at least one sale appear.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn product_summary(db: &DatabaseConnection) -> Result<Vec<ProductSummary>> {
    let rows = product_aggregates()
        .order_by_desc(Expr::cust("revenue"))
        .order_by_asc(sale::Column::ProductId)
        .into_model::<ProductAggregate>()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            #[allow(clippy::cast_precision_loss)]
            let average_unit_price = if row.sale_count > 0 {
                round_to_cents(row.unit_price_sum / row.sale_count as f64)
            } else {
                0.0
            };
            ProductSummary {
                product_id: row.product_id,
                product_name: row.product_name,
                list_price: row.list_price,
                quantity_sold: row.quantity_sold,
                revenue: round_to_cents(row.revenue),
                average_unit_price,
            }
        })
        .collect())
}

/// Builds the revenue report page.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn revenue_report(db: &DatabaseConnection) -> Result<RevenueReport> {
    Ok(RevenueReport {
        monthly: monthly_revenue(db).await?,
        total_revenue: total_revenue(db).await?,
        top_products: top_products(db).await?,
    })
}

/// Gathers the dashboard figures.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats> {
    Ok(DashboardStats {
        product_count: Product::find().count(db).await?,
        client_count: Client::find().count(db).await?,
        sale_count: Sale::find().count(db).await?,
        total_revenue: total_revenue(db).await?,
        low_stock_products: low_stock_products(db, DASHBOARD_LIST_LIMIT).await?,
        recent_sales: recent_sales(db, DASHBOARD_LIST_LIMIT).await?,
    })
}
