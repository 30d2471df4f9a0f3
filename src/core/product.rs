//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for listing, creating, updating and deleting products,
//! plus the stock-oriented queries used by the sale form and the dashboard. Stock is only
//! ever decremented by [`crate::core::sale::create_sale`]; here it is set directly on
//! create and update.

use crate::{
    core::{Page, fetch_page, non_blank},
    entities::{Category, Product, Sale, category, product, sale},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Products with fewer units than this are reported as low on stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

const MAX_NAME_LEN: usize = 200;

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductInput {
    /// Product name (required)
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price; must be positive and finite
    pub price: f64,
    /// Units in stock; must not be negative
    pub stock: i32,
    /// Optional category; must exist when given
    pub category_id: Option<i64>,
}

/// Filters for [`list_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring matched against name and description
    pub search: Option<String>,
    /// Only products in this category
    pub category_id: Option<i64>,
}

/// A product row with its category name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    /// The product row
    #[serde(flatten)]
    pub product: product::Model,
    /// Name of the product's category, if any
    pub category_name: Option<String>,
}

/// The price/stock lookup returned to the sale form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInfo {
    /// Current unit price
    pub price: f64,
    /// Units in stock
    pub stock: i32,
    /// Product name
    pub name: String,
}

/// Validates and normalizes product input, checking that the category exists.
///
/// # Errors
/// Returns [`Error::Validation`] naming the offending field.
async fn validate_input(db: &DatabaseConnection, input: ProductInput) -> Result<ProductInput> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("name", "Product name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("Product name cannot exceed {MAX_NAME_LEN} characters"),
        ));
    }

    if !input.price.is_finite() || input.price <= 0.0 {
        return Err(Error::validation("price", "Price must be greater than zero"));
    }

    if input.stock < 0 {
        return Err(Error::validation("stock", "Stock cannot be negative"));
    }

    if let Some(category_id) = input.category_id {
        if Category::find_by_id(category_id).one(db).await?.is_none() {
            return Err(Error::validation(
                "category_id",
                format!("Category {category_id} does not exist"),
            ));
        }
    }

    Ok(ProductInput {
        name,
        description: non_blank(input.description),
        ..input
    })
}

/// Lists products ordered by name, optionally filtered, one page at a time.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
    page: u64,
) -> Result<Page<ProductListing>> {
    let mut query = Product::find()
        .find_also_related(Category)
        .order_by_asc(product::Column::Name)
        .order_by_asc(product::Column::Id);

    if let Some(term) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        query = query.filter(
            Condition::any()
                .add(product::Column::Name.contains(term))
                .add(product::Column::Description.contains(term)),
        );
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }

    let page = fetch_page(db, query, page).await?;
    Ok(page.map(|(product, category)| ProductListing {
        product,
        category_name: category.map(|c: category::Model| c.name),
    }))
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no product has this ID.
pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Product", product_id))
}

/// Returns the current price, stock and name of a product.
///
/// The sale form calls this whenever the selected product changes.
///
/// # Errors
/// Returns [`Error::NotFound`] if no product has this ID.
pub async fn product_info(db: &DatabaseConnection, product_id: i64) -> Result<ProductInfo> {
    debug!("Looking up price and stock for product {}", product_id);
    let product = get_product(db, product_id).await?;
    Ok(ProductInfo {
        price: product.price,
        stock: product.stock,
        name: product.name,
    })
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or too long
/// - The price is zero, negative or not finite (NaN, infinity)
/// - The stock is negative
/// - The given category does not exist
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model> {
    let input = validate_input(db, input).await?;

    let product = product::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        stock: Set(input.stock),
        category_id: Set(input.category_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created product {} '{}' (price {:.2}, stock {})",
        product.id, product.name, product.price, product.stock
    );
    Ok(product)
}

/// Updates every editable field of an existing product.
///
/// # Errors
/// Returns the same validation errors as [`create_product`], or [`Error::NotFound`]
/// if the product does not exist.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let input = validate_input(db, input).await?;
    let mut product: product::ActiveModel = get_product(db, product_id).await?.into();

    product.name = Set(input.name);
    product.description = Set(input.description);
    product.price = Set(input.price);
    product.stock = Set(input.stock);
    product.category_id = Set(input.category_id);

    let product = product.update(db).await?;
    info!("Updated product {}", product.id);
    Ok(product)
}

/// Deletes a product together with its sales.
///
/// # Errors
/// Returns [`Error::NotFound`] if the product does not exist.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Product", product_id))?;

    let sales = Sale::delete_many()
        .filter(sale::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    product.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted product {} and {} sales",
        product_id, sales.rows_affected
    );
    Ok(())
}

/// Atomically removes `quantity` units from a product's stock.
///
/// Check and decrement are a single conditional update
/// (`stock = stock - quantity WHERE id = ? AND stock >= quantity`), so concurrent
/// callers can never drive stock below zero. Run it inside the transaction that
/// records the sale.
///
/// # Errors
/// Returns [`Error::NotFound`] if the product does not exist and
/// [`Error::InsufficientStock`] if fewer than `quantity` units are left.
pub async fn decrement_stock_atomic<C>(db: &C, product_id: i64, quantity: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let updated = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).sub(quantity),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::Stock.gte(quantity))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        let product = Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Product", product_id))?;
        return Err(Error::InsufficientStock {
            available: product.stock,
            requested: quantity,
        });
    }
    Ok(())
}

/// Products that can currently be sold (stock above zero), ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Stock.gt(0))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Products below [`LOW_STOCK_THRESHOLD`], lowest stock first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn low_stock_products(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Stock.lt(LOW_STOCK_THRESHOLD))
        .order_by_asc(product::Column::Stock)
        .order_by_asc(product::Column::Name)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::category::create_category, test_utils::*};
    use sea_orm::PaginatorTrait;

    fn input(name: &str, price: f64, stock: i32) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price,
            stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        // Test empty name validation
        let result = create_product(&db, input("   ", 10.0, 1)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { field, .. } if field == "name"));

        // Test zero and negative price validation
        for price in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = create_product(&db, input("Turrón", price, 1)).await;
            assert!(
                matches!(result.unwrap_err(), Error::Validation { field, .. } if field == "price")
            );
        }

        // Test negative stock validation
        let result = create_product(&db, input("Turrón", 10.0, -1)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { field, .. } if field == "stock"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_with_missing_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(
            &db,
            ProductInput {
                category_id: Some(42),
                ..input("Turrón", 10.0, 5)
            },
        )
        .await;
        assert!(
            matches!(result.unwrap_err(), Error::Validation { field, .. } if field == "category_id")
        );
        assert_eq!(Product::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let turrones = create_category(&db, "Turrones").await?;

        let product = create_product(
            &db,
            ProductInput {
                name: " Turrón de Jijona ".to_string(),
                description: Some(String::new()),
                price: 10.0,
                stock: 5,
                category_id: Some(turrones.id),
            },
        )
        .await?;

        assert_eq!(product.name, "Turrón de Jijona");
        assert_eq!(product.description, None);
        assert_eq!(product.price, 10.0);
        assert_eq!(product.stock, 5);
        assert_eq!(product.category_id, Some(turrones.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_search_and_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let turrones = create_category(&db, "Turrones").await?;

        let jijona =
            create_test_product_in(&db, "Turrón de Jijona", 10.0, 5, Some(turrones.id)).await?;
        let chocolate = create_product(
            &db,
            ProductInput {
                description: Some("Negro, 70% cacao".to_string()),
                ..input("Tableta", 3.5, 40)
            },
        )
        .await?;

        let all = list_products(&db, &ProductFilter::default(), 1).await?;
        assert_eq!(all.total_items, 2);
        assert_eq!(all.items[0].product, chocolate);
        assert_eq!(all.items[0].category_name, None);
        assert_eq!(all.items[1].product, jijona);
        assert_eq!(all.items[1].category_name.as_deref(), Some("Turrones"));

        let by_description = list_products(
            &db,
            &ProductFilter {
                search: Some("cacao".to_string()),
                ..Default::default()
            },
            1,
        )
        .await?;
        assert_eq!(by_description.items.len(), 1);
        assert_eq!(by_description.items[0].product.id, chocolate.id);

        let by_category = list_products(
            &db,
            &ProductFilter {
                category_id: Some(turrones.id),
                ..Default::default()
            },
            1,
        )
        .await?;
        assert_eq!(by_category.items.len(), 1);
        assert_eq!(by_category.items[0].product.id, jijona.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Original Name", 10.0, 5).await?;

        let updated = update_product(&db, product.id, input("Updated Name", 15.0, 8)).await?;
        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.price, 15.0);
        assert_eq!(updated.stock, 8);

        // Verify the update persisted
        let retrieved = get_product(&db, product.id).await?;
        assert_eq!(retrieved, updated);

        let missing = update_product(&db, 999, input("X", 1.0, 0)).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::NotFound {
                entity: "Product",
                id: 999
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_product_info() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Turrón", 10.0, 5).await?;

        let info = product_info(&db, product.id).await?;
        assert_eq!(
            info,
            ProductInfo {
                price: 10.0,
                stock: 5,
                name: "Turrón".to_string(),
            }
        );

        assert!(matches!(
            product_info(&db, 999).await.unwrap_err(),
            Error::NotFound { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_stock_queries() -> Result<()> {
        let db = setup_test_db().await?;
        let empty = create_test_product(&db, "Agotado", 2.0, 0).await?;
        let low = create_test_product(&db, "Bajo", 2.0, 3).await?;
        let plenty = create_test_product(&db, "Cantidad", 2.0, 50).await?;
        let edge = create_test_product(&db, "Justo", 2.0, LOW_STOCK_THRESHOLD).await?;

        let available = available_products(&db).await?;
        assert_eq!(available, vec![low.clone(), plenty, edge]);

        let low_stock = low_stock_products(&db, 5).await?;
        assert_eq!(low_stock, vec![empty.clone(), low]);

        let limited = low_stock_products(&db, 1).await?;
        assert_eq!(limited, vec![empty]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_sales() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        record_test_sale(&fixture, 1).await?;

        delete_product(&fixture.db, fixture.product.id).await?;

        assert_eq!(Product::find().count(&fixture.db).await?, 0);
        assert_eq!(Sale::find().count(&fixture.db).await?, 0);

        let result = delete_product(&fixture.db, fixture.product.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }
}
