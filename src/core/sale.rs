//! Sale business logic - Records sales and lists sale history.
//!
//! A sale copies the product's current price, computes its total server-side and
//! decrements stock in the same database transaction that inserts the row. Sales are
//! append-only: there is no update or delete, so stock is never restored.

use crate::{
    core::{
        Page, delivery_location, fetch_page,
        product::{self as product_service, decrement_stock_atomic},
        round_to_cents, store,
    },
    entities::{
        Client, DeliveryLocation, Product, Sale, Store, client as client_entity,
        delivery_location as location_entity, product, sale, store as store_entity, user,
    },
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait, prelude::*,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// The fields a user submits to record a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSale {
    /// Buying client
    pub client_id: i64,
    /// Product sold
    pub product_id: i64,
    /// Units sold; at least 1
    pub quantity: i32,
    /// Store where the sale happens
    pub store_id: i64,
    /// Where the goods are delivered
    pub delivery_location_id: i64,
}

/// A sale joined with the display names of everything it references.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct SaleListing {
    /// Sale ID
    pub id: i64,
    /// When the sale was recorded
    pub timestamp: DateTimeUtc,
    /// Units sold
    pub quantity: i32,
    /// Price per unit at the time of sale
    pub unit_price: f64,
    /// Sale total
    pub total: f64,
    /// Buying client
    pub client_id: i64,
    /// Client's given name
    pub client_first_name: String,
    /// Client's family name
    pub client_last_name: String,
    /// Product sold
    pub product_id: i64,
    /// Product name
    pub product_name: String,
    /// Store name
    pub store_name: String,
    /// Delivery location name
    pub delivery_location_name: String,
    /// Name of the user who recorded the sale
    pub user_name: String,
}

/// Everything the sale form needs to offer as choices.
#[derive(Debug, Clone, Serialize)]
pub struct SaleFormOptions {
    /// All clients, by name
    pub clients: Vec<client_entity::Model>,
    /// Products with stock left
    pub products: Vec<product::Model>,
    /// All stores
    pub stores: Vec<store_entity::Model>,
    /// All delivery locations
    pub delivery_locations: Vec<location_entity::Model>,
}

/// `quantity * unit_price`, rounded to cents.
#[must_use]
pub fn compute_total(quantity: i32, unit_price: f64) -> f64 {
    round_to_cents(f64::from(quantity) * unit_price)
}

/// Records a sale attributed to `user_id`.
///
/// Inside one database transaction this verifies every referenced row, removes
/// `quantity` units from the product with a conditional update and inserts the sale
/// with the product's current price. Any failure rolls the whole thing back.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is below 1 ([`Error::Validation`])
/// - the client, product, store or delivery location does not exist ([`Error::NotFound`])
/// - the product has fewer than `quantity` units ([`Error::InsufficientStock`])
/// - a database operation fails
#[instrument(skip(db))]
pub async fn create_sale(
    db: &DatabaseConnection,
    new_sale: NewSale,
    user_id: i64,
) -> Result<sale::Model> {
    if new_sale.quantity < 1 {
        return Err(Error::validation("quantity", "Quantity must be at least 1"));
    }

    let txn = db.begin().await?;

    let product = Product::find_by_id(new_sale.product_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Product", new_sale.product_id))?;
    if Client::find_by_id(new_sale.client_id).one(&txn).await?.is_none() {
        return Err(Error::not_found("Client", new_sale.client_id));
    }
    if Store::find_by_id(new_sale.store_id).one(&txn).await?.is_none() {
        return Err(Error::not_found("Store", new_sale.store_id));
    }
    if DeliveryLocation::find_by_id(new_sale.delivery_location_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(Error::not_found(
            "Delivery location",
            new_sale.delivery_location_id,
        ));
    }

    if let Err(err) = decrement_stock_atomic(&txn, product.id, new_sale.quantity).await {
        warn!(
            "Rejected sale of {} x product {}: {}",
            new_sale.quantity, product.id, err
        );
        return Err(err);
    }

    let sale = sale::ActiveModel {
        timestamp: Set(chrono::Utc::now()),
        quantity: Set(new_sale.quantity),
        unit_price: Set(product.price),
        total: Set(compute_total(new_sale.quantity, product.price)),
        client_id: Set(new_sale.client_id),
        product_id: Set(product.id),
        store_id: Set(new_sale.store_id),
        delivery_location_id: Set(new_sale.delivery_location_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        "Recorded sale {}: {} x '{}' for {:.2}",
        sale.id, sale.quantity, product.name, sale.total
    );
    Ok(sale)
}

/// Retrieves a sale by ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no sale has this ID.
pub async fn get_sale(db: &DatabaseConnection, sale_id: i64) -> Result<sale::Model> {
    Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Sale", sale_id))
}

fn listing_query() -> Select<Sale> {
    Sale::find()
        .select_only()
        .column_as(sale::Column::Id, "id")
        .column_as(sale::Column::Timestamp, "timestamp")
        .column_as(sale::Column::Quantity, "quantity")
        .column_as(sale::Column::UnitPrice, "unit_price")
        .column_as(sale::Column::Total, "total")
        .column_as(sale::Column::ClientId, "client_id")
        .column_as(client_entity::Column::FirstName, "client_first_name")
        .column_as(client_entity::Column::LastName, "client_last_name")
        .column_as(sale::Column::ProductId, "product_id")
        .column_as(product::Column::Name, "product_name")
        .column_as(store_entity::Column::Name, "store_name")
        .column_as(location_entity::Column::Name, "delivery_location_name")
        .column_as(user::Column::Name, "user_name")
        .join(JoinType::InnerJoin, sale::Relation::Client.def())
        .join(JoinType::InnerJoin, sale::Relation::Product.def())
        .join(JoinType::InnerJoin, sale::Relation::Store.def())
        .join(JoinType::InnerJoin, sale::Relation::DeliveryLocation.def())
        .join(JoinType::InnerJoin, sale::Relation::User.def())
        .order_by_desc(sale::Column::Timestamp)
        .order_by_desc(sale::Column::Id)
}

/// Lists sales newest first, one page at a time.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_sales(db: &DatabaseConnection, page: u64) -> Result<Page<SaleListing>> {
    fetch_page(db, listing_query().into_model::<SaleListing>(), page).await
}

/// The `limit` most recent sales.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn recent_sales(db: &DatabaseConnection, limit: u64) -> Result<Vec<SaleListing>> {
    listing_query()
        .limit(limit)
        .into_model::<SaleListing>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Gathers the choices offered by the sale form.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn sale_form_options(db: &DatabaseConnection) -> Result<SaleFormOptions> {
    let clients = Client::find()
        .order_by_asc(client_entity::Column::FirstName)
        .order_by_asc(client_entity::Column::LastName)
        .all(db)
        .await?;
    Ok(SaleFormOptions {
        clients,
        products: product_service::available_products(db).await?,
        stores: store::list_stores(db).await?,
        delivery_locations: delivery_location::list_delivery_locations(db).await?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[test]
    fn test_compute_total() {
        assert_eq!(compute_total(3, 10.0), 30.0);
        assert_eq!(compute_total(3, 0.1), 0.3);
        assert_eq!(compute_total(7, 2.35), 16.45);
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_and_computes_total() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let db = &fixture.db;

        let sale = record_test_sale(&fixture, 3).await?;

        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.unit_price, 10.0);
        assert_eq!(sale.total, 30.0);
        assert_eq!(sale.user_id, fixture.user.id);

        let product = product_service::get_product(db, fixture.product.id).await?;
        assert_eq!(product.stock, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_turron_scenario() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let db = &fixture.db;

        // Stock 5, price 10.00: selling 3 leaves 2
        let first = record_test_sale(&fixture, 3).await?;
        assert_eq!(first.total, 30.0);

        // A second sale of 3 is rejected and changes nothing
        let second = record_test_sale(&fixture, 3).await;
        match second.unwrap_err() {
            err @ Error::InsufficientStock { .. } => {
                assert_eq!(err.to_string(), "Insufficient stock. Available stock: 2");
                assert!(matches!(
                    err,
                    Error::InsufficientStock {
                        available: 2,
                        requested: 3
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }

        let product = product_service::get_product(db, fixture.product.id).await?;
        assert_eq!(product.stock, 2);
        assert_eq!(Sale::find().count(db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_of_entire_stock() -> Result<()> {
        let fixture = setup_sale_fixture().await?;

        record_test_sale(&fixture, 5).await?;
        let product = product_service::get_product(&fixture.db, fixture.product.id).await?;
        assert_eq!(product.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_quantity_must_be_positive() -> Result<()> {
        let fixture = setup_sale_fixture().await?;

        for quantity in [0, -1] {
            let result = record_test_sale(&fixture, quantity).await;
            assert!(
                matches!(result.unwrap_err(), Error::Validation { field, .. } if field == "quantity")
            );
        }
        assert_eq!(Sale::find().count(&fixture.db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_with_missing_reference_changes_nothing() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let db = &fixture.db;
        let valid = fixture.new_sale(1);

        let cases = [
            (
                NewSale {
                    client_id: 999,
                    ..valid
                },
                "Client",
            ),
            (
                NewSale {
                    product_id: 999,
                    ..valid
                },
                "Product",
            ),
            (
                NewSale {
                    store_id: 999,
                    ..valid
                },
                "Store",
            ),
            (
                NewSale {
                    delivery_location_id: 999,
                    ..valid
                },
                "Delivery location",
            ),
        ];

        for (new_sale, expected) in cases {
            let result = create_sale(db, new_sale, fixture.user.id).await;
            assert!(
                matches!(result.unwrap_err(), Error::NotFound { entity, id: 999 } if entity == expected)
            );
        }

        let product = product_service::get_product(db, fixture.product.id).await?;
        assert_eq!(product.stock, 5);
        assert_eq!(Sale::find().count(db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_uses_price_at_time_of_sale() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let db = &fixture.db;

        let before = record_test_sale(&fixture, 1).await?;
        product_service::update_product(
            db,
            fixture.product.id,
            product_service::ProductInput {
                name: fixture.product.name.clone(),
                description: None,
                price: 12.5,
                stock: 4,
                category_id: None,
            },
        )
        .await?;
        let after = record_test_sale(&fixture, 2).await?;

        assert_eq!(get_sale(db, before.id).await?.unit_price, 10.0);
        assert_eq!(after.unit_price, 12.5);
        assert_eq!(after.total, 25.0);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_never_oversell() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let new_sale = fixture.new_sale(1);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let db = fixture.db.clone();
                let user_id = fixture.user.id;
                tokio::spawn(async move { create_sale(&db, new_sale, user_id).await })
            })
            .collect();

        let mut sold = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(Error::InsufficientStock { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(sold, 5);
        assert_eq!(rejected, 5);
        let product = product_service::get_product(&fixture.db, fixture.product.id).await?;
        assert_eq!(product.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_sales_newest_first_with_names() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        let db = &fixture.db;

        let older = record_test_sale(&fixture, 1).await?;
        let newer = record_test_sale(&fixture, 2).await?;

        let page = list_sales(db, 1).await?;
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items[0].id, newer.id);
        assert_eq!(page.items[1].id, older.id);

        let row = &page.items[0];
        assert_eq!(row.client_first_name, fixture.client.first_name);
        assert_eq!(row.client_last_name, fixture.client.last_name);
        assert_eq!(row.product_name, fixture.product.name);
        assert_eq!(row.store_name, fixture.store.name);
        assert_eq!(row.delivery_location_name, fixture.location.name);
        assert_eq!(row.user_name, fixture.user.name);
        assert_eq!(row.total, 20.0);

        let recent = recent_sales(db, 1).await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, newer.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_form_options_hide_sold_out_products() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        create_test_product(&fixture.db, "Agotado", 1.0, 0).await?;

        let options = sale_form_options(&fixture.db).await?;
        assert_eq!(options.clients, vec![fixture.client.clone()]);
        assert_eq!(options.products, vec![fixture.product.clone()]);
        assert_eq!(options.stores, vec![fixture.store.clone()]);
        assert_eq!(options.delivery_locations, vec![fixture.location.clone()]);

        Ok(())
    }
}
