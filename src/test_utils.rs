//! Shared test utilities for `StockBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth, client, delivery_location,
        product::{self, ProductInput},
        sale::{self, NewSale},
        store,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Password used by [`create_test_user`].
pub const TEST_PASSWORD: &str = "test-password";

/// Installs a tracing subscriber that writes through the test harness.
/// Safe to call from every test; only the first call takes effect.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user with [`TEST_PASSWORD`].
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    auth::register(
        db,
        auth::RegisterInput {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        },
    )
    .await
}

/// Creates a test product without a category.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    stock: i32,
) -> Result<entities::product::Model> {
    create_test_product_in(db, name, price, stock, None).await
}

/// Creates a test product, optionally filed under a category.
pub async fn create_test_product_in(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    stock: i32,
    category_id: Option<i64>,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductInput {
            name: name.to_string(),
            description: None,
            price,
            stock,
            category_id,
        },
    )
    .await
}

/// Everything a sale references, ready to use.
pub struct SaleFixture {
    /// The test database
    pub db: DatabaseConnection,
    /// Recording user
    pub user: entities::user::Model,
    /// Buying client
    pub client: entities::client::Model,
    /// "Turrón" with price 10.00 and stock 5
    pub product: entities::product::Model,
    /// Store
    pub store: entities::store::Model,
    /// Delivery location
    pub location: entities::delivery_location::Model,
}

impl SaleFixture {
    /// A sale of `quantity` units of the fixture product.
    pub const fn new_sale(&self, quantity: i32) -> NewSale {
        NewSale {
            client_id: self.client.id,
            product_id: self.product.id,
            quantity,
            store_id: self.store.id,
            delivery_location_id: self.location.id,
        }
    }
}

/// Creates a database with one user, client, store and delivery location, plus
/// the product "Turrón" priced 10.00 with 5 units in stock.
pub async fn setup_sale_fixture() -> Result<SaleFixture> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "seller@example.com").await?;
    let client = client::create_client(
        &db,
        client::ClientInput {
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            phone: None,
            address: None,
        },
    )
    .await?;
    let product = create_test_product(&db, "Turrón", 10.0, 5).await?;
    let store = store::create_store(&db, "Tienda Principal", None).await?;
    let location =
        delivery_location::create_delivery_location(&db, "Domicilio", "Entrega a domicilio")
            .await?;

    Ok(SaleFixture {
        db,
        user,
        client,
        product,
        store,
        location,
    })
}

/// Records a sale of `quantity` units of the fixture product.
pub async fn record_test_sale(
    fixture: &SaleFixture,
    quantity: i32,
) -> Result<entities::sale::Model> {
    sale::create_sale(&fixture.db, fixture.new_sale(quantity), fixture.user.id).await
}
