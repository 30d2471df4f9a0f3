//! Sale entity - One recorded sale of a product.
//!
//! `unit_price` is copied from the product at the time of sale and
//! `total` is always `quantity * unit_price`. Sales are append-only.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the sale was recorded
    pub timestamp: DateTimeUtc,
    /// Units sold; at least 1
    pub quantity: i32,
    /// Product price at the time of sale
    pub unit_price: f64,
    /// `quantity * unit_price`, rounded to cents
    pub total: f64,
    /// Buying client
    pub client_id: i64,
    /// Product sold
    pub product_id: i64,
    /// Store where the sale happened
    pub store_id: i64,
    /// Where the goods are delivered
    pub delivery_location_id: i64,
    /// Account that recorded the sale
    pub user_id: i64,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Cascade"
    )]
    Client,
    /// Each sale belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each sale belongs to one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id",
        on_delete = "Cascade"
    )]
    Store,
    /// Each sale belongs to one delivery location
    #[sea_orm(
        belongs_to = "super::delivery_location::Entity",
        from = "Column::DeliveryLocationId",
        to = "super::delivery_location::Column::Id",
        on_delete = "Cascade"
    )]
    DeliveryLocation,
    /// Each sale was recorded by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::delivery_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryLocation.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
