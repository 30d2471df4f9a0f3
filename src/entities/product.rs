//! Product entity - An item for sale with a unit price and a stock count.
//!
//! `stock` is decremented by every sale and must never go negative.
//! `category_id` is optional and is cleared when the category is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Turrón de Jijona")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Unit price; always positive
    pub price: f64,
    /// Units available for sale; never negative
    pub stock: i32,
    /// Optional category this product belongs to
    pub category_id: Option<i64>,
    /// When the product was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// One product appears in many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
