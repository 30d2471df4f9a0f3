//! Delivery location entity - Where the goods of a sale are handed over.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery location database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_locations")]
pub struct Model {
    /// Unique identifier for the delivery location
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short name (e.g., "Domicilio")
    pub name: String,
    /// Address or pickup instructions
    pub address: String,
    /// When the location was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `DeliveryLocation` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One delivery location has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
