//! Start-up seeding of the initial catalog.
//!
//! Each configured category, store and delivery location is created only if no row with
//! the same name exists, so running the seed on every start is safe.

use crate::{
    config::SeedConfig,
    core::{category, delivery_location, store},
    entities::{Category, DeliveryLocation, Store},
    errors::Result,
};
use sea_orm::prelude::*;
use tracing::{info, instrument};

/// How many rows of each kind a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories created
    pub categories: usize,
    /// Stores created
    pub stores: usize,
    /// Delivery locations created
    pub delivery_locations: usize,
}

/// Creates every configured row that does not exist yet.
///
/// # Errors
/// Returns an error if a configured row is invalid or a database operation fails.
#[instrument(skip_all)]
pub async fn seed_catalog(db: &DatabaseConnection, seed: &SeedConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for name in &seed.categories {
        let exists = Category::find()
            .filter(crate::entities::category::Column::Name.eq(name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            category::create_category(db, name).await?;
            summary.categories += 1;
        }
    }

    for entry in &seed.stores {
        let exists = Store::find()
            .filter(crate::entities::store::Column::Name.eq(entry.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            store::create_store(db, &entry.name, entry.location.clone()).await?;
            summary.stores += 1;
        }
    }

    for entry in &seed.delivery_locations {
        let exists = DeliveryLocation::find()
            .filter(crate::entities::delivery_location::Column::Name.eq(entry.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            delivery_location::create_delivery_location(db, &entry.name, &entry.address).await?;
            summary.delivery_locations += 1;
        }
    }

    info!(
        "Seeded {} categories, {} stores, {} delivery locations",
        summary.categories, summary.stores, summary.delivery_locations
    );
    Ok(summary)
}
