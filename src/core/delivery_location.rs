//! Delivery location business logic.

use crate::{
    entities::{DeliveryLocation, Sale, delivery_location, sale},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

fn validate(name: &str, address: &str) -> Result<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::validation("address", "Address is required"));
    }
    Ok((name.to_string(), address.to_string()))
}

/// Lists all delivery locations ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_delivery_locations(
    db: &DatabaseConnection,
) -> Result<Vec<delivery_location::Model>> {
    DeliveryLocation::find()
        .order_by_asc(delivery_location::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a delivery location by ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no location has this ID.
pub async fn get_delivery_location(
    db: &DatabaseConnection,
    location_id: i64,
) -> Result<delivery_location::Model> {
    DeliveryLocation::find_by_id(location_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Delivery location", location_id))
}

/// Creates a delivery location. Both fields are required.
///
/// # Errors
/// Returns [`Error::Validation`] if either field is blank.
#[instrument(skip(db))]
pub async fn create_delivery_location(
    db: &DatabaseConnection,
    name: &str,
    address: &str,
) -> Result<delivery_location::Model> {
    let (name, address) = validate(name, address)?;

    let location = delivery_location::ActiveModel {
        name: Set(name),
        address: Set(address),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created delivery location {} '{}'", location.id, location.name);
    Ok(location)
}

/// Updates a delivery location.
///
/// # Errors
/// Returns [`Error::NotFound`] for a missing location and [`Error::Validation`] for blank fields.
#[instrument(skip(db))]
pub async fn update_delivery_location(
    db: &DatabaseConnection,
    location_id: i64,
    name: &str,
    address: &str,
) -> Result<delivery_location::Model> {
    let (name, address) = validate(name, address)?;
    let mut location: delivery_location::ActiveModel =
        get_delivery_location(db, location_id).await?.into();

    location.name = Set(name);
    location.address = Set(address);

    let location = location.update(db).await?;
    info!("Updated delivery location {}", location.id);
    Ok(location)
}

/// Deletes a delivery location and the sales delivered to it.
///
/// # Errors
/// Returns [`Error::NotFound`] if the location does not exist.
#[instrument(skip(db))]
pub async fn delete_delivery_location(db: &DatabaseConnection, location_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let location = DeliveryLocation::find_by_id(location_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Delivery location", location_id))?;

    let sales = Sale::delete_many()
        .filter(sale::Column::DeliveryLocationId.eq(location_id))
        .exec(&txn)
        .await?;
    location.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted delivery location {} and {} sales",
        location_id, sales.rows_affected
    );
    Ok(())
}
