//! Store business logic.

use crate::{
    core::non_blank,
    entities::{Sale, Store, sale, store},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Lists all stores ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_stores(db: &DatabaseConnection) -> Result<Vec<store::Model>> {
    Store::find()
        .order_by_asc(store::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a store by ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no store has this ID.
pub async fn get_store(db: &DatabaseConnection, store_id: i64) -> Result<store::Model> {
    Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Store", store_id))
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Store name is required"));
    }
    Ok(name.to_string())
}

/// Creates a store.
///
/// # Errors
/// Returns [`Error::Validation`] if the name is blank.
#[instrument(skip(db))]
pub async fn create_store(
    db: &DatabaseConnection,
    name: &str,
    location: Option<String>,
) -> Result<store::Model> {
    let name = validate_name(name)?;

    let store = store::ActiveModel {
        name: Set(name),
        location: Set(non_blank(location)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created store {} '{}'", store.id, store.name);
    Ok(store)
}

/// Updates a store's name and location.
///
/// # Errors
/// Returns [`Error::NotFound`] for a missing store and [`Error::Validation`] for a blank name.
#[instrument(skip(db))]
pub async fn update_store(
    db: &DatabaseConnection,
    store_id: i64,
    name: &str,
    location: Option<String>,
) -> Result<store::Model> {
    let name = validate_name(name)?;
    let mut store: store::ActiveModel = get_store(db, store_id).await?.into();

    store.name = Set(name);
    store.location = Set(non_blank(location));

    let store = store.update(db).await?;
    info!("Updated store {}", store.id);
    Ok(store)
}

/// Deletes a store and the sales recorded at it.
///
/// # Errors
/// Returns [`Error::NotFound`] if the store does not exist.
#[instrument(skip(db))]
pub async fn delete_store(db: &DatabaseConnection, store_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let store = Store::find_by_id(store_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Store", store_id))?;

    let sales = Sale::delete_many()
        .filter(sale::Column::StoreId.eq(store_id))
        .exec(&txn)
        .await?;
    store.delete(&txn).await?;
    txn.commit().await?;

    info!("Deleted store {} and {} sales", store_id, sales.rows_affected);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_store_crud() -> Result<()> {
        let db = setup_test_db().await?;

        let norte = create_store(&db, "Sucursal Norte", Some("Zona Norte".to_string())).await?;
        let centro = create_store(&db, "  Centro ", Some(String::new())).await?;
        assert_eq!(centro.name, "Centro");
        assert_eq!(centro.location, None);

        let listed = list_stores(&db).await?;
        assert_eq!(listed, vec![centro.clone(), norte.clone()]);

        let renamed = update_store(&db, norte.id, "Sucursal Sur", None).await?;
        assert_eq!(renamed.name, "Sucursal Sur");
        assert_eq!(renamed.location, None);

        let result = create_store(&db, "", None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        delete_store(&db, centro.id).await?;
        assert!(matches!(
            get_store(&db, centro.id).await.unwrap_err(),
            Error::NotFound { entity: "Store", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_store_removes_sales() -> Result<()> {
        let fixture = setup_sale_fixture().await?;
        record_test_sale(&fixture, 2).await?;

        delete_store(&fixture.db, fixture.store.id).await?;
        assert_eq!(Sale::find().count(&fixture.db).await?, 0);

        Ok(())
    }
}
