//! Client business logic - Customers that sales are recorded against.
//!
//! Listing supports a free-text search over first name, last name and phone and is
//! paginated. Deleting a client removes the client's sales in the same transaction.

use crate::{
    core::{Page, fetch_page, non_blank},
    entities::{Client, Sale, client, sale},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Validated-on-write client fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInput {
    /// Given name (required)
    pub first_name: String,
    /// Family name (required)
    pub last_name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

impl ClientInput {
    fn normalized(self) -> Result<Self> {
        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(Error::validation("first_name", "First name is required"));
        }
        let last_name = self.last_name.trim().to_string();
        if last_name.is_empty() {
            return Err(Error::validation("last_name", "Last name is required"));
        }
        Ok(Self {
            first_name,
            last_name,
            phone: non_blank(self.phone),
            address: non_blank(self.address),
        })
    }
}

/// Lists clients ordered by first then last name.
///
/// `search` matches as a substring of first name, last name or phone.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_clients(
    db: &DatabaseConnection,
    search: Option<&str>,
    page: u64,
) -> Result<Page<client::Model>> {
    let mut query = Client::find()
        .order_by_asc(client::Column::FirstName)
        .order_by_asc(client::Column::LastName)
        .order_by_asc(client::Column::Id);

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(client::Column::FirstName.contains(term))
                .add(client::Column::LastName.contains(term))
                .add(client::Column::Phone.contains(term)),
        );
    }

    fetch_page(db, query, page).await
}

/// Retrieves a client by ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no client has this ID.
pub async fn get_client(db: &DatabaseConnection, client_id: i64) -> Result<client::Model> {
    Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Client", client_id))
}

/// Registers a new client.
///
/// # Errors
/// Returns [`Error::Validation`] if a required name is blank.
#[instrument(skip(db))]
pub async fn create_client(db: &DatabaseConnection, input: ClientInput) -> Result<client::Model> {
    let input = input.normalized()?;

    let client = client::ActiveModel {
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        phone: Set(input.phone),
        address: Set(input.address),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created client {} '{}'", client.id, client.full_name());
    Ok(client)
}

/// Replaces a client's details.
///
/// # Errors
/// Returns [`Error::NotFound`] for a missing client and [`Error::Validation`] for blank names.
#[instrument(skip(db))]
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    input: ClientInput,
) -> Result<client::Model> {
    let input = input.normalized()?;
    let mut client: client::ActiveModel = get_client(db, client_id).await?.into();

    client.first_name = Set(input.first_name);
    client.last_name = Set(input.last_name);
    client.phone = Set(input.phone);
    client.address = Set(input.address);

    let client = client.update(db).await?;
    info!("Updated client {}", client.id);
    Ok(client)
}

/// Deletes a client together with every sale recorded for it.
///
/// # Errors
/// Returns [`Error::NotFound`] if the client does not exist.
#[instrument(skip(db))]
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let client = Client::find_by_id(client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Client", client_id))?;

    let sales = Sale::delete_many()
        .filter(sale::Column::ClientId.eq(client_id))
        .exec(&txn)
        .await?;
    client.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted client {} and {} sales",
        client_id, sales.rows_affected
    );
    Ok(())
}
