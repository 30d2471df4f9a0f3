//! Category business logic - Named groupings for products.
//!
//! Category names are unique after trimming. Deleting a category keeps its products and
//! clears their `category_id` in the same database transaction.

use crate::{
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

const MAX_NAME_LEN: usize = 100;

/// A category together with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithCount {
    /// The category row
    #[serde(flatten)]
    pub category: category::Model,
    /// Number of products with this category
    pub product_count: i64,
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Category name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("Category name cannot exceed {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Checks that no other category already uses `name`.
async fn ensure_name_available(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<()> {
    let mut query = Category::find().filter(category::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(category::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        warn!("Rejected duplicate category name '{}'", name);
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Maps a unique-constraint violation on insert/update to [`Error::DuplicateCategory`].
///
/// Covers the window between the existence check and the write.
fn map_unique_violation(err: DbErr, name: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateCategory {
            name: name.to_string(),
        },
        _ => err.into(),
    }
}

/// Lists all categories ordered by name, each with its product count.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryWithCount>> {
    let categories = Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;

    let counts: HashMap<i64, i64> = Product::find()
        .select_only()
        .column(product::Column::CategoryId)
        .column_as(Expr::col(product::Column::Id).count(), "product_count")
        .filter(product::Column::CategoryId.is_not_null())
        .group_by(product::Column::CategoryId)
        .into_tuple::<(Option<i64>, i64)>()
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(category_id, count)| category_id.map(|id| (id, count)))
        .collect();

    Ok(categories
        .into_iter()
        .map(|category| CategoryWithCount {
            product_count: counts.get(&category.id).copied().unwrap_or(0),
            category,
        })
        .collect())
}

/// Retrieves a category by ID.
///
/// # Errors
/// Returns [`Error::NotFound`] if no category has this ID.
pub async fn get_category(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))
}

/// Creates a category with a unique, non-empty name.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty or over-long name and
/// [`Error::DuplicateCategory`] if the name is taken.
#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let name = validate_name(name)?;
    ensure_name_available(db, &name, None).await?;

    let category = category::ActiveModel {
        name: Set(name.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_unique_violation(e, &name))?;

    info!("Created category {} '{}'", category.id, category.name);
    Ok(category)
}

/// Renames a category, keeping names unique.
///
/// # Errors
/// Returns [`Error::NotFound`] for a missing category, [`Error::Validation`] for a bad
/// name and [`Error::DuplicateCategory`] if another category already has the name.
#[instrument(skip(db))]
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
) -> Result<category::Model> {
    let name = validate_name(name)?;
    let mut category: category::ActiveModel = get_category(db, category_id).await?.into();
    ensure_name_available(db, &name, Some(category_id)).await?;

    category.name = Set(name.clone());
    let category = category
        .update(db)
        .await
        .map_err(|e| map_unique_violation(e, &name))?;

    info!("Renamed category {} to '{}'", category.id, category.name);
    Ok(category)
}

/// Deletes a category and detaches its products.
///
/// # Errors
/// Returns [`Error::NotFound`] if the category does not exist.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let category = Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))?;

    let detached = Product::update_many()
        .col_expr(product::Column::CategoryId, Expr::value(Option::<i64>::None))
        .filter(product::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;

    category.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted category {} and detached {} products",
        category_id, detached.rows_affected
    );
    Ok(())
}
