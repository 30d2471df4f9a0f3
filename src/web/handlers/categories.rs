//! Category routes.

use crate::{
    core::category::{self, CategoryWithCount},
    entities::category::Model,
    errors::Result,
    web::{AppState, forms::CategoryForm, session::CurrentUser},
};
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

/// Category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{id}", get(show).post(update))
        .route("/categories/{id}/delete", post(delete))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<CategoryWithCount>>> {
    Ok(Json(category::list_categories(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<CategoryForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let category = category::create_category(&state.db, &form.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(category::get_category(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Result<Json<Model>> {
    Ok(Json(
        category::update_category(&state.db, id, &form.name).await?,
    ))
}

async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    category::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
