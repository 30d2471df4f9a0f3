//! Store routes.

use crate::{
    core::{non_blank, store},
    entities::store::Model,
    errors::Result,
    web::{AppState, forms::StoreForm, session::CurrentUser},
};
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

/// Store routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list).post(create))
        .route("/stores/{id}", get(show).post(update))
        .route("/stores/{id}/delete", post(delete))
}

async fn list(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<Vec<Model>>> {
    Ok(Json(store::list_stores(&state.db).await?))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<StoreForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let store = store::create_store(&state.db, &form.name, non_blank(Some(form.location))).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(store::get_store(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<StoreForm>,
) -> Result<Json<Model>> {
    let store =
        store::update_store(&state.db, id, &form.name, non_blank(Some(form.location))).await?;
    Ok(Json(store))
}

async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    store::delete_store(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
