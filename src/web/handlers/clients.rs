//! Client routes.

use crate::{
    core::{Page, client},
    entities::client::Model,
    errors::Result,
    web::{
        AppState,
        forms::{ClientForm, ListQuery},
        session::CurrentUser,
    },
};
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

/// Client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/{id}", get(show).post(update))
        .route("/clients/{id}/delete", post(delete))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Model>>> {
    let page = client::list_clients(&state.db, query.search(), query.page()?).await?;
    Ok(Json(page))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<ClientForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let client = client::create_client(&state.db, form.into()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(client::get_client(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<ClientForm>,
) -> Result<Json<Model>> {
    Ok(Json(
        client::update_client(&state.db, id, form.into()).await?,
    ))
}

async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    client::delete_client(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
