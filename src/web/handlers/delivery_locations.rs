//! Delivery location routes.

use crate::{
    core::delivery_location,
    entities::delivery_location::Model,
    errors::Result,
    web::{AppState, forms::DeliveryLocationForm, session::CurrentUser},
};
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

/// Delivery location routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/delivery-locations", get(list).post(create))
        .route("/delivery-locations/{id}", get(show).post(update))
        .route("/delivery-locations/{id}/delete", post(delete))
}

async fn list(State(state): State<AppState>, _user: CurrentUser) -> Result<Json<Vec<Model>>> {
    Ok(Json(
        delivery_location::list_delivery_locations(&state.db).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<DeliveryLocationForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let location =
        delivery_location::create_delivery_location(&state.db, &form.name, &form.address).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(
        delivery_location::get_delivery_location(&state.db, id).await?,
    ))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<DeliveryLocationForm>,
) -> Result<Json<Model>> {
    let location =
        delivery_location::update_delivery_location(&state.db, id, &form.name, &form.address)
            .await?;
    Ok(Json(location))
}

async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    delivery_location::delete_delivery_location(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
