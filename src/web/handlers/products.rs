//! Product routes, including the JSON price/stock lookup used by the sale form.

use crate::{
    core::{
        Page,
        product::{self, ProductFilter, ProductInfo, ProductInput, ProductListing},
    },
    entities::product::Model,
    errors::Result,
    web::{
        AppState,
        forms::{ListQuery, ProductForm},
        session::CurrentUser,
    },
};
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

/// Product routes, including the JSON lookup used by the sale form.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).post(update))
        .route("/products/{id}/delete", post(delete))
        .route("/api/products/{id}", get(info))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ProductListing>>> {
    let filter = ProductFilter {
        search: query.search().map(str::to_string),
        category_id: query.category_id()?,
    };
    let page = product::list_products(&state.db, &filter, query.page()?).await?;
    Ok(Json(page))
}

async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<ProductForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let product = product::create_product(&state.db, ProductInput::try_from(form)?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Model>> {
    Ok(Json(product::get_product(&state.db, id).await?))
}

async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Json<Model>> {
    let product = product::update_product(&state.db, id, ProductInput::try_from(form)?).await?;
    Ok(Json(product))
}

async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    product::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/products/{id}` returns `{price, stock, name}`, or 404 with an error body.
async fn info(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ProductInfo>> {
    Ok(Json(product::product_info(&state.db, id).await?))
}
