//! Sale routes.

use crate::{
    core::{
        Page,
        sale::{self, NewSale, SaleFormOptions, SaleListing},
    },
    entities::sale::Model,
    errors::Result,
    web::{
        AppState,
        forms::{ListQuery, SaleForm},
        session::CurrentUser,
    },
};
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

/// Sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list).post(create))
        .route("/sales/options", get(options))
}

async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<SaleListing>>> {
    Ok(Json(sale::list_sales(&state.db, query.page()?).await?))
}

/// Records a sale for the logged-in user.
async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<SaleForm>,
) -> Result<(StatusCode, Json<Model>)> {
    let new_sale = NewSale::try_from(form)?;
    let sale = sale::create_sale(&state.db, new_sale, current.user.id).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn options(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<SaleFormOptions>> {
    Ok(Json(sale::sale_form_options(&state.db).await?))
}
