//! Route handlers, one module per resource.
//!
//! Each module exposes a `routes()` function that the top-level router merges.

pub mod auth;
pub mod categories;
pub mod clients;
pub mod delivery_locations;
pub mod products;
pub mod reports;
pub mod sales;
pub mod stores;

use axum::Json;
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "stock-buddy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
