//! HTTP interface - axum router, shared state and server loop.
//!
//! Handlers are thin: they bind forms, call into [`crate::core`] and serialize the
//! result as JSON. Every route except health, registration and login requires a
//! session; anonymous requests are redirected to [`LOGIN_PATH`].

/// `IntoResponse` for the crate error type
pub mod error;
/// Form and query-string bindings
pub mod forms;
/// Route handlers grouped by resource
pub mod handlers;
/// Session cookie and the `CurrentUser` extractor
pub mod session;

use crate::{config::AppConfig, errors::Result};
use axum::{Router, response::Redirect, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Where anonymous users are sent.
pub const LOGIN_PATH: &str = "/login";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Pooled database connection
    pub db: DatabaseConnection,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/health", get(handlers::health))
        .merge(handlers::auth::routes())
        .merge(handlers::categories::routes())
        .merge(handlers::clients::routes())
        .merge(handlers::products::routes())
        .merge(handlers::stores::routes())
        .merge(handlers::delivery_locations::routes())
        .merge(handlers::sales::routes())
        .merge(handlers::reports::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_address` and serves until Ctrl-C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{category, product},
        test_utils::*,
    };
    use axum::{
        body::Body,
        http::{
            Request, StatusCode,
            header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        },
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn test_app() -> Result<(Router, DatabaseConnection)> {
        let db = setup_test_db().await?;
        let state = AppState {
            db: db.clone(),
            config: Arc::new(AppConfig::default()),
        };
        Ok((router(state), db))
    }

    fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registers and logs in a user, returning the `Cookie` header value.
    async fn login_cookie(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(form_request(
                "/register",
                "name=Marta&email=marta@example.com&password=secret-password",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(form_request(
                "/login",
                "email=marta@example.com&password=secret-password",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_is_public() -> Result<()> {
        let (app, _db) = test_app().await?;

        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_requests_redirect_to_login() -> Result<()> {
        let (app, _db) = test_app().await?;

        for uri in ["/dashboard", "/products", "/sales", "/api/products/1"] {
            let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_PATH);
        }

        let response = app
            .oneshot(get_request(
                "/dashboard",
                Some("stock_buddy_session=not-a-real-token"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() -> Result<()> {
        let (app, db) = test_app().await?;
        create_test_user(&db, "marta@example.com").await?;

        let response = app
            .oneshot(form_request(
                "/login",
                "email=marta@example.com&password=wrong-password",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_product_info_endpoint() -> Result<()> {
        let (app, db) = test_app().await?;
        let cookie = login_cookie(&app).await;
        let turron = create_test_product(&db, "Turrón", 10.0, 5).await?;

        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/api/products/{}", turron.id),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["price"], 10.0);
        assert_eq!(body["stock"], 5);
        assert_eq!(body["name"], "Turrón");

        let response = app
            .oneshot(get_request("/api/products/999", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(json_body(response).await["error"].is_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_category_over_http() -> Result<()> {
        let (app, db) = test_app().await?;
        let cookie = login_cookie(&app).await;

        let response = app
            .clone()
            .oneshot(form_request("/categories", "name=Dulces", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(form_request("/categories", "name=Dulces", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["field"], "name");

        assert_eq!(category::list_categories(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_product_form_names_field() -> Result<()> {
        let (app, _db) = test_app().await?;
        let cookie = login_cookie(&app).await;

        let response = app
            .oneshot(form_request(
                "/products",
                "name=Turr%C3%B3n&price=abc&stock=5",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["field"], "price");

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_flow_over_http() -> Result<()> {
        let (app, db) = test_app().await?;
        let cookie = login_cookie(&app).await;

        let fixture_client = crate::core::client::create_client(
            &db,
            crate::core::client::ClientInput {
                first_name: "Ana".to_string(),
                last_name: "Pérez".to_string(),
                ..Default::default()
            },
        )
        .await?;
        let turron = create_test_product(&db, "Turrón", 10.0, 5).await?;
        let store = crate::core::store::create_store(&db, "Tienda Principal", None).await?;
        let location =
            crate::core::delivery_location::create_delivery_location(&db, "Domicilio", "Casa")
                .await?;

        let body = format!(
            "client_id={}&product_id={}&quantity=3&store_id={}&delivery_location_id={}",
            fixture_client.id, turron.id, store.id, location.id
        );

        let response = app
            .clone()
            .oneshot(form_request("/sales", &body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["total"], 30.0);

        let response = app
            .clone()
            .oneshot(form_request("/sales", &body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error = json_body(response).await;
        assert_eq!(error["available"], 2);
        assert_eq!(error["error"], "Insufficient stock. Available stock: 2");

        assert_eq!(product::get_product(&db, turron.id).await?.stock, 2);

        let response = app
            .oneshot(get_request("/sales", Some(&cookie)))
            .await
            .unwrap();
        let listing = json_body(response).await;
        assert_eq!(listing["total_items"], 1);
        assert_eq!(listing["items"][0]["user_name"], "Marta");

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_clamped() -> Result<()> {
        let (app, db) = test_app().await?;
        let cookie = login_cookie(&app).await;
        create_test_product(&db, "Turrón", 10.0, 5).await?;

        let response = app
            .oneshot(get_request(
                "/products?page=18446744073709551615",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["page"], 1);
        assert_eq!(body["items"][0]["name"], "Turrón");

        Ok(())
    }

    #[tokio::test]
    async fn test_logout_ends_session() -> Result<()> {
        let (app, _db) = test_app().await?;
        let cookie = login_cookie(&app).await;

        let response = app
            .clone()
            .oneshot(form_request("/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/dashboard", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        Ok(())
    }
}
