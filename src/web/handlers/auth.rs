//! Registration, login, logout and the profile page.

use crate::{
    core::auth::{self, Profile, ProfileInput},
    entities::user,
    errors::Result,
    web::{
        AppState,
        forms::{LoginForm, ProfileForm, RegisterForm},
        session::{CurrentUser, clear_session_cookie, session_cookie},
    },
};
use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The logged-in account
    pub user: user::Model,
    /// Session token, also set as a cookie
    pub token: String,
    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

/// Registration, login, logout and profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(show_profile).post(update_profile))
}

/// `POST /register`
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<user::Model>)> {
    let user = auth::register(&state.db, form.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse> {
    let ttl_hours = state.config.server.session_ttl_hours;
    let (user, session) = auth::login(&state.db, &form.email, &form.password, ttl_hours).await?;

    let cookie = session_cookie(&session.token, ttl_hours);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            user,
            token: session.token,
            expires_at: session.expires_at,
        }),
    ))
}

/// `POST /logout`
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<impl IntoResponse> {
    auth::logout(&state.db, &current.token).await?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, clear_session_cookie())]))
}

/// `GET /profile`
pub async fn show_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Profile>> {
    Ok(Json(auth::get_profile(&state.db, current.user.id).await?))
}

/// `POST /profile`
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<ProfileForm>,
) -> Result<Json<Profile>> {
    let input = ProfileInput::try_from(form)?;
    Ok(Json(
        auth::update_profile(&state.db, current.user.id, input).await?,
    ))
}
