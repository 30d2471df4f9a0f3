//! Account business logic - Registration, login sessions and user profiles.
//!
//! Passwords are stored as Argon2 PHC strings with a random salt. A login issues an
//! opaque random token that maps to a user until its expiry; expired tokens are
//! deleted the first time they are presented.

use crate::{
    core::non_blank,
    entities::{Session, User, UserProfile, session, user, user_profile},
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{Set, SqlErr, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Fields submitted on the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    /// Display name
    pub name: String,
    /// Login email; stored lower-cased
    pub email: String,
    /// Plaintext password; only its hash is stored
    pub password: String,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInput {
    /// Contact phone
    pub phone: Option<String>,
    /// Date of birth
    pub birth_date: Option<NaiveDate>,
    /// Path of the profile picture
    pub photo_path: Option<String>,
}

/// A user together with their profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// The account (password hash is never serialized)
    pub user: user::Model,
    /// Profile details
    pub profile: user_profile::Model,
}

/// Hashes a password with Argon2 and a random salt.
///
/// # Errors
/// Returns [`Error::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !email.contains(char::is_whitespace);
    if !valid {
        return Err(Error::validation("email", "Enter a valid email address"));
    }
    Ok(email)
}

/// Creates an account and its empty profile in one transaction.
///
/// # Errors
/// Returns [`Error::Validation`] for a blank name, malformed email or short password,
/// and [`Error::EmailTaken`] if the email is already registered.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn register(db: &DatabaseConnection, input: RegisterInput) -> Result<user::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    let email = normalize_email(&input.email)?;
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        warn!("Registration rejected: email already registered");
        return Err(Error::EmailTaken { email });
    }

    let password_hash = hash_password(&input.password)?;
    let now = Utc::now();

    let txn = db.begin().await?;
    let user = user::ActiveModel {
        name: Set(name),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailTaken {
            email: email.clone(),
        },
        _ => e.into(),
    })?;

    user_profile::ActiveModel {
        user_id: Set(user.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!("Registered user {} <{}>", user.id, user.email);
    Ok(user)
}

/// Verifies an email/password pair.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown email or a wrong password alike.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let email = email.trim().to_lowercase();
    let user = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => {
            warn!("Failed login attempt");
            Err(Error::InvalidCredentials)
        }
    }
}

/// Verifies credentials and opens a session valid for `ttl_hours`.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] if the credentials do not match.
#[instrument(skip(db, password))]
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    ttl_hours: i64,
) -> Result<(user::Model, session::Model)> {
    let user = authenticate(db, email, password).await?;

    let now = Utc::now();
    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| Error::Config {
            message: format!("Session lifetime of {ttl_hours} hours is out of range"),
        })?;
    let session = session::ActiveModel {
        token: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user.id),
        created_at: Set(now),
        expires_at: Set(expires_at),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("User {} logged in", user.id);
    Ok((user, session))
}

/// Resolves a session token to its user.
///
/// # Errors
/// Returns [`Error::Unauthorized`] if the token is unknown or expired. Expired
/// sessions are deleted.
pub async fn authenticate_token(db: &DatabaseConnection, token: &str) -> Result<user::Model> {
    let Some(session) = Session::find()
        .filter(session::Column::Token.eq(token))
        .one(db)
        .await?
    else {
        debug!("Unknown session token");
        return Err(Error::Unauthorized);
    };

    if session.expires_at <= Utc::now() {
        debug!("Session {} expired, deleting it", session.id);
        session.delete(db).await?;
        return Err(Error::Unauthorized);
    }

    User::find_by_id(session.user_id)
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)
}

/// Ends the session identified by `token`. Unknown tokens are ignored.
///
/// # Errors
/// Returns an error if the database delete fails.
pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<()> {
    let result = Session::delete_many()
        .filter(session::Column::Token.eq(token))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        info!("Session closed");
    }
    Ok(())
}

/// Deletes every expired session and returns how many were removed.
///
/// # Errors
/// Returns an error if the database delete fails.
pub async fn purge_expired_sessions(db: &DatabaseConnection) -> Result<u64> {
    let result = Session::delete_many()
        .filter(session::Column::ExpiresAt.lte(Utc::now()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Loads a user's profile, creating an empty one if it is missing.
///
/// # Errors
/// Returns [`Error::NotFound`] if the user does not exist.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<Profile> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;

    let profile = match UserProfile::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
    {
        Some(profile) => profile,
        None => {
            user_profile::ActiveModel {
                user_id: Set(user_id),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    Ok(Profile { user, profile })
}

/// Replaces the editable profile fields.
///
/// # Errors
/// Returns [`Error::NotFound`] if the user does not exist.
#[instrument(skip(db))]
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    input: ProfileInput,
) -> Result<Profile> {
    let Profile { user, profile } = get_profile(db, user_id).await?;

    let mut profile: user_profile::ActiveModel = profile.into();
    profile.phone = Set(non_blank(input.phone));
    profile.birth_date = Set(input.birth_date);
    profile.photo_path = Set(non_blank(input.photo_path));
    let profile = profile.update(db).await?;

    info!("Updated profile of user {}", user_id);
    Ok(Profile { user, profile })
}
