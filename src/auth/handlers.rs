use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, MessageResponse, TokenResponse, VerifyEmailQuery},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{ApiError, AppJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify-email", get(verify_email))
        .route("/auth/login", post(login))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// 6-digit numeric verification token.
fn new_verification_token() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("email must be an email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::Validation("password should not be empty".into()));
    }

    let hash = hash_password(&payload.password)?;
    let token = new_verification_token();

    let user = match User::create(&state.db, &payload.email, &hash, &token).await {
        Ok(u) => u,
        Err(e) => {
            if let Some(sqlx::Error::Database(db_err)) = e.downcast_ref::<sqlx::Error>() {
                if db_err.is_unique_violation() {
                    warn!(email = %payload.email, "email already registered");
                    return Err(ApiError::Conflict("credentials taken".into()));
                }
            }
            return Err(e.into());
        }
    };

    // The confirmation email must not hold up or fail the signup
    let mailer = state.mailer.clone();
    let email = user.email.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&email, &token).await {
            warn!(error = %e, %email, "verification email failed");
        }
    });

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully!".into(),
        }),
    ))
}

#[instrument(skip(state, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = match query.token.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!("verification attempt without token");
            return Err(ApiError::Forbidden("invalid token".into()));
        }
    };

    let verified = User::consume_verification_token(&state.db, token).await?;
    if !verified {
        warn!("verification attempt with unknown or used token");
        return Err(ApiError::Forbidden("invalid token".into()));
    }

    info!("email verified");
    Ok(Json(MessageResponse {
        message: "Email is verified!".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("email must be an email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::Validation("password should not be empty".into()));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Forbidden("credentials incorrect".into())
        })?;

    if !user.is_email_verified {
        warn!(email = %payload.email, user_id = %user.id, "login before verification");
        return Err(ApiError::Forbidden("need to verify email".into()));
    }

    let ok = verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Forbidden("credentials incorrect".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}
