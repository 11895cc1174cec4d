use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    error::{ApiError, AppJson},
    state::AppState,
    users::dto::{EditUserRequest, UserResponse},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_user))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token subject no longer exists");
        ApiError::Unauthorized("user not found".into())
    })?;

    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn edit_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<EditUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::update_profile(
        &state.db,
        user_id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UserResponse::from(user)))
}
