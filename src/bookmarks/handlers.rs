use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    bookmarks::{
        dto::{CreateBookmarkRequest, EditBookmarkRequest},
        repo::Bookmark,
    },
    error::{ApiError, AppJson},
    state::AppState,
};

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", post(create_bookmark).get(list_bookmarks))
        .route("/bookmarks/:id", get(get_bookmark))
        .route("/bookmarks/:id", put(update_bookmark))
        .route("/bookmarks/:id", delete(delete_bookmark))
}

#[instrument(skip(state, payload))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title should not be empty".into()));
    }
    if payload.link.trim().is_empty() {
        return Err(ApiError::Validation("link should not be empty".into()));
    }

    let bookmark = Bookmark::create(
        &state.db,
        user_id,
        &payload.title,
        payload.description.as_deref(),
        &payload.link,
    )
    .await?;

    info!(user_id = %user_id, bookmark_id = %bookmark.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[instrument(skip(state))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = Bookmark::list_by_owner(&state.db, user_id).await?;
    Ok(Json(bookmarks))
}

#[instrument(skip(state))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, ApiError> {
    let bookmark = Bookmark::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("resource not found".into()))?;

    if bookmark.user_id != user_id {
        warn!(user_id = %user_id, bookmark_id = %id, "read of foreign bookmark denied");
        return Err(ApiError::Forbidden("access to resource denied".into()));
    }

    Ok(Json(bookmark))
}

#[instrument(skip(state, payload))]
pub async fn update_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<EditBookmarkRequest>,
) -> Result<Json<Bookmark>, ApiError> {
    // Absent and foreign ids are indistinguishable here
    let owned = Bookmark::find_by_id(&state.db, id)
        .await?
        .filter(|b| b.user_id == user_id);
    if owned.is_none() {
        warn!(user_id = %user_id, bookmark_id = %id, "update of missing or foreign bookmark denied");
        return Err(ApiError::Forbidden("access to resource denied".into()));
    }

    let bookmark = Bookmark::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.link.as_deref(),
    )
    .await?;

    info!(user_id = %user_id, bookmark_id = %id, "bookmark updated");
    Ok(Json(bookmark))
}

#[instrument(skip(state))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, ApiError> {
    let owned = Bookmark::find_by_id(&state.db, id)
        .await?
        .filter(|b| b.user_id == user_id);
    if owned.is_none() {
        warn!(user_id = %user_id, bookmark_id = %id, "delete of missing or foreign bookmark denied");
        return Err(ApiError::Forbidden("access to resource denied".into()));
    }

    let bookmark = Bookmark::delete(&state.db, id).await?;

    info!(user_id = %user_id, bookmark_id = %id, "bookmark deleted");
    Ok(Json(bookmark))
}
