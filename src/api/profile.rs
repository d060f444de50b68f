//! Profile route handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::error_response;
use super::routes::AppState;
use super::types::*;
use crate::workflow::tasks as task_flow;
use crate::workflow::WorkflowError;

/// Public profile: display name, avatar, score, and a preview of
/// authored tasks.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let store = state.store.as_ref();
    let user = store
        .get_user(id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("user {} not found", id)))?;

    let settings = store
        .get_or_create_settings(user.id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?;
    let (created_count, preview) = task_flow::authored_preview(store, user.id)
        .await
        .map_err(error_response)?;

    Ok(Json(ProfileResponse {
        id: user.id,
        display_name: user.display_name,
        avatar: settings.avatar,
        score: settings.score,
        created_count,
        created_preview: preview.into_iter().map(TaskBrief::from).collect(),
    }))
}

/// Tasks the calling user has solved.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TaskBrief>>, (StatusCode, String)> {
    let completed = task_flow::tasks_completed_by(state.store.as_ref(), user.id)
        .await
        .map_err(error_response)?;
    Ok(Json(completed.into_iter().map(TaskBrief::from).collect()))
}

/// All tasks a user authored, deactivated ones included.
pub async fn created_tasks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TaskBrief>>, (StatusCode, String)> {
    let store = state.store.as_ref();
    if store
        .get_user(id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .is_none()
    {
        return Err((StatusCode::NOT_FOUND, format!("user {} not found", id)));
    }

    let authored = task_flow::tasks_authored_by(store, id)
        .await
        .map_err(error_response)?;
    Ok(Json(authored.into_iter().map(TaskBrief::from).collect()))
}

/// The calling user's settings.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SettingsResponse>, (StatusCode, String)> {
    let settings = state
        .store
        .get_or_create_settings(user.id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?;
    Ok(Json(SettingsResponse {
        avatar: settings.avatar,
        score: settings.score,
    }))
}

/// Update the calling user's avatar. The value is an opaque resource
/// reference; upload and storage happen elsewhere.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, (StatusCode, String)> {
    if req.avatar.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "avatar is required".to_string(),
        ));
    }

    let store = state.store.as_ref();
    store
        .set_avatar(user.id, &req.avatar)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?;

    let settings = store
        .get_or_create_settings(user.id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?;
    Ok(Json(SettingsResponse {
        avatar: settings.avatar,
        score: settings.score,
    }))
}
