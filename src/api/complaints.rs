//! Complaint route handlers.
//!
//! The pending list and adjudication endpoints are staff-only; everyone else
//! sees 404 (see [`require_staff`](super::require_staff)).

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::routes::AppState;
use super::types::*;
use super::{error_response, require_staff};
use crate::workflow::complaints as complaint_flow;
use crate::workflow::WorkflowError;

/// File a complaint against a task.
pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<CreateComplaintRequest>,
) -> Result<Json<ComplaintView>, (StatusCode, String)> {
    if req.description.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "description is required".to_string(),
        ));
    }

    let complaint =
        complaint_flow::file_complaint(state.store.as_ref(), user.id, task_id, req.description)
            .await
            .map_err(error_response)?;

    Ok(Json(ComplaintView::new(complaint, None)))
}

/// The moderation queue: all pending complaints.
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ComplaintView>>, (StatusCode, String)> {
    require_staff(&user)?;

    let store = state.store.as_ref();
    let complaints = complaint_flow::list_pending(store)
        .await
        .map_err(error_response)?;

    let mut views = Vec::with_capacity(complaints.len());
    for complaint in complaints {
        let title = store
            .get_task(complaint.task_id)
            .await
            .map_err(|e| error_response(WorkflowError::from(e)))?
            .map(|t| t.title);
        views.push(ComplaintView::new(complaint, title));
    }

    Ok(Json(views))
}

/// A single complaint, for the adjudication view.
pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ComplaintView>, (StatusCode, String)> {
    require_staff(&user)?;

    let store = state.store.as_ref();
    let complaint = store
        .get_complaint(id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("complaint {} not found", id)))?;

    let title = store
        .get_task(complaint.task_id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .map(|t| t.title);

    Ok(Json(ComplaintView::new(complaint, title)))
}

/// Adjudicate a pending complaint. Accepting deactivates the task and
/// dismisses its sibling pending complaints; dismissal touches nothing else.
/// Acting on an already-adjudicated complaint yields 409.
pub async fn adjudicate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<AdjudicateRequest>,
) -> Result<Json<ComplaintView>, (StatusCode, String)> {
    require_staff(&user)?;

    let store = state.store.as_ref();
    match req.action {
        AdjudicateAction::Accept => complaint_flow::accept(store, id).await,
        AdjudicateAction::Dismiss => complaint_flow::dismiss(store, id).await,
    }
    .map_err(error_response)?;

    let complaint = store
        .get_complaint(id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("complaint {} not found", id)))?;
    let title = store
        .get_task(complaint.task_id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .map(|t| t.title);

    Ok(Json(ComplaintView::new(complaint, title)))
}
