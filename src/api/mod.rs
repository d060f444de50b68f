//! HTTP API for stegoboard.
//!
//! ## Endpoints
//!
//! - `POST /api/auth/register` - Create an account, returns a session token
//! - `POST /api/auth/login` - Log in, returns a session token
//! - `GET /api/health` - Health check
//! - `GET /tasks/list` - Active tasks with per-user done flag
//! - `POST /tasks/create` - Create a task
//! - `GET /tasks/{id}` - Task detail (404 when inactive)
//! - `GET /api/check_answer?id=&answer=` - Check an answer
//! - `GET /api/tasks_search?title=` - Live title search (HTML snippet)
//! - `GET /api/tasks/suggest` - A task the caller has not solved yet
//! - `POST /complaints/create/{task_id}` - File a complaint
//! - `GET /complaints/list` - Pending complaints (staff)
//! - `GET|POST /complaints/{id}` - View / adjudicate a complaint (staff)
//! - `GET /profile/{id}` - Public profile
//! - `GET /profile/history` - Tasks the caller solved
//! - `GET /profile/{id}/created_tasks` - Tasks a user authored
//! - `GET|POST /profile/settings` - The caller's settings

mod auth;
mod complaints;
mod profile;
mod routes;
mod tasks;
pub mod types;

pub use auth::AuthUser;
pub use routes::{serve, AppState};

use axum::http::StatusCode;

use crate::workflow::WorkflowError;

/// Map workflow failures to HTTP responses.
pub(crate) fn error_response(e: WorkflowError) -> (StatusCode, String) {
    match e {
        WorkflowError::NotFound(..) => (StatusCode::NOT_FOUND, e.to_string()),
        WorkflowError::InvalidStateTransition(..) => (StatusCode::CONFLICT, e.to_string()),
        WorkflowError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// The moderation surface is hidden from non-staff users: they get a plain
/// 404, not a 403, so its existence is not revealed.
pub(crate) fn require_staff(user: &AuthUser) -> Result<(), (StatusCode, String)> {
    if user.is_staff {
        Ok(())
    } else {
        Err((StatusCode::NOT_FOUND, "Not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn staff_gate_hides_moderation_behind_404() {
        let visitor = AuthUser {
            id: 7,
            is_staff: false,
        };
        let (status, body) = require_staff(&visitor).unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");

        let moderator = AuthUser {
            id: 8,
            is_staff: true,
        };
        assert!(require_staff(&moderator).is_ok());
    }

    #[test]
    fn workflow_errors_map_to_expected_statuses() {
        let (status, _) = error_response(WorkflowError::NotFound("task", 1));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(WorkflowError::InvalidStateTransition(1));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(WorkflowError::Store(StoreError::Database(
            "disk I/O error".to_string(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
