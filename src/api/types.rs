//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::store::{Complaint, ComplaintState, Task};

/// Login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response containing a JWT for API authentication.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiration as unix seconds.
    pub exp: i64,
}

/// One-step registration request.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub display_name: String,
    pub password: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dev_mode: bool,
}

/// A task as shown in listings: no answer, plus the caller's done flag.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub points: i64,
    pub score_tier: i64,
    pub created: String,
    /// Whether the requesting user has solved this task.
    pub done: bool,
    pub done_count: i64,
}

impl TaskSummary {
    pub fn new(task: Task, done: bool, done_count: i64) -> Self {
        Self {
            id: task.id,
            title: task.title,
            image: task.image,
            points: task.points,
            score_tier: task.score_tier,
            created: task.created,
            done,
            done_count,
        }
    }
}

/// Minimal task reference for profile previews and history.
#[derive(Debug, Clone, Serialize)]
pub struct TaskBrief {
    pub id: i64,
    pub title: String,
    pub points: i64,
    pub active: bool,
}

impl From<Task> for TaskBrief {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            points: task.points,
            active: task.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskSummary>,
}

/// Full task detail for the task page.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub points: i64,
    pub score_tier: i64,
    pub created: String,
    pub done: bool,
    pub done_count: i64,
}

/// Request to create a task. Input is trusted beyond field presence;
/// rendering and richer validation live with the form layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub image: String,
    pub answer: String,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskResponse {
    pub id: i64,
}

/// Query for `GET /api/check_answer`.
#[derive(Debug, Deserialize)]
pub struct CheckAnswerQuery {
    pub id: i64,
    #[serde(default)]
    pub answer: String,
}

/// Answer-check payload. `message` is a small HTML snippet the task page
/// injects verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct CheckAnswerResponse {
    pub is_ok: bool,
    pub message: String,
}

/// Query for `GET /api/tasks_search`.
#[derive(Debug, Deserialize)]
pub struct TasksSearchQuery {
    #[serde(default)]
    pub title: String,
}

/// Rendered search results for the live-search widget.
#[derive(Debug, Clone, Serialize)]
pub struct TasksSearchResponse {
    pub html: String,
}

/// Request to file a complaint against a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComplaintRequest {
    pub description: String,
}

/// A complaint as shown in moderation views.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    pub id: i64,
    pub author_id: i64,
    pub task_id: i64,
    pub task_title: Option<String>,
    pub description: String,
    pub date: String,
    pub state: ComplaintState,
}

impl ComplaintView {
    pub fn new(complaint: Complaint, task_title: Option<String>) -> Self {
        Self {
            id: complaint.id,
            author_id: complaint.author_id,
            task_id: complaint.task_id,
            task_title,
            description: complaint.description,
            date: complaint.date,
            state: complaint.state,
        }
    }
}

/// Adjudication action for `POST /complaints/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjudicateAction {
    Accept,
    Dismiss,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjudicateRequest {
    pub action: AdjudicateAction,
}

/// Public profile view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub display_name: String,
    pub avatar: String,
    pub score: i64,
    /// Total tasks authored; `created_preview` holds the first few.
    pub created_count: usize,
    pub created_preview: Vec<TaskBrief>,
}

/// The calling user's settings.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub avatar: String,
    pub score: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub avatar: String,
}
