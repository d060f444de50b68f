//! Entity storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database (the production backend)
//!
//! All multi-record workflow writes (user + settings creation, complaint
//! acceptance with its cascade) happen atomically inside the backend, so two
//! racing adjudications serialize here rather than in application code.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Avatar assigned to every new user until they pick their own.
pub const DEFAULT_AVATAR: &str = "images/users/no_avatar.png";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),

    #[error("complaint {0} is not pending")]
    NotPending(i64),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    #[error("database error: {0}")]
    Database(String),
}

/// A registered user. The password hash never leaves the store except
/// through [`AuthRecord`] for login verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    /// Privileged-role flag; staff may adjudicate complaints.
    pub is_staff: bool,
}

/// User plus stored password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct AuthRecord {
    pub user: User,
    pub password_hash: String,
}

/// Input for user creation. The settings row is created in the same
/// transaction as the user itself.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_staff: bool,
}

/// Per-user settings, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: i64,
    /// Opaque resource reference to the avatar image.
    pub avatar: String,
    /// Accumulated points from solved tasks, never negative.
    pub score: i64,
}

/// A puzzle task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    /// Opaque resource reference to the puzzle image.
    pub image: String,
    /// Hidden answer, compared byte-for-byte. Never serialized.
    #[serde(skip_serializing)]
    pub answer: String,
    pub points: i64,
    /// Snapshot of the author's score at creation time.
    pub score_tier: i64,
    pub created: String,
    /// Monotonic: flips true to false on complaint acceptance, never back.
    pub active: bool,
}

/// Input for task creation, already validated by the caller.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub answer: String,
    pub points: i64,
    pub score_tier: i64,
}

/// Complaint lifecycle. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintState {
    Pending,
    Accepted,
    Dismissed,
}

/// A report filed against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub author_id: i64,
    pub task_id: i64,
    pub description: String,
    pub date: String,
    pub state: ComplaintState,
}

/// Input for filing a complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub author_id: i64,
    pub task_id: i64,
    pub description: String,
}

/// Get current timestamp as RFC3339 string.
pub fn now_string() -> String {
    Utc::now().to_rfc3339()
}

/// Entity store trait - implemented by all storage backends.
#[async_trait]
pub trait Store: Send + Sync {
    // === Users ===

    /// Create a user together with its settings row, atomically.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthRecord>, StoreError>;

    /// Fetch the settings row for a user, creating a default one if absent.
    async fn get_or_create_settings(&self, user_id: i64) -> Result<UserSettings, StoreError>;

    async fn set_avatar(&self, user_id: i64, avatar: &str) -> Result<(), StoreError>;

    /// Add points to a user's score (upsert on the settings row).
    async fn add_score(&self, user_id: i64, points: i64) -> Result<(), StoreError>;

    // === Tasks ===

    async fn insert_task(&self, new: NewTask) -> Result<Task, StoreError>;

    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// All active tasks, newest first.
    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Tasks created by a user, including deactivated ones, newest first.
    async fn tasks_authored_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Active tasks the user has solved, newest first.
    async fn tasks_completed_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Active tasks whose title contains the query, case-insensitive.
    async fn search_active_tasks(&self, title: &str) -> Result<Vec<Task>, StoreError>;

    async fn is_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError>;

    async fn done_count(&self, task_id: i64) -> Result<i64, StoreError>;

    /// Idempotent membership add to a task's done set.
    /// Returns `true` only when the user was not already a member.
    async fn mark_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError>;

    // === Complaints ===

    async fn insert_complaint(&self, new: NewComplaint) -> Result<Complaint, StoreError>;

    async fn get_complaint(&self, id: i64) -> Result<Option<Complaint>, StoreError>;

    /// All pending complaints, oldest first (moderation queue order).
    async fn list_pending_complaints(&self) -> Result<Vec<Complaint>, StoreError>;

    async fn complaints_against(
        &self,
        task_id: i64,
        state: ComplaintState,
    ) -> Result<Vec<Complaint>, StoreError>;

    /// Accept a pending complaint: state becomes `accepted`, the task is
    /// deactivated, and every other pending complaint against the same task
    /// is dismissed. All of it in one transaction.
    ///
    /// Fails with [`StoreError::NotPending`] when the complaint already
    /// reached a terminal state.
    async fn accept_complaint(&self, id: i64) -> Result<(), StoreError>;

    /// Dismiss a pending complaint. No cascade; the task stays active.
    async fn dismiss_complaint(&self, id: i64) -> Result<(), StoreError>;
}
