//! Task route handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::routes::AppState;
use super::types::*;
use super::{error_response, require_staff};
use crate::workflow::tasks as task_flow;
use crate::workflow::WorkflowError;

/// List active tasks with the caller's done flag.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TaskListResponse>, (StatusCode, String)> {
    let store = state.store.as_ref();
    let tasks = task_flow::list_active_tasks(store)
        .await
        .map_err(error_response)?;

    let mut summaries = Vec::with_capacity(tasks.len());
    for task in tasks {
        let done = task_flow::is_done(store, task.id, user.id)
            .await
            .map_err(error_response)?;
        let done_count = task_flow::done_count(store, task.id)
            .await
            .map_err(error_response)?;
        summaries.push(TaskSummary::new(task, done, done_count));
    }

    Ok(Json(TaskListResponse { tasks: summaries }))
}

/// Create a new task authored by the caller.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<CreateTaskResponse>, (StatusCode, String)> {
    if req.title.trim().is_empty() || req.answer.is_empty() || req.image.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "title, image and answer are required".to_string(),
        ));
    }
    if req.points < 0 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "points must not be negative".to_string(),
        ));
    }

    let task = task_flow::create_task(
        state.store.as_ref(),
        user.id,
        task_flow::TaskDraft {
            title: req.title,
            description: req.description,
            image: req.image,
            answer: req.answer,
            points: req.points,
        },
    )
    .await
    .map_err(error_response)?;

    Ok(Json(CreateTaskResponse { id: task.id }))
}

/// Task detail page data. Inactive tasks are indistinguishable from
/// missing ones.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDetail>, (StatusCode, String)> {
    let store = state.store.as_ref();
    let task = store
        .get_task(id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .filter(|t| t.active)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("task {} not found", id)))?;

    let author_name = store
        .get_user(task.author_id)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?
        .map(|u| u.display_name)
        .unwrap_or_default();
    let done = task_flow::is_done(store, task.id, user.id)
        .await
        .map_err(error_response)?;
    let done_count = task_flow::done_count(store, task.id)
        .await
        .map_err(error_response)?;

    Ok(Json(TaskDetail {
        id: task.id,
        author_id: task.author_id,
        author_name,
        title: task.title,
        description: task.description,
        image: task.image,
        points: task.points,
        score_tier: task.score_tier,
        created: task.created,
        done,
        done_count,
    }))
}

/// Check a submitted answer. A wrong answer is a normal negative result,
/// not an error.
pub async fn check_answer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<CheckAnswerQuery>,
) -> Result<Json<CheckAnswerResponse>, (StatusCode, String)> {
    let outcome = task_flow::submit_answer(state.store.as_ref(), query.id, &query.answer, user.id)
        .await
        .map_err(error_response)?;

    let message = if outcome.correct {
        r#"<p class="text-success fs-4">Correct answer</p>"#
    } else {
        r#"<p class="text-danger fs-4">Wrong answer</p>"#
    };

    Ok(Json(CheckAnswerResponse {
        is_ok: outcome.correct,
        message: message.to_string(),
    }))
}

/// Live title search for the task list page; returns a rendered snippet
/// the page swaps into its list.
pub async fn tasks_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TasksSearchQuery>,
) -> Result<Json<TasksSearchResponse>, (StatusCode, String)> {
    let tasks = state
        .store
        .search_active_tasks(&query.title)
        .await
        .map_err(|e| error_response(WorkflowError::from(e)))?;

    let html = if tasks.is_empty() {
        "<p>Nothing found</p>".to_string()
    } else {
        tasks
            .iter()
            .map(|t| {
                format!(
                    r#"<a class="list-group-item list-group-item-action" href="/tasks/{}">{}</a>"#,
                    t.id,
                    escape_html(&t.title)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(Json(TasksSearchResponse { html }))
}

/// Suggest a task the caller has not solved yet, if any remain.
pub async fn suggest_next(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<TaskBrief>>, (StatusCode, String)> {
    let next = task_flow::suggest_next_task(state.store.as_ref(), user.id)
        .await
        .map_err(error_response)?;
    Ok(Json(next.map(TaskBrief::from)))
}

/// Complaints filed against a task, for the moderation task view.
pub async fn task_complaints(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ComplaintView>>, (StatusCode, String)> {
    require_staff(&user)?;
    let complaints = crate::workflow::complaints::complaints_against(
        state.store.as_ref(),
        id,
        crate::store::ComplaintState::Pending,
    )
    .await
    .map_err(error_response)?;
    Ok(Json(
        complaints
            .into_iter()
            .map(|c| ComplaintView::new(c, None))
            .collect(),
    ))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_titles() {
        assert_eq!(
            escape_html(r#"<img src="x"> & 'friends'"#),
            "&lt;img src=&quot;x&quot;&gt; &amp; &#x27;friends&#x27;"
        );
        assert_eq!(escape_html("plain title"), "plain title");
    }
}
