//! Task workflow: answer verification, completion tracking, score accrual,
//! and the derived task listings.

use super::WorkflowError;
use crate::store::{NewTask, Store, Task};
use serde::Serialize;

/// How many authored tasks a profile view previews.
pub const AUTHORED_PREVIEW_LIMIT: usize = 5;

/// Result of an answer submission.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CheckOutcome {
    /// Whether the candidate matched the hidden answer exactly.
    pub correct: bool,
    /// Whether this submission added the user to the done set.
    pub newly_done: bool,
    /// Points credited to the user by this submission. Zero on a repeat
    /// solve: the award happens once, on first completion.
    pub awarded: i64,
}

/// Input for [`create_task`], trusted to be validated by the caller.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub answer: String,
    pub points: i64,
}

/// Check a candidate answer against a task.
///
/// Comparison is byte-for-byte: no trimming, no case folding. A correct
/// answer idempotently adds the user to the task's done set and credits
/// `task.points` to their score on first completion only. A wrong answer
/// has no side effects at all.
pub async fn submit_answer(
    store: &dyn Store,
    task_id: i64,
    candidate: &str,
    user_id: i64,
) -> Result<CheckOutcome, WorkflowError> {
    let task = store
        .get_task(task_id)
        .await?
        .ok_or(WorkflowError::NotFound("task", task_id))?;

    if task.answer != candidate {
        return Ok(CheckOutcome {
            correct: false,
            newly_done: false,
            awarded: 0,
        });
    }

    let newly_done = store.mark_done(task_id, user_id).await?;
    let awarded = if newly_done {
        store.add_score(user_id, task.points).await?;
        task.points
    } else {
        0
    };

    Ok(CheckOutcome {
        correct: true,
        newly_done,
        awarded,
    })
}

/// Create a task. `score_tier` snapshots the author's score at this moment;
/// it never changes afterwards.
pub async fn create_task(
    store: &dyn Store,
    author_id: i64,
    draft: TaskDraft,
) -> Result<Task, WorkflowError> {
    let settings = store.get_or_create_settings(author_id).await?;
    let task = store
        .insert_task(NewTask {
            author_id,
            title: draft.title,
            description: draft.description,
            image: draft.image,
            answer: draft.answer,
            points: draft.points,
            score_tier: settings.score,
        })
        .await?;
    tracing::info!(task_id = task.id, author_id, "task created");
    Ok(task)
}

/// All active tasks, newest first.
pub async fn list_active_tasks(store: &dyn Store) -> Result<Vec<Task>, WorkflowError> {
    Ok(store.list_active_tasks().await?)
}

/// Tasks a user created, deactivated ones included.
pub async fn tasks_authored_by(
    store: &dyn Store,
    user_id: i64,
) -> Result<Vec<Task>, WorkflowError> {
    Ok(store.tasks_authored_by(user_id).await?)
}

/// Total authored count plus the first few tasks, the shape profile
/// views display.
pub async fn authored_preview(
    store: &dyn Store,
    user_id: i64,
) -> Result<(usize, Vec<Task>), WorkflowError> {
    let mut tasks = store.tasks_authored_by(user_id).await?;
    let total = tasks.len();
    tasks.truncate(AUTHORED_PREVIEW_LIMIT);
    Ok((total, tasks))
}

/// Active tasks the user has solved.
pub async fn tasks_completed_by(
    store: &dyn Store,
    user_id: i64,
) -> Result<Vec<Task>, WorkflowError> {
    Ok(store.tasks_completed_by(user_id).await?)
}

pub async fn is_done(
    store: &dyn Store,
    task_id: i64,
    user_id: i64,
) -> Result<bool, WorkflowError> {
    Ok(store.is_done(task_id, user_id).await?)
}

pub async fn done_count(store: &dyn Store, task_id: i64) -> Result<i64, WorkflowError> {
    Ok(store.done_count(task_id).await?)
}

/// Pick a task the user has not solved yet: the lowest-id active task
/// outside their done set. `None` once they have solved everything.
pub async fn suggest_next_task(
    store: &dyn Store,
    user_id: i64,
) -> Result<Option<Task>, WorkflowError> {
    let mut candidates = store.list_active_tasks().await?;
    candidates.sort_by_key(|t| t.id);
    for task in candidates {
        if !store.is_done(task.id, user_id).await? {
            return Ok(Some(task));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, NewUser, User};

    async fn seed_user(store: &InMemoryStore, username: &str) -> User {
        store
            .create_user(NewUser {
                username: username.to_string(),
                display_name: username.to_string(),
                password_hash: "x".to_string(),
                is_staff: false,
            })
            .await
            .unwrap()
    }

    fn draft(title: &str, answer: &str, points: i64) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: "find the hidden word".to_string(),
            image: "images/tasks/p.png".to_string(),
            answer: answer.to_string(),
            points,
        }
    }

    #[tokio::test]
    async fn answer_comparison_is_exact_and_case_sensitive() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let solver = seed_user(&store, "solver").await;
        let task = create_task(&store, author.id, draft("t1", "orion", 10))
            .await
            .unwrap();

        for wrong in ["Orion", "orion ", " orion", "ORION", ""] {
            let outcome = submit_answer(&store, task.id, wrong, solver.id).await.unwrap();
            assert!(!outcome.correct, "{wrong:?} should not match");
        }
        assert!(!is_done(&store, task.id, solver.id).await.unwrap());

        let outcome = submit_answer(&store, task.id, "orion", solver.id)
            .await
            .unwrap();
        assert!(outcome.correct);
        assert!(outcome.newly_done);
        assert_eq!(outcome.awarded, 10);
        assert!(is_done(&store, task.id, solver.id).await.unwrap());
        assert_eq!(done_count(&store, task.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn repeat_solve_awards_nothing_and_counts_once() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let solver = seed_user(&store, "solver").await;
        let task = create_task(&store, author.id, draft("t1", "orion", 10))
            .await
            .unwrap();

        submit_answer(&store, task.id, "orion", solver.id).await.unwrap();
        let second = submit_answer(&store, task.id, "orion", solver.id)
            .await
            .unwrap();
        assert!(second.correct);
        assert!(!second.newly_done);
        assert_eq!(second.awarded, 0);

        assert_eq!(done_count(&store, task.id).await.unwrap(), 1);
        let settings = store.get_or_create_settings(solver.id).await.unwrap();
        assert_eq!(settings.score, 10);
    }

    #[tokio::test]
    async fn wrong_answer_is_side_effect_free() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let solver = seed_user(&store, "solver").await;
        let task = create_task(&store, author.id, draft("t1", "orion", 10))
            .await
            .unwrap();

        submit_answer(&store, task.id, "vega", solver.id).await.unwrap();

        assert_eq!(done_count(&store, task.id).await.unwrap(), 0);
        let settings = store.get_or_create_settings(solver.id).await.unwrap();
        assert_eq!(settings.score, 0);
        let task = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(task.answer, "orion");
        assert!(task.active);
    }

    #[tokio::test]
    async fn submit_against_missing_task_fails() {
        let store = InMemoryStore::new();
        let solver = seed_user(&store, "solver").await;

        let result = submit_answer(&store, 999, "orion", solver.id).await;
        assert!(matches!(result, Err(WorkflowError::NotFound("task", 999))));
    }

    #[tokio::test]
    async fn score_tier_snapshots_author_score_at_creation() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;

        let first = create_task(&store, author.id, draft("t1", "a", 15))
            .await
            .unwrap();
        assert_eq!(first.score_tier, 0);

        // Author earns points; later tasks snapshot the higher score.
        submit_answer(&store, first.id, "a", author.id).await.unwrap();
        let second = create_task(&store, author.id, draft("t2", "b", 5))
            .await
            .unwrap();
        assert_eq!(second.score_tier, 15);

        // The first task's tier is unchanged by the author's new score.
        let first = store.get_task(first.id).await.unwrap().unwrap();
        assert_eq!(first.score_tier, 0);
    }

    #[tokio::test]
    async fn suggest_next_picks_lowest_id_not_done() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let solver = seed_user(&store, "solver").await;
        let t1 = create_task(&store, author.id, draft("t1", "a", 1)).await.unwrap();
        let t2 = create_task(&store, author.id, draft("t2", "b", 1)).await.unwrap();
        let t3 = create_task(&store, author.id, draft("t3", "c", 1)).await.unwrap();

        let next = suggest_next_task(&store, solver.id).await.unwrap().unwrap();
        assert_eq!(next.id, t1.id);

        submit_answer(&store, t1.id, "a", solver.id).await.unwrap();
        let next = suggest_next_task(&store, solver.id).await.unwrap().unwrap();
        assert_eq!(next.id, t2.id);

        submit_answer(&store, t2.id, "b", solver.id).await.unwrap();
        submit_answer(&store, t3.id, "c", solver.id).await.unwrap();
        assert!(suggest_next_task(&store, solver.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn authored_preview_caps_at_five() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        for i in 0..7 {
            create_task(&store, author.id, draft(&format!("t{i}"), "a", 1))
                .await
                .unwrap();
        }

        let (total, preview) = authored_preview(&store, author.id).await.unwrap();
        assert_eq!(total, 7);
        assert_eq!(preview.len(), AUTHORED_PREVIEW_LIMIT);
        // Newest first.
        assert!(preview.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn completed_listing_tracks_solved_active_tasks() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let solver = seed_user(&store, "solver").await;
        let t1 = create_task(&store, author.id, draft("t1", "a", 1)).await.unwrap();
        create_task(&store, author.id, draft("t2", "b", 1)).await.unwrap();

        assert!(tasks_completed_by(&store, solver.id).await.unwrap().is_empty());
        submit_answer(&store, t1.id, "a", solver.id).await.unwrap();
        let completed = tasks_completed_by(&store, solver.id).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, t1.id);
    }
}
