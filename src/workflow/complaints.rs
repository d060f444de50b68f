//! Complaint workflow: filing, acceptance with its cascade, dismissal.
//!
//! State machine: `pending -> accepted` or `pending -> dismissed`, both
//! terminal. Authorization (who may adjudicate) is checked at the HTTP
//! boundary; these functions assume the caller is allowed to act.

use super::WorkflowError;
use crate::store::{Complaint, ComplaintState, NewComplaint, Store};

/// File a complaint against a task. No duplicate detection: the same user
/// may report the same task repeatedly.
pub async fn file_complaint(
    store: &dyn Store,
    author_id: i64,
    task_id: i64,
    description: String,
) -> Result<Complaint, WorkflowError> {
    let complaint = store
        .insert_complaint(NewComplaint {
            author_id,
            task_id,
            description,
        })
        .await?;
    tracing::info!(complaint_id = complaint.id, task_id, "complaint filed");
    Ok(complaint)
}

/// Accept a pending complaint.
///
/// Deactivates the task permanently and dismisses every other pending
/// complaint against it, so a task ends up with at most one accepted
/// complaint and no dangling pending ones. The store applies all writes in
/// a single transaction.
pub async fn accept(store: &dyn Store, complaint_id: i64) -> Result<(), WorkflowError> {
    store.accept_complaint(complaint_id).await?;
    tracing::info!(complaint_id, "complaint accepted, task deactivated");
    Ok(())
}

/// Dismiss a pending complaint. The task stays active and remains
/// independently complaint-able.
pub async fn dismiss(store: &dyn Store, complaint_id: i64) -> Result<(), WorkflowError> {
    store.dismiss_complaint(complaint_id).await?;
    tracing::info!(complaint_id, "complaint dismissed");
    Ok(())
}

/// All pending complaints, for the moderation queue.
pub async fn list_pending(store: &dyn Store) -> Result<Vec<Complaint>, WorkflowError> {
    Ok(store.list_pending_complaints().await?)
}

/// Complaints against a task in a given state.
pub async fn complaints_against(
    store: &dyn Store,
    task_id: i64,
    state: ComplaintState,
) -> Result<Vec<Complaint>, WorkflowError> {
    Ok(store.complaints_against(task_id, state).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, NewUser, Task, User};
    use crate::workflow::tasks::{create_task, TaskDraft};

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

    async fn seed_task(store: &InMemoryStore, author_id: i64, title: &str) -> Task {
        create_task(
            store,
            author_id,
            TaskDraft {
                title: title.to_string(),
                description: "d".to_string(),
                image: "i.png".to_string(),
                answer: "a".to_string(),
                points: 1,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn filed_complaint_starts_pending() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "u").await;
        let task = seed_task(&store, user.id, "t").await;

        let complaint = file_complaint(&store, user.id, task.id, "spam".to_string())
            .await
            .unwrap();
        assert_eq!(complaint.state, ComplaintState::Pending);
        assert_eq!(list_pending(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn complaint_against_missing_task_fails() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "u").await;

        let result = file_complaint(&store, user.id, 42, "spam".to_string()).await;
        assert!(matches!(result, Err(WorkflowError::NotFound("task", 42))));
    }

    #[tokio::test]
    async fn accept_cascades_to_task_and_siblings() {
        let store = InMemoryStore::new();
        let author = seed_user(&store, "author").await;
        let r1 = seed_user(&store, "r1").await;
        let r2 = seed_user(&store, "r2").await;
        let task = seed_task(&store, author.id, "bad").await;
        let other_task = seed_task(&store, author.id, "fine").await;

        let c1 = file_complaint(&store, r1.id, task.id, "offensive".to_string())
            .await
            .unwrap();
        let c2 = file_complaint(&store, r2.id, task.id, "me too".to_string())
            .await
            .unwrap();
        let unrelated = file_complaint(&store, r1.id, other_task.id, "meh".to_string())
            .await
            .unwrap();

        accept(&store, c1.id).await.unwrap();

        let c1 = store.get_complaint(c1.id).await.unwrap().unwrap();
        assert_eq!(c1.state, ComplaintState::Accepted);
        let c2 = store.get_complaint(c2.id).await.unwrap().unwrap();
        assert_eq!(c2.state, ComplaintState::Dismissed);

        let task = store.get_task(task.id).await.unwrap().unwrap();
        assert!(!task.active);

        // Complaints against other tasks are untouched.
        let unrelated = store.get_complaint(unrelated.id).await.unwrap().unwrap();
        assert_eq!(unrelated.state, ComplaintState::Pending);
        let other_task = store.get_task(other_task.id).await.unwrap().unwrap();
        assert!(other_task.active);

        // Active listing no longer shows the deactivated task.
        let active = store.list_active_tasks().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(active.iter().all(|t| t.active));

        let accepted = complaints_against(&store, task.id, ComplaintState::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.len(), 1);
        assert!(complaints_against(&store, task.id, ComplaintState::Pending)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn dismiss_has_no_cascade() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "u").await;
        let task = seed_task(&store, user.id, "t").await;
        let c1 = file_complaint(&store, user.id, task.id, "hmm".to_string())
            .await
            .unwrap();
        let c2 = file_complaint(&store, user.id, task.id, "hmm again".to_string())
            .await
            .unwrap();

        dismiss(&store, c1.id).await.unwrap();

        let task = store.get_task(task.id).await.unwrap().unwrap();
        assert!(task.active);
        let c2 = store.get_complaint(c2.id).await.unwrap().unwrap();
        assert_eq!(c2.state, ComplaintState::Pending);
    }

    #[tokio::test]
    async fn terminal_states_reject_adjudication() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "u").await;
        let task = seed_task(&store, user.id, "t").await;
        let accepted = file_complaint(&store, user.id, task.id, "a".to_string())
            .await
            .unwrap();
        let dismissed = file_complaint(&store, user.id, task.id, "b".to_string())
            .await
            .unwrap();

        dismiss(&store, dismissed.id).await.unwrap();
        accept(&store, accepted.id).await.unwrap();

        for id in [accepted.id, dismissed.id] {
            assert!(matches!(
                accept(&store, id).await,
                Err(WorkflowError::InvalidStateTransition(_))
            ));
            assert!(matches!(
                dismiss(&store, id).await,
                Err(WorkflowError::InvalidStateTransition(_))
            ));
        }
    }

    #[tokio::test]
    async fn second_accept_on_same_task_loses() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "u").await;
        let task = seed_task(&store, user.id, "t").await;
        let c1 = file_complaint(&store, user.id, task.id, "a".to_string())
            .await
            .unwrap();
        let c2 = file_complaint(&store, user.id, task.id, "b".to_string())
            .await
            .unwrap();

        accept(&store, c1.id).await.unwrap();
        // c2 was cascade-dismissed, so a later accept observes a terminal state.
        assert!(matches!(
            accept(&store, c2.id).await,
            Err(WorkflowError::InvalidStateTransition(_))
        ));

        let accepted = complaints_against(&store, task.id, ComplaintState::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].id, c1.id);
    }

    #[tokio::test]
    async fn adjudicating_missing_complaint_fails() {
        let store = InMemoryStore::new();
        assert!(matches!(
            accept(&store, 7).await,
            Err(WorkflowError::NotFound("complaint", 7))
        ));
        assert!(matches!(
            dismiss(&store, 7).await,
            Err(WorkflowError::NotFound("complaint", 7))
        ));
    }
}
