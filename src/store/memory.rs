//! In-memory entity store (non-persistent).

use super::{
    now_string, AuthRecord, Complaint, ComplaintState, NewComplaint, NewTask, NewUser, Store,
    StoreError, Task, User, UserSettings, DEFAULT_AVATAR,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    password_hashes: HashMap<i64, String>,
    settings: HashMap<i64, UserSettings>,
    tasks: HashMap<i64, Task>,
    // task id -> user ids that solved it
    done: HashMap<i64, HashSet<i64>>,
    complaints: HashMap<i64, Complaint>,
    next_user_id: i64,
    next_task_id: i64,
    next_complaint_id: i64,
}

/// All state behind a single lock, so multi-record writes (user + settings,
/// the accept cascade) are as atomic as a backend transaction.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_desc(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| b.id.cmp(&a.id));
    tasks
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::DuplicateUsername(new.username));
        }
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        let user = User {
            id,
            username: new.username,
            display_name: new.display_name,
            is_staff: new.is_staff,
        };
        inner.users.insert(id, user.clone());
        inner.password_hashes.insert(id, new.password_hash);
        inner.settings.insert(
            id,
            UserSettings {
                user_id: id,
                avatar: DEFAULT_AVATAR.to_string(),
                score: 0,
            },
        );
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthRecord>, StoreError> {
        let inner = self.inner.read().await;
        let record = inner
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| AuthRecord {
                user: u.clone(),
                password_hash: inner.password_hashes.get(&u.id).cloned().unwrap_or_default(),
            });
        Ok(record)
    }

    async fn get_or_create_settings(&self, user_id: i64) -> Result<UserSettings, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user", user_id));
        }
        let settings = inner
            .settings
            .entry(user_id)
            .or_insert_with(|| UserSettings {
                user_id,
                avatar: DEFAULT_AVATAR.to_string(),
                score: 0,
            });
        Ok(settings.clone())
    }

    async fn set_avatar(&self, user_id: i64, avatar: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.settings.get_mut(&user_id) {
            Some(settings) => {
                settings.avatar = avatar.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound("user", user_id)),
        }
    }

    async fn add_score(&self, user_id: i64, points: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user", user_id));
        }
        let settings = inner
            .settings
            .entry(user_id)
            .or_insert_with(|| UserSettings {
                user_id,
                avatar: DEFAULT_AVATAR.to_string(),
                score: 0,
            });
        settings.score += points;
        Ok(())
    }

    async fn insert_task(&self, new: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_task_id += 1;
        let id = inner.next_task_id;
        let task = Task {
            id,
            author_id: new.author_id,
            title: new.title,
            description: new.description,
            image: new.image,
            answer: new.answer,
            points: new.points,
            score_tier: new.score_tier,
            created: now_string(),
            active: true,
        };
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.get(&id).cloned())
    }

    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(sorted_desc(
            inner.tasks.values().filter(|t| t.active).cloned().collect(),
        ))
    }

    async fn tasks_authored_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(sorted_desc(
            inner
                .tasks
                .values()
                .filter(|t| t.author_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn tasks_completed_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(sorted_desc(
            inner
                .tasks
                .values()
                .filter(|t| {
                    t.active
                        && inner
                            .done
                            .get(&t.id)
                            .is_some_and(|users| users.contains(&user_id))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn search_active_tasks(&self, title: &str) -> Result<Vec<Task>, StoreError> {
        let needle = title.to_lowercase();
        let inner = self.inner.read().await;
        Ok(sorted_desc(
            inner
                .tasks
                .values()
                .filter(|t| t.active && t.title.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        ))
    }

    async fn is_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .done
            .get(&task_id)
            .is_some_and(|users| users.contains(&user_id)))
    }

    async fn done_count(&self, task_id: i64) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.done.get(&task_id).map(|u| u.len() as i64).unwrap_or(0))
    }

    async fn mark_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.tasks.contains_key(&task_id) {
            return Err(StoreError::NotFound("task", task_id));
        }
        Ok(inner.done.entry(task_id).or_default().insert(user_id))
    }

    async fn insert_complaint(&self, new: NewComplaint) -> Result<Complaint, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.tasks.contains_key(&new.task_id) {
            return Err(StoreError::NotFound("task", new.task_id));
        }
        inner.next_complaint_id += 1;
        let id = inner.next_complaint_id;
        let complaint = Complaint {
            id,
            author_id: new.author_id,
            task_id: new.task_id,
            description: new.description,
            date: now_string(),
            state: ComplaintState::Pending,
        };
        inner.complaints.insert(id, complaint.clone());
        Ok(complaint)
    }

    async fn get_complaint(&self, id: i64) -> Result<Option<Complaint>, StoreError> {
        Ok(self.inner.read().await.complaints.get(&id).cloned())
    }

    async fn list_pending_complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        let inner = self.inner.read().await;
        let mut pending: Vec<Complaint> = inner
            .complaints
            .values()
            .filter(|c| c.state == ComplaintState::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|c| c.id);
        Ok(pending)
    }

    async fn complaints_against(
        &self,
        task_id: i64,
        state: ComplaintState,
    ) -> Result<Vec<Complaint>, StoreError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<Complaint> = inner
            .complaints
            .values()
            .filter(|c| c.task_id == task_id && c.state == state)
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.id);
        Ok(matching)
    }

    async fn accept_complaint(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let (task_id, state) = match inner.complaints.get(&id) {
            Some(c) => (c.task_id, c.state),
            None => return Err(StoreError::NotFound("complaint", id)),
        };
        if state != ComplaintState::Pending {
            return Err(StoreError::NotPending(id));
        }

        if let Some(c) = inner.complaints.get_mut(&id) {
            c.state = ComplaintState::Accepted;
        }
        if let Some(task) = inner.tasks.get_mut(&task_id) {
            task.active = false;
        }
        // Sibling pending complaints are moot once one is accepted.
        for c in inner.complaints.values_mut() {
            if c.task_id == task_id && c.state == ComplaintState::Pending {
                c.state = ComplaintState::Dismissed;
            }
        }
        Ok(())
    }

    async fn dismiss_complaint(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let complaint = inner
            .complaints
            .get_mut(&id)
            .ok_or(StoreError::NotFound("complaint", id))?;
        if complaint.state != ComplaintState::Pending {
            return Err(StoreError::NotPending(id));
        }
        complaint.state = ComplaintState::Dismissed;
        Ok(())
    }
}
