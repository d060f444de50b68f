//! SQLite-backed entity store.

use super::{
    now_string, AuthRecord, Complaint, ComplaintState, NewComplaint, NewTask, NewUser, Store,
    StoreError, Task, User, UserSettings, DEFAULT_AVATAR,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    is_staff INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS user_settings (
    user_id INTEGER PRIMARY KEY NOT NULL,
    avatar TEXT NOT NULL,
    score INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image TEXT NOT NULL,
    answer TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    score_tier INTEGER NOT NULL DEFAULT 0,
    created TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    FOREIGN KEY (author_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_tasks_active ON tasks(active, id DESC);
CREATE INDEX IF NOT EXISTS idx_tasks_author ON tasks(author_id);

CREATE TABLE IF NOT EXISTS task_done (
    task_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    PRIMARY KEY (task_id, user_id),
    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_done_user ON task_done(user_id);

CREATE TABLE IF NOT EXISTS complaints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id INTEGER NOT NULL,
    task_id INTEGER NOT NULL,
    description TEXT NOT NULL,
    date TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'pending',
    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (task_id) REFERENCES tasks(id)
);

CREATE INDEX IF NOT EXISTS idx_complaints_state ON complaints(state);
CREATE INDEX IF NOT EXISTS idx_complaints_task ON complaints(task_id, state);
"#;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

fn db_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(e.to_string())
}

fn parse_state(s: &str) -> ComplaintState {
    match s {
        "accepted" => ComplaintState::Accepted,
        "dismissed" => ComplaintState::Dismissed,
        _ => ComplaintState::Pending,
    }
}

fn state_to_string(state: ComplaintState) -> &'static str {
    match state {
        ComplaintState::Pending => "pending",
        ComplaintState::Accepted => "accepted",
        ComplaintState::Dismissed => "dismissed",
    }
}

fn user_from_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        is_staff: row.get::<_, i64>(3)? != 0,
    })
}

fn task_from_row(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image: row.get(4)?,
        answer: row.get(5)?,
        points: row.get(6)?,
        score_tier: row.get(7)?,
        created: row.get(8)?,
        active: row.get::<_, i64>(9)? != 0,
    })
}

fn complaint_from_row(row: &Row<'_>) -> Result<Complaint, rusqlite::Error> {
    let state: String = row.get(5)?;
    Ok(Complaint {
        id: row.get(0)?,
        author_id: row.get(1)?,
        task_id: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        state: parse_state(&state),
    })
}

const TASK_COLUMNS: &str =
    "id, author_id, title, description, image, answer, points, score_tier, created, active";
const COMPLAINT_COLUMNS: &str = "id, author_id, task_id, description, date, state";

impl SqliteStore {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path).map_err(db_err)?;
            conn.execute_batch(SCHEMA).map_err(db_err)?;
            Ok::<_, StoreError>(conn)
        })
        .await
        .map_err(db_err)??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut *conn)
        })
        .await
        .map_err(db_err)?
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(db_err)?;

            let taken: bool = tx
                .prepare("SELECT 1 FROM users WHERE username = ?1")
                .map_err(db_err)?
                .exists(params![new.username])
                .map_err(db_err)?;
            if taken {
                return Err(StoreError::DuplicateUsername(new.username));
            }

            tx.execute(
                "INSERT INTO users (username, display_name, password_hash, is_staff)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new.username,
                    new.display_name,
                    new.password_hash,
                    new.is_staff as i64
                ],
            )
            .map_err(db_err)?;
            let id = tx.last_insert_rowid();

            // Settings row lives and dies with the user.
            tx.execute(
                "INSERT INTO user_settings (user_id, avatar, score) VALUES (?1, ?2, 0)",
                params![id, DEFAULT_AVATAR],
            )
            .map_err(db_err)?;

            tx.commit().map_err(db_err)?;
            Ok(User {
                id,
                username: new.username,
                display_name: new.display_name,
                is_staff: new.is_staff,
            })
        })
        .await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, username, display_name, is_staff FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()
            .map_err(db_err)
        })
        .await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthRecord>, StoreError> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, username, display_name, is_staff, password_hash
                 FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(AuthRecord {
                        user: user_from_row(row)?,
                        password_hash: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(db_err)
        })
        .await
    }

    async fn get_or_create_settings(&self, user_id: i64) -> Result<UserSettings, StoreError> {
        self.with_conn(move |conn| {
            let exists: bool = conn
                .prepare("SELECT 1 FROM users WHERE id = ?1")
                .map_err(db_err)?
                .exists(params![user_id])
                .map_err(db_err)?;
            if !exists {
                return Err(StoreError::NotFound("user", user_id));
            }

            conn.execute(
                "INSERT OR IGNORE INTO user_settings (user_id, avatar, score) VALUES (?1, ?2, 0)",
                params![user_id, DEFAULT_AVATAR],
            )
            .map_err(db_err)?;

            conn.query_row(
                "SELECT user_id, avatar, score FROM user_settings WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserSettings {
                        user_id: row.get(0)?,
                        avatar: row.get(1)?,
                        score: row.get(2)?,
                    })
                },
            )
            .map_err(db_err)
        })
        .await
    }

    async fn set_avatar(&self, user_id: i64, avatar: &str) -> Result<(), StoreError> {
        let avatar = avatar.to_string();
        self.with_conn(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE user_settings SET avatar = ?1 WHERE user_id = ?2",
                    params![avatar, user_id],
                )
                .map_err(db_err)?;
            if rows == 0 {
                return Err(StoreError::NotFound("user", user_id));
            }
            Ok(())
        })
        .await
    }

    async fn add_score(&self, user_id: i64, points: i64) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let exists: bool = conn
                .prepare("SELECT 1 FROM users WHERE id = ?1")
                .map_err(db_err)?
                .exists(params![user_id])
                .map_err(db_err)?;
            if !exists {
                return Err(StoreError::NotFound("user", user_id));
            }
            conn.execute(
                "INSERT INTO user_settings (user_id, avatar, score) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET score = score + excluded.score",
                params![user_id, DEFAULT_AVATAR, points],
            )
            .map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn insert_task(&self, new: NewTask) -> Result<Task, StoreError> {
        self.with_conn(move |conn| {
            let created = now_string();
            conn.execute(
                "INSERT INTO tasks (author_id, title, description, image, answer, points, score_tier, created, active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
                params![
                    new.author_id,
                    new.title,
                    new.description,
                    new.image,
                    new.answer,
                    new.points,
                    new.score_tier,
                    created
                ],
            )
            .map_err(db_err)?;
            Ok(Task {
                id: conn.last_insert_rowid(),
                author_id: new.author_id,
                title: new.title,
                description: new.description,
                image: new.image,
                answer: new.answer,
                points: new.points,
                score_tier: new.score_tier,
                created,
                active: true,
            })
        })
        .await
    }

    async fn get_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                task_from_row,
            )
            .optional()
            .map_err(db_err)
        })
        .await
    }

    async fn list_active_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE active = 1 ORDER BY id DESC"
                ))
                .map_err(db_err)?;
            let tasks = stmt
                .query_map([], task_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(tasks)
        })
        .await
    }

    async fn tasks_authored_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE author_id = ?1 ORDER BY id DESC"
                ))
                .map_err(db_err)?;
            let tasks = stmt
                .query_map(params![user_id], task_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(tasks)
        })
        .await
    }

    async fn tasks_completed_by(&self, user_id: i64) -> Result<Vec<Task>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE active = 1
                       AND id IN (SELECT task_id FROM task_done WHERE user_id = ?1)
                     ORDER BY id DESC"
                ))
                .map_err(db_err)?;
            let tasks = stmt
                .query_map(params![user_id], task_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(tasks)
        })
        .await
    }

    async fn search_active_tasks(&self, title: &str) -> Result<Vec<Task>, StoreError> {
        // LIKE is case-insensitive for ASCII in SQLite, which matches the
        // in-memory backend's to_lowercase() closely enough at this scale.
        let pattern = format!(
            "%{}%",
            title.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE active = 1 AND title LIKE ?1 ESCAPE '\\'
                     ORDER BY id DESC"
                ))
                .map_err(db_err)?;
            let tasks = stmt
                .query_map(params![pattern], task_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(tasks)
        })
        .await
    }

    async fn is_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            conn.prepare("SELECT 1 FROM task_done WHERE task_id = ?1 AND user_id = ?2")
                .map_err(db_err)?
                .exists(params![task_id, user_id])
                .map_err(db_err)
        })
        .await
    }

    async fn done_count(&self, task_id: i64) -> Result<i64, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM task_done WHERE task_id = ?1",
                params![task_id],
                |row| row.get(0),
            )
            .map_err(db_err)
        })
        .await
    }

    async fn mark_done(&self, task_id: i64, user_id: i64) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let exists: bool = conn
                .prepare("SELECT 1 FROM tasks WHERE id = ?1")
                .map_err(db_err)?
                .exists(params![task_id])
                .map_err(db_err)?;
            if !exists {
                return Err(StoreError::NotFound("task", task_id));
            }
            let rows = conn
                .execute(
                    "INSERT OR IGNORE INTO task_done (task_id, user_id) VALUES (?1, ?2)",
                    params![task_id, user_id],
                )
                .map_err(db_err)?;
            Ok(rows > 0)
        })
        .await
    }

    async fn insert_complaint(&self, new: NewComplaint) -> Result<Complaint, StoreError> {
        self.with_conn(move |conn| {
            let exists: bool = conn
                .prepare("SELECT 1 FROM tasks WHERE id = ?1")
                .map_err(db_err)?
                .exists(params![new.task_id])
                .map_err(db_err)?;
            if !exists {
                return Err(StoreError::NotFound("task", new.task_id));
            }
            let date = now_string();
            conn.execute(
                "INSERT INTO complaints (author_id, task_id, description, date, state)
                 VALUES (?1, ?2, ?3, ?4, 'pending')",
                params![new.author_id, new.task_id, new.description, date],
            )
            .map_err(db_err)?;
            Ok(Complaint {
                id: conn.last_insert_rowid(),
                author_id: new.author_id,
                task_id: new.task_id,
                description: new.description,
                date,
                state: ComplaintState::Pending,
            })
        })
        .await
    }

    async fn get_complaint(&self, id: i64) -> Result<Option<Complaint>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"),
                params![id],
                complaint_from_row,
            )
            .optional()
            .map_err(db_err)
        })
        .await
    }

    async fn list_pending_complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COMPLAINT_COLUMNS} FROM complaints
                     WHERE state = 'pending' ORDER BY id ASC"
                ))
                .map_err(db_err)?;
            let complaints = stmt
                .query_map([], complaint_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(complaints)
        })
        .await
    }

    async fn complaints_against(
        &self,
        task_id: i64,
        state: ComplaintState,
    ) -> Result<Vec<Complaint>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {COMPLAINT_COLUMNS} FROM complaints
                     WHERE task_id = ?1 AND state = ?2 ORDER BY id ASC"
                ))
                .map_err(db_err)?;
            let complaints = stmt
                .query_map(params![task_id, state_to_string(state)], complaint_from_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;
            Ok(complaints)
        })
        .await
    }

    async fn accept_complaint(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(db_err)?;

            let row: Option<(i64, String)> = tx
                .query_row(
                    "SELECT task_id, state FROM complaints WHERE id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(db_err)?;
            let (task_id, state) = row.ok_or(StoreError::NotFound("complaint", id))?;
            if parse_state(&state) != ComplaintState::Pending {
                return Err(StoreError::NotPending(id));
            }

            tx.execute(
                "UPDATE complaints SET state = 'accepted' WHERE id = ?1",
                params![id],
            )
            .map_err(db_err)?;
            tx.execute(
                "UPDATE tasks SET active = 0 WHERE id = ?1",
                params![task_id],
            )
            .map_err(db_err)?;
            // Sibling pending complaints are moot once one is accepted.
            tx.execute(
                "UPDATE complaints SET state = 'dismissed'
                 WHERE task_id = ?1 AND state = 'pending'",
                params![task_id],
            )
            .map_err(db_err)?;

            tx.commit().map_err(db_err)?;
            Ok(())
        })
        .await
    }

    async fn dismiss_complaint(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE complaints SET state = 'dismissed' WHERE id = ?1 AND state = 'pending'",
                    params![id],
                )
                .map_err(db_err)?;
            if rows > 0 {
                return Ok(());
            }
            let exists: bool = conn
                .prepare("SELECT 1 FROM complaints WHERE id = ?1")
                .map_err(db_err)?
                .exists(params![id])
                .map_err(db_err)?;
            if exists {
                Err(StoreError::NotPending(id))
            } else {
                Err(StoreError::NotFound("complaint", id))
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store(dir: &tempfile::TempDir) -> SqliteStore {
        SqliteStore::new(dir.path().join("stegoboard.db"))
            .await
            .expect("open store")
    }

    async fn seed_user(store: &SqliteStore, username: &str) -> User {
        store
            .create_user(NewUser {
                username: username.to_string(),
                display_name: username.to_string(),
                password_hash: "x".to_string(),
                is_staff: false,
            })
            .await
            .expect("create user")
    }

    async fn seed_task(store: &SqliteStore, author: i64, title: &str, answer: &str) -> Task {
        store
            .insert_task(NewTask {
                author_id: author,
                title: title.to_string(),
                description: "desc".to_string(),
                image: "images/tasks/p.png".to_string(),
                answer: answer.to_string(),
                points: 10,
                score_tier: 0,
            })
            .await
            .expect("insert task")
    }

    #[tokio::test]
    async fn user_and_settings_created_together() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let user = seed_user(&store, "alice").await;
        let settings = store.get_or_create_settings(user.id).await.unwrap();
        assert_eq!(settings.avatar, DEFAULT_AVATAR);
        assert_eq!(settings.score, 0);
    }

    #[tokio::test]
    async fn mark_done_upsert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = seed_user(&store, "bob").await;
        let task = seed_task(&store, user.id, "hidden", "orion").await;

        assert!(store.mark_done(task.id, user.id).await.unwrap());
        assert!(!store.mark_done(task.id, user.id).await.unwrap());
        assert_eq!(store.done_count(task.id).await.unwrap(), 1);
        assert!(store.is_done(task.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn accept_cascade_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let (complaint_id, sibling_id, task_id);
        {
            let store = open_store(&dir).await;
            let author = seed_user(&store, "author").await;
            let reporter = seed_user(&store, "reporter").await;
            let task = seed_task(&store, author.id, "bad task", "x").await;
            task_id = task.id;

            let c1 = store
                .insert_complaint(NewComplaint {
                    author_id: reporter.id,
                    task_id,
                    description: "offensive".to_string(),
                })
                .await
                .unwrap();
            let c2 = store
                .insert_complaint(NewComplaint {
                    author_id: author.id,
                    task_id,
                    description: "me too".to_string(),
                })
                .await
                .unwrap();
            complaint_id = c1.id;
            sibling_id = c2.id;

            store.accept_complaint(complaint_id).await.unwrap();
        }

        // Reopen: the whole cascade must have been committed.
        let store = open_store(&dir).await;
        let accepted = store.get_complaint(complaint_id).await.unwrap().unwrap();
        assert_eq!(accepted.state, ComplaintState::Accepted);
        let sibling = store.get_complaint(sibling_id).await.unwrap().unwrap();
        assert_eq!(sibling.state, ComplaintState::Dismissed);
        let task = store.get_task(task_id).await.unwrap().unwrap();
        assert!(!task.active);
        assert!(store.list_active_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accept_rejects_non_pending() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = seed_user(&store, "carol").await;
        let task = seed_task(&store, user.id, "t", "a").await;
        let complaint = store
            .insert_complaint(NewComplaint {
                author_id: user.id,
                task_id: task.id,
                description: "spam".to_string(),
            })
            .await
            .unwrap();

        store.dismiss_complaint(complaint.id).await.unwrap();
        let result = store.accept_complaint(complaint.id).await;
        assert!(matches!(result, Err(StoreError::NotPending(_))));
        let result = store.dismiss_complaint(complaint.id).await;
        assert!(matches!(result, Err(StoreError::NotPending(_))));
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_and_skips_inactive() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = seed_user(&store, "dave").await;
        seed_task(&store, user.id, "Hidden Stars", "x").await;
        let other = seed_task(&store, user.id, "Hidden Moon", "y").await;
        seed_task(&store, user.id, "Plain", "z").await;

        let complaint = store
            .insert_complaint(NewComplaint {
                author_id: user.id,
                task_id: other.id,
                description: "bad".to_string(),
            })
            .await
            .unwrap();
        store.accept_complaint(complaint.id).await.unwrap();

        let found = store.search_active_tasks("hidden").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Hidden Stars");
    }
}
