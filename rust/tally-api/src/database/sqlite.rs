//! SQLite-backed store.
//!
//! Coarse-grained locking around a single connection, with all rusqlite
//! calls pushed onto the blocking pool. The connection mutex doubles as the
//! serialization point for concurrent completions of the same task.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, params};

use crate::database::schema::SQLITE_SCHEMA;
use crate::database::{TaskRepository, UserRepository};
use crate::domain::task::Task;
use crate::domain::user::User;

/// SQLite store for users and tasks.
#[derive(Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ready = self
            .conn
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false);
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .field("ready", &ready)
            .finish()
    }
}

impl SqliteStore {
    /// Create a store for the given database file. Call [`Self::init`]
    /// before use.
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the database and apply the schema.
    pub async fn init(&self) -> Result<()> {
        let conn_slot = self.conn.clone();
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut guard = conn_slot.lock().unwrap();
            if guard.is_none() {
                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let conn = Connection::open(&db_path)?;
                // Enable WAL mode for concurrency
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.execute_batch(SQLITE_SCHEMA)?;
                *guard = Some(conn);
            }
            Ok(())
        })
        .await
        .context("Tokio spawn_blocking failed")??;

        tracing::info!(path = %self.db_path.display(), "SQLite store initialized");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn create_user(&self, user: &User) -> Result<String> {
        let user = user.clone();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<String> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            conn.execute(
                "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.id,
                    user.username,
                    user.password_hash,
                    user.created_at.to_rfc3339()
                ],
            )?;
            Ok(user.id)
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<User>> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            let mut stmt = conn.prepare(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
            )?;
            let mut rows = stmt.query(params![username])?;

            if let Some(row) = rows.next()? {
                let created_at: String = row.get(3)?;
                Ok(Some(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: chrono::DateTime::parse_from_rfc3339(&created_at)?
                        .with_timezone(&chrono::Utc),
                }))
            } else {
                Ok(None)
            }
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }
}

#[async_trait]
impl TaskRepository for SqliteStore {
    async fn create_task(&self, task: &Task) -> Result<String> {
        let task_json = serde_json::to_string(task)?;
        let task = task.clone();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<String> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            conn.execute(
                "INSERT INTO tasks (id, user_id, next_due_at, created_at, data) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task.id,
                    task.user_id,
                    task.next_due_at.map(|d| d.to_string()),
                    task.created_at.to_rfc3339(),
                    task_json
                ],
            )?;
            Ok(task.id)
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    async fn get_task(&self, id: &str, user_id: &str) -> Result<Option<Task>> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<Task>> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            let mut stmt =
                conn.prepare("SELECT data FROM tasks WHERE id = ?1 AND user_id = ?2")?;
            let mut rows = stmt.query(params![id, user_id])?;

            if let Some(row) = rows.next()? {
                let data: String = row.get(0)?;
                let task: Task = serde_json::from_str(&data)?;
                Ok(Some(task))
            } else {
                Ok(None)
            }
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let task_json = serde_json::to_string(task)?;
        let task = task.clone();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            conn.execute(
                "UPDATE tasks SET next_due_at = ?1, data = ?2 WHERE id = ?3 AND user_id = ?4",
                params![
                    task.next_due_at.map(|d| d.to_string()),
                    task_json,
                    task.id,
                    task.user_id
                ],
            )?;
            Ok(())
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let user_id = user_id.to_string();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<Vec<Task>> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            let mut stmt = conn
                .prepare("SELECT data FROM tasks WHERE user_id = ?1 ORDER BY created_at ASC")?;
            let rows = stmt.query_map(params![user_id], |row| {
                let data: String = row.get(0)?;
                Ok(data)
            })?;

            let mut tasks = Vec::new();
            for item in rows {
                let data = item?;
                if let Ok(task) = serde_json::from_str::<Task>(&data) {
                    tasks.push(task);
                }
            }
            Ok(tasks)
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }

    async fn delete_task(&self, id: &str, user_id: &str) -> Result<bool> {
        let id = id.to_string();
        let user_id = user_id.to_string();
        let conn_slot = self.conn.clone();

        tokio::task::spawn_blocking(move || -> Result<bool> {
            let guard = conn_slot.lock().unwrap();
            let conn = guard
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("SQLite not initialized"))?;

            let count = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count > 0)
        })
        .await
        .context("Tokio spawn_blocking failed")?
    }
}
