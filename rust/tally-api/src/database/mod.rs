//! Database repository implementations.
//!
//! Provides trait-based abstractions for data access with two backends:
//! SQLite for real deployments and an in-memory store for testing. All task
//! lookups are scoped to the owning user, so handlers never see (let alone
//! mutate) another user's task. The store also serializes concurrent
//! updates to the same task; the recurrence engine assumes it is handed a
//! fresh snapshot and is the sole writer of its result.

pub mod schema;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::DatabaseConfig;
use crate::domain::task::Task;
use crate::domain::user::User;

/// Repository trait for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user.
    async fn create_user(&self, user: &User) -> anyhow::Result<String>;

    /// Look a user up by login name.
    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}

/// Repository trait for task operations.
///
/// Reads and deletes take the owner's id; a task that exists but belongs to
/// someone else behaves exactly like a missing task.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task.
    async fn create_task(&self, task: &Task) -> anyhow::Result<String>;

    /// Get a task by id, scoped to its owner.
    async fn get_task(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Task>>;

    /// Persist an updated task snapshot.
    async fn update_task(&self, task: &Task) -> anyhow::Result<()>;

    /// List a user's tasks, oldest first.
    async fn list_tasks(&self, user_id: &str) -> anyhow::Result<Vec<Task>>;

    /// Delete a task, scoped to its owner. Returns whether anything was
    /// removed.
    async fn delete_task(&self, id: &str, user_id: &str) -> anyhow::Result<bool>;
}

/// Database abstraction over the available backends.
#[derive(Debug, Clone)]
pub enum Database {
    /// SQLite-backed store.
    SQLite(sqlite::SqliteStore),
    /// In-memory store for testing.
    InMemory(InMemoryStore),
}

impl Database {
    /// Open and initialize the store described by the configuration.
    pub async fn from_config(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let store = sqlite::SqliteStore::new(std::path::PathBuf::from(&config.path));
        store.init().await?;
        Ok(Self::SQLite(store))
    }

    /// Create an in-memory database for testing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStore::new())
    }

    /// Name of the active backend, for readiness reporting.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "sqlite",
            Self::InMemory(_) => "in-memory",
        }
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: &User) -> anyhow::Result<String> {
        match self {
            Self::SQLite(store) => store.create_user(user).await,
            Self::InMemory(store) => store.create_user(user).await,
        }
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        match self {
            Self::SQLite(store) => store.get_user_by_username(username).await,
            Self::InMemory(store) => store.get_user_by_username(username).await,
        }
    }
}

#[async_trait]
impl TaskRepository for Database {
    async fn create_task(&self, task: &Task) -> anyhow::Result<String> {
        match self {
            Self::SQLite(store) => store.create_task(task).await,
            Self::InMemory(store) => store.create_task(task).await,
        }
    }

    async fn get_task(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Task>> {
        match self {
            Self::SQLite(store) => store.get_task(id, user_id).await,
            Self::InMemory(store) => store.get_task(id, user_id).await,
        }
    }

    async fn update_task(&self, task: &Task) -> anyhow::Result<()> {
        match self {
            Self::SQLite(store) => store.update_task(task).await,
            Self::InMemory(store) => store.update_task(task).await,
        }
    }

    async fn list_tasks(&self, user_id: &str) -> anyhow::Result<Vec<Task>> {
        match self {
            Self::SQLite(store) => store.list_tasks(user_id).await,
            Self::InMemory(store) => store.list_tasks(user_id).await,
        }
    }

    async fn delete_task(&self, id: &str, user_id: &str) -> anyhow::Result<bool> {
        match self {
            Self::SQLite(store) => store.delete_task(id, user_id).await,
            Self::InMemory(store) => store.delete_task(id, user_id).await,
        }
    }
}

// ============================================================================
// In-Memory Store (for testing)
// ============================================================================

/// In-memory store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &User) -> anyhow::Result<String> {
        let mut users = self.users.write();
        if users.values().any(|u| u.username == user.username) {
            anyhow::bail!("username already exists: {}", user.username);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.id.clone())
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read();
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create_task(&self, task: &Task) -> anyhow::Result<String> {
        let mut tasks = self.tasks.write();
        tasks.insert(task.id.clone(), task.clone());
        Ok(task.id.clone())
    }

    async fn get_task(&self, id: &str, user_id: &str) -> anyhow::Result<Option<Task>> {
        let tasks = self.tasks.read();
        Ok(tasks.get(id).filter(|t| t.user_id == user_id).cloned())
    }

    async fn update_task(&self, task: &Task) -> anyhow::Result<()> {
        let mut tasks = self.tasks.write();
        // Mirror the SQLite backend: only an existing row with a matching
        // owner is overwritten, anything else is a no-op.
        if let Some(existing) = tasks.get_mut(&task.id) {
            if existing.user_id == task.user_id {
                *existing = task.clone();
            }
        }
        Ok(())
    }

    async fn list_tasks(&self, user_id: &str) -> anyhow::Result<Vec<Task>> {
        let tasks = self.tasks.read();
        let mut filtered: Vec<_> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        filtered.sort_by_key(|t| t.created_at);
        Ok(filtered)
    }

    async fn delete_task(&self, id: &str, user_id: &str) -> anyhow::Result<bool> {
        let mut tasks = self.tasks.write();
        match tasks.get(id) {
            Some(t) if t.user_id == user_id => {
                tasks.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Frequency;
    use chrono::{NaiveDate, Utc};

    fn sample_task(id: &str, user_id: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "laundry".to_string(),
            description: None,
            frequency: Frequency::Weekly,
            custom_interval_days: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            last_completed_at: None,
            next_due_at: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn task_lookups_are_owner_scoped() {
        let store = InMemoryStore::new();
        store.create_task(&sample_task("t1", "alice")).await.unwrap();

        assert!(store.get_task("t1", "alice").await.unwrap().is_some());
        assert!(store.get_task("t1", "bob").await.unwrap().is_none());

        // A foreign delete must not touch the row.
        assert!(!store.delete_task("t1", "bob").await.unwrap());
        assert!(store.get_task("t1", "alice").await.unwrap().is_some());
        assert!(store.delete_task("t1", "alice").await.unwrap());
    }

    #[tokio::test]
    async fn update_never_creates_or_crosses_owners() {
        let store = InMemoryStore::new();
        store.create_task(&sample_task("t1", "alice")).await.unwrap();

        // An update for an unknown id must not create a row.
        store.update_task(&sample_task("t2", "alice")).await.unwrap();
        assert!(store.get_task("t2", "alice").await.unwrap().is_none());

        // A foreign update must leave the row untouched.
        let mut foreign = sample_task("t1", "bob");
        foreign.title = "hijacked".to_string();
        store.update_task(&foreign).await.unwrap();

        let loaded = store.get_task("t1", "alice").await.unwrap().unwrap();
        assert_eq!(loaded.title, "laundry");
        assert_eq!(loaded.user_id, "alice");
    }

    #[tokio::test]
    async fn list_filters_by_owner() {
        let store = InMemoryStore::new();
        store.create_task(&sample_task("t1", "alice")).await.unwrap();
        store.create_task(&sample_task("t2", "alice")).await.unwrap();
        store.create_task(&sample_task("t3", "bob")).await.unwrap();

        let tasks = store.list_tasks("alice").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.user_id == "alice"));
    }

    #[tokio::test]
    async fn duplicate_usernames_rejected() {
        let store = InMemoryStore::new();
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        store.create_user(&user).await.unwrap();

        let dup = User {
            id: "u2".to_string(),
            ..user.clone()
        };
        assert!(store.create_user(&dup).await.is_err());
    }
}
