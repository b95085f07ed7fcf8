use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::models::UserMap;
use crate::services::migrations::TasksDocument;

/// Storage backend for the two flat JSON documents. Loading a document that
/// does not exist yet yields an empty collection; saving always rewrites the
/// whole document, so callers must load, mutate their copy, and save.
pub trait Storage: Send + Sync {
    fn load_tasks(&self) -> AppResult<TasksDocument>;
    fn save_tasks(&self, doc: &TasksDocument) -> AppResult<()>;
    fn load_users(&self) -> AppResult<UserMap>;
    fn save_users(&self, users: &UserMap) -> AppResult<()>;
}

pub struct JsonFileStorage {
    tasks_path: PathBuf,
    users_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(tasks_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            users_path: users_path.into(),
        }
    }

    fn write_pretty<T: serde::Serialize>(path: &Path, value: &T) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_tasks(&self) -> AppResult<TasksDocument> {
        if !self.tasks_path.exists() {
            tracing::debug!("Tasks document missing, starting empty");
            return Ok(TasksDocument::empty());
        }
        let raw = fs::read_to_string(&self.tasks_path)?;
        Ok(TasksDocument::from_json(&raw)?)
    }

    fn save_tasks(&self, doc: &TasksDocument) -> AppResult<()> {
        Self::write_pretty(&self.tasks_path, doc)
    }

    fn load_users(&self) -> AppResult<UserMap> {
        if !self.users_path.exists() {
            tracing::debug!("Users document missing, starting empty");
            return Ok(UserMap::new());
        }
        let raw = fs::read_to_string(&self.users_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_users(&self, users: &UserMap) -> AppResult<()> {
        Self::write_pretty(&self.users_path, users)
    }
}

// In-memory fake for tests, with save counters so migration idempotence can
// assert on the number of writes performed.
#[cfg(test)]
pub mod memory {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStorage {
        pub tasks: Mutex<TasksDocument>,
        pub users: Mutex<UserMap>,
        pub task_saves: AtomicUsize,
        pub user_saves: AtomicUsize,
    }

    impl MemoryStorage {
        pub fn with_tasks(doc: TasksDocument) -> Self {
            Self {
                tasks: Mutex::new(doc),
                ..Self::default()
            }
        }

        pub fn task_save_count(&self) -> usize {
            self.task_saves.load(Ordering::SeqCst)
        }
    }

    impl Storage for MemoryStorage {
        fn load_tasks(&self) -> AppResult<TasksDocument> {
            Ok(self.tasks.lock().unwrap().clone())
        }

        fn save_tasks(&self, doc: &TasksDocument) -> AppResult<()> {
            self.task_saves.fetch_add(1, Ordering::SeqCst);
            *self.tasks.lock().unwrap() = doc.clone();
            Ok(())
        }

        fn load_users(&self) -> AppResult<UserMap> {
            Ok(self.users.lock().unwrap().clone())
        }

        fn save_users(&self, users: &UserMap) -> AppResult<()> {
            self.user_saves.fetch_add(1, Ordering::SeqCst);
            *self.users.lock().unwrap() = users.clone();
            Ok(())
        }
    }
}
