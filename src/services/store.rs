use std::sync::{Arc, Mutex, PoisonError};

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;

use crate::errors::{AppError, AppResult};
use crate::models::{NewTaskForm, Task, TaskChanges, User};
use crate::services::migrations::{self, TasksDocument, SCHEMA_VERSION};
use crate::services::Storage;

/// Front door to the two JSON documents. Every operation is scoped to the
/// caller's identity and every load-mutate-save cycle runs under a single
/// writer lock, so concurrent requests cannot silently drop each other's
/// writes.
#[derive(Clone)]
pub struct StoreService {
    storage: Arc<dyn Storage>,
    write_lock: Arc<Mutex<()>>,
}

impl StoreService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Loads the task collection and runs the migration pipeline eagerly,
    // persisting at most once. Callers must hold the write lock.
    fn load_tasks_locked(&self) -> AppResult<Vec<Task>> {
        let mut doc = self.storage.load_tasks()?;
        let needs_migration = doc.schema_version < SCHEMA_VERSION
            || doc.tasks.iter().any(|task| task.user_id.is_empty());
        if needs_migration {
            let users = self.storage.load_users()?;
            if migrations::run(&mut doc, &users) {
                self.storage.save_tasks(&doc)?;
                tracing::info!("Task document migrated to version {}", doc.schema_version);
            }
        }
        Ok(doc.tasks)
    }

    fn save_tasks_locked(&self, tasks: Vec<Task>) -> AppResult<()> {
        self.storage.save_tasks(&TasksDocument {
            schema_version: SCHEMA_VERSION,
            tasks,
        })
    }

    /// All tasks belonging to the caller, in stored order.
    pub fn tasks_for(&self, owner: &str) -> AppResult<Vec<Task>> {
        let _guard = self.guard();
        let tasks = self.load_tasks_locked()?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.user_id == owner)
            .collect())
    }

    /// The caller's tasks whose due date falls inside the given month.
    pub fn tasks_for_month(&self, owner: &str, year: i32, month: u32) -> AppResult<Vec<Task>> {
        let tasks = self.tasks_for(owner)?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.due_in_month(year, month))
            .collect())
    }

    pub fn create_task(&self, owner: &str, form: NewTaskForm) -> AppResult<Task> {
        let _guard = self.guard();
        let mut tasks = self.load_tasks_locked()?;
        let task = Task::new(owner.to_string(), form.title, form.description, form.due_date);
        tasks.push(task.clone());
        self.save_tasks_locked(tasks)?;
        Ok(task)
    }

    /// Apply a partial update to one of the caller's tasks. An id that exists
    /// but belongs to someone else is indistinguishable from a missing id.
    pub fn update_task(&self, owner: &str, task_id: &str, changes: &TaskChanges) -> AppResult<Task> {
        let _guard = self.guard();
        let mut tasks = self.load_tasks_locked()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id && task.user_id == owner)
            .ok_or(AppError::TaskNotFound)?;
        task.apply_changes(changes);
        let updated = task.clone();
        self.save_tasks_locked(tasks)?;
        Ok(updated)
    }

    pub fn delete_task(&self, owner: &str, task_id: &str) -> AppResult<()> {
        let _guard = self.guard();
        let mut tasks = self.load_tasks_locked()?;
        let before = tasks.len();
        tasks.retain(|task| !(task.id == task_id && task.user_id == owner));
        if tasks.len() == before {
            return Err(AppError::TaskNotFound);
        }
        self.save_tasks_locked(tasks)?;
        Ok(())
    }

    /// Register a new account. Duplicate usernames and duplicate emails are
    /// rejected distinctly and leave the collection unchanged.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        favorite_beach: &str,
    ) -> AppResult<()> {
        let _guard = self.guard();
        let mut users = self.storage.load_users()?;

        if users.contains_key(username) {
            return Err(AppError::DuplicateUsername(username.to_string()));
        }
        if users.values().any(|user| user.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash(password.as_bytes(), DEFAULT_COST)?;
        users.insert(
            username.to_string(),
            User {
                email: email.to_string(),
                password_hash,
                favorite_beach: favorite_beach.to_string(),
                created_at: Utc::now(),
                last_login: None,
            },
        );
        self.storage.save_users(&users)?;
        tracing::info!("Registered new user: {}", username);
        Ok(())
    }

    /// Verify credentials, stamping the last-login timestamp on success.
    /// Unknown usernames and wrong passwords both come back as None.
    pub fn login(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let _guard = self.guard();
        let mut users = self.storage.load_users()?;
        let Some(user) = users.get_mut(username) else {
            return Ok(None);
        };
        if !verify(password.as_bytes(), &user.password_hash)? {
            return Ok(None);
        }
        user.last_login = Some(Utc::now());
        let logged_in = user.clone();
        self.storage.save_users(&users)?;
        Ok(Some(logged_in))
    }

    pub fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        let _guard = self.guard();
        Ok(self.storage.load_users()?.get(username).cloned())
    }

    pub fn username_available(&self, username: &str) -> AppResult<bool> {
        let _guard = self.guard();
        Ok(!self.storage.load_users()?.contains_key(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::migrations::TasksDocument;
    use crate::services::storage::memory::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn service_with(storage: MemoryStorage) -> (StoreService, Arc<MemoryStorage>) {
        let storage = Arc::new(storage);
        (StoreService::new(storage.clone()), storage)
    }

    fn legacy_task(id: &str, user_id: &str) -> Task {
        Task {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            due_date: None,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn seeded_user(ts: i64) -> User {
        User {
            email: format!("u{}@example.com", ts),
            password_hash: "hash".to_string(),
            favorite_beach: "sandy".to_string(),
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
            last_login: None,
        }
    }

    #[test]
    fn test_load_migrates_ownerless_tasks_with_one_write() {
        let storage = MemoryStorage::with_tasks(TasksDocument {
            schema_version: 0,
            tasks: vec![legacy_task("t1", ""), legacy_task("t2", "bob")],
        });
        storage
            .users
            .lock()
            .unwrap()
            .insert("alice".to_string(), seeded_user(100));
        storage
            .users
            .lock()
            .unwrap()
            .insert("bob".to_string(), seeded_user(200));
        let (service, storage) = service_with(storage);

        let tasks = service.tasks_for("alice").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
        assert_eq!(storage.task_save_count(), 1);

        // Every task now has an owner and a second load performs no write.
        let all = storage.tasks.lock().unwrap().clone();
        assert!(all.tasks.iter().all(|t| !t.user_id.is_empty()));
        service.tasks_for("alice").unwrap();
        assert_eq!(storage.task_save_count(), 1);
    }

    #[test]
    fn test_migration_without_users_assigns_admin() {
        let storage = MemoryStorage::with_tasks(TasksDocument {
            schema_version: 0,
            tasks: vec![legacy_task("t1", "")],
        });
        let (service, storage) = service_with(storage);

        let tasks = service.tasks_for("admin").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(storage.task_save_count(), 1);
    }

    #[test]
    fn test_clean_document_loads_without_write() {
        let storage = MemoryStorage::with_tasks(TasksDocument {
            schema_version: crate::services::SCHEMA_VERSION,
            tasks: vec![legacy_task("t1", "alice")],
        });
        let (service, storage) = service_with(storage);

        service.tasks_for("alice").unwrap();
        assert_eq!(storage.task_save_count(), 0);
    }

    #[test]
    fn test_ownership_filter_preserves_order_without_leakage() {
        let storage = MemoryStorage::with_tasks(TasksDocument {
            schema_version: crate::services::SCHEMA_VERSION,
            tasks: vec![
                legacy_task("t1", "alice"),
                legacy_task("t2", "bob"),
                legacy_task("t3", "alice"),
                legacy_task("t4", "alice"),
            ],
        });
        let (service, _) = service_with(storage);

        let tasks = service.tasks_for("alice").unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t3", "t4"]);
        assert!(tasks.iter().all(|t| t.user_id == "alice"));
    }

    #[test]
    fn test_foreign_task_behaves_like_missing_task() {
        let storage = MemoryStorage::with_tasks(TasksDocument {
            schema_version: crate::services::SCHEMA_VERSION,
            tasks: vec![legacy_task("t1", "bob")],
        });
        let (service, _) = service_with(storage);

        let foreign = service.delete_task("alice", "t1");
        let missing = service.delete_task("alice", "no-such-task");
        assert!(matches!(foreign, Err(AppError::TaskNotFound)));
        assert!(matches!(missing, Err(AppError::TaskNotFound)));

        let foreign_update = service.update_task("alice", "t1", &TaskChanges::default());
        assert!(matches!(foreign_update, Err(AppError::TaskNotFound)));
    }

    #[test]
    fn test_create_update_delete_cycle() {
        let (service, _) = service_with(MemoryStorage::default());

        let task = service
            .create_task(
                "alice",
                NewTaskForm {
                    title: "Surf".to_string(),
                    description: "Morning session".to_string(),
                    due_date: Some("2024-06-15".to_string()),
                },
            )
            .unwrap();

        let updated = service
            .update_task(
                "alice",
                &task.id,
                &TaskChanges {
                    completed: Some(true),
                    ..TaskChanges::default()
                },
            )
            .unwrap();
        assert!(updated.completed);
        let first_stamp = updated.completed_at;
        assert!(first_stamp.is_some());

        // Toggle off and back on; the first completion stamp survives.
        service
            .update_task(
                "alice",
                &task.id,
                &TaskChanges {
                    completed: Some(false),
                    ..TaskChanges::default()
                },
            )
            .unwrap();
        let again = service
            .update_task(
                "alice",
                &task.id,
                &TaskChanges {
                    completed: Some(true),
                    ..TaskChanges::default()
                },
            )
            .unwrap();
        assert_eq!(again.completed_at, first_stamp);

        service.delete_task("alice", &task.id).unwrap();
        assert!(service.tasks_for("alice").unwrap().is_empty());
    }

    #[test]
    fn test_tasks_for_month() {
        let (service, _) = service_with(MemoryStorage::default());
        for (title, due) in [
            ("june date", Some("2024-06-15")),
            ("june datetime", Some("2024-06-01T09:30:00Z")),
            ("july", Some("2024-07-02")),
            ("no due date", None),
        ] {
            service
                .create_task(
                    "alice",
                    NewTaskForm {
                        title: title.to_string(),
                        description: String::new(),
                        due_date: due.map(str::to_string),
                    },
                )
                .unwrap();
        }

        let june = service.tasks_for_month("alice", 2024, 6).unwrap();
        let titles: Vec<&str> = june.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["june date", "june datetime"]);
    }

    #[test]
    fn test_duplicate_signups_leave_collection_unchanged() {
        let (service, storage) = service_with(MemoryStorage::default());

        service
            .create_user("alice", "alice@example.com", "wavesofjoy", "rocky")
            .unwrap();

        let dup_name = service.create_user("alice", "other@example.com", "password1", "sandy");
        assert!(matches!(dup_name, Err(AppError::DuplicateUsername(name)) if name == "alice"));

        let dup_email = service.create_user("bob", "alice@example.com", "password1", "sandy");
        assert!(matches!(dup_email, Err(AppError::DuplicateEmail)));

        let users = storage.users.lock().unwrap().clone();
        assert_eq!(users.len(), 1);
        assert!(users.contains_key("alice"));
    }

    #[test]
    fn test_login_stamps_last_login() {
        let (service, _) = service_with(MemoryStorage::default());
        service
            .create_user("alice", "alice@example.com", "wavesofjoy", "rocky")
            .unwrap();

        assert!(service.login("alice", "wrong-password").unwrap().is_none());
        assert!(service.login("nobody", "wavesofjoy").unwrap().is_none());

        let user = service.login("alice", "wavesofjoy").unwrap();
        assert!(user.is_some());
        assert!(user.unwrap().last_login.is_some());

        let stored = service.get_user("alice").unwrap().unwrap();
        assert!(stored.last_login.is_some());
    }
}
