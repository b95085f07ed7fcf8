use serde::{Deserialize, Serialize};

use crate::models::{first_registered, Task, UserMap};

/// Version written to every persisted tasks document.
pub const SCHEMA_VERSION: u32 = 1;

/// Owner assigned to legacy tasks when no user has ever registered.
pub const FALLBACK_OWNER: &str = "admin";

/// The persisted tasks document. Documents written before versioning existed
/// are bare JSON arrays; those load as version 0 and migrate in place.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TasksDocument {
    pub schema_version: u32,
    pub tasks: Vec<Task>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TasksOnDisk {
    Versioned(TasksDocument),
    Legacy(Vec<Task>),
}

impl TasksDocument {
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tasks: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<TasksOnDisk>(raw)? {
            TasksOnDisk::Versioned(doc) => doc,
            TasksOnDisk::Legacy(tasks) => Self {
                schema_version: 0,
                tasks,
            },
        })
    }
}

impl Default for TasksDocument {
    fn default() -> Self {
        Self::empty()
    }
}

struct Migration {
    name: &'static str,
    apply: fn(&mut Vec<Task>, &UserMap) -> bool,
}

// Ordered pipeline; every step must be idempotent.
const MIGRATIONS: &[Migration] = &[Migration {
    name: "assign-missing-owner",
    apply: assign_missing_owner,
}];

/// Run the migration pipeline over a freshly loaded document. Returns true
/// when the document changed and must be persisted. Steps run on every load
/// so the ownership invariant holds even for documents stamped with the
/// current version; a clean document reports no change and triggers no write.
pub fn run(doc: &mut TasksDocument, users: &UserMap) -> bool {
    let mut changed = doc.schema_version < SCHEMA_VERSION;
    for migration in MIGRATIONS {
        if (migration.apply)(&mut doc.tasks, users) {
            tracing::info!("Applied task migration: {}", migration.name);
            changed = true;
        }
    }
    doc.schema_version = SCHEMA_VERSION;
    changed
}

/// The owner every legacy task is assigned to: the first user ever
/// registered, or a fixed literal when the user collection is empty.
pub fn fallback_owner(users: &UserMap) -> String {
    first_registered(users)
        .unwrap_or(FALLBACK_OWNER)
        .to_string()
}

fn assign_missing_owner(tasks: &mut Vec<Task>, users: &UserMap) -> bool {
    if tasks.iter().all(|task| !task.user_id.is_empty()) {
        return false;
    }
    let owner = fallback_owner(users);
    let mut assigned = 0usize;
    for task in tasks.iter_mut() {
        if task.user_id.is_empty() {
            task.user_id = owner.clone();
            assigned += 1;
        }
    }
    tracing::info!("Assigned {} legacy tasks to {}", assigned, owner);
    assigned > 0
}
