use serde::Deserialize;

use crate::insight::MessageContext;

// The signup page submits camelCase field names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub favorite_beach: String,
    #[serde(default)]
    pub terms: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckUsernameForm {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

// Partial task update; absent fields are left untouched.
#[derive(Debug, Deserialize, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub context: MessageContext,
    #[serde(default)]
    pub days_overdue: i64,
    #[serde(default = "default_task_count")]
    pub task_count: u64,
}

fn default_task_count() -> u64 {
    1
}
