mod auth;
mod insight;
mod profile;
mod task;

pub use auth::{
    api_check_username, api_login, api_signup, handle_logout, serve_index_page, serve_login_page,
    serve_signup_page,
};
pub use insight::{motivational_message, task_analysis};
pub use profile::serve_profile_page;
pub use task::{create_task, delete_task, get_calendar_tasks, get_tasks, update_task};

use tower_sessions::Session;

use crate::errors::{AppError, AppResult};

pub(crate) const SESSION_KEY: &str = "user_session";

// Caller identity as established by the session layer; handlers trust this
// value without re-validation.
pub(crate) async fn session_user(session: &Session) -> AppResult<String> {
    session
        .get::<String>(SESSION_KEY)
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?
        .ok_or_else(|| AppError::Auth("Not authenticated".into()))
}
