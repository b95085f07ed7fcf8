use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::handlers::session_user;
use crate::insight::analysis::TaskStats;
use crate::services::StoreService;

pub async fn serve_profile_page(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    tracing::info!("Serving profile for user: {}", username);

    let user = store
        .get_user(&username)?
        .ok_or_else(|| AppError::Auth("User not found".into()))?;
    let tasks = store.tasks_for(&username)?;
    let stats = TaskStats::from_tasks(&tasks);

    let profile_html = std::fs::read_to_string("templates/profile.html").map_err(|e| {
        tracing::error!("Failed to read profile template: {}", e);
        AppError::Storage(e)
    })?;

    let profile_html = profile_html
        .replace("{{username}}", &username)
        .replace("{{email}}", &user.email)
        .replace("{{favorite_beach}}", &user.favorite_beach)
        .replace(
            "{{member_since}}",
            &user.created_at.format("%Y-%m-%d").to_string(),
        )
        .replace(
            "{{last_login}}",
            &user.last_login.map_or("First visit".to_string(), |t| {
                t.format("%Y-%m-%d %H:%M").to_string()
            }),
        )
        .replace("{{total_tasks}}", &stats.total_tasks.to_string())
        .replace("{{completed_tasks}}", &stats.completed_tasks.to_string())
        .replace("{{pending_tasks}}", &stats.pending_tasks.to_string())
        .replace("{{completion_rate}}", &stats.completion_rate.to_string());

    Ok(Html(profile_html).into_response())
}
