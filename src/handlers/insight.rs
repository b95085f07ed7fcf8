use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tower_sessions::Session;

use crate::config::Config;
use crate::errors::AppResult;
use crate::handlers::session_user;
use crate::insight::{analysis, catalog};
use crate::models::MessageRequest;
use crate::services::StoreService;

pub async fn motivational_message(
    session: Session,
    Json(request): Json<MessageRequest>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let message = catalog::motivational_message(
        request.context,
        &username,
        request.days_overdue,
        request.task_count,
        &mut rand::thread_rng(),
    );
    Ok(Json(json!({ "message": message })).into_response())
}

pub async fn task_analysis(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let tasks = store.tasks_for(&username)?;
    let analysis = analysis::analyze(&tasks, &username, Utc::now());
    tracing::debug!(
        "Analyzed {} tasks for user {} ({}% complete)",
        analysis.total_tasks,
        username,
        analysis.completion_rate
    );
    Ok(Json(analysis).into_response())
}
