use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::config::Config;
use crate::errors::AppResult;
use crate::handlers::session_user;
use crate::models::{NewTaskForm, TaskChanges};
use crate::services::StoreService;

pub async fn get_tasks(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let tasks = store.tasks_for(&username)?;
    tracing::debug!("Listing {} tasks for user {}", tasks.len(), username);
    Ok(Json(tasks).into_response())
}

pub async fn create_task(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
    Json(form): Json<NewTaskForm>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let task = store.create_task(&username, form)?;
    tracing::info!("Created task {} for user {}", task.id, username);
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

pub async fn update_task(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
    Path(task_id): Path<String>,
    Json(changes): Json<TaskChanges>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let task = store.update_task(&username, &task_id, &changes)?;
    tracing::info!("Updated task {} for user {}", task_id, username);
    Ok(Json(task).into_response())
}

pub async fn delete_task(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
    Path(task_id): Path<String>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    store.delete_task(&username, &task_id)?;
    tracing::info!("Deleted task {} for user {}", task_id, username);
    Ok(Json(json!({ "success": true })).into_response())
}

pub async fn get_calendar_tasks(
    State((store, _)): State<(StoreService, Config)>,
    session: Session,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let tasks = store.tasks_for_month(&username, year, month)?;
    tracing::debug!(
        "Calendar {}-{:02} has {} tasks for user {}",
        year,
        month,
        tasks.len(),
        username
    );
    Ok(Json(tasks).into_response())
}
