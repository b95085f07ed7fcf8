use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use std::fs;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, Session};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::handlers::{session_user, SESSION_KEY};
use crate::models::{CheckUsernameForm, LoginForm, SignupForm};
use crate::services::StoreService;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub async fn serve_login_page(session: Session) -> Response {
    // Already-logged-in visitors go straight to their tasks.
    if let Ok(Some(_)) = session.get::<String>(SESSION_KEY).await {
        return Redirect::to("/").into_response();
    }
    let login_html = fs::read_to_string("templates/login.html")
        .unwrap_or_else(|_| "Error loading login page".to_string());
    Html(login_html).into_response()
}

pub async fn serve_signup_page(session: Session) -> Response {
    if let Ok(Some(_)) = session.get::<String>(SESSION_KEY).await {
        return Redirect::to("/").into_response();
    }
    let signup_html = fs::read_to_string("templates/signup.html")
        .unwrap_or_else(|_| "Error loading signup page".to_string());
    Html(signup_html).into_response()
}

pub async fn serve_index_page(session: Session) -> AppResult<Response> {
    let username = session_user(&session).await?;
    let index_html = fs::read_to_string("templates/index.html").map_err(|e| {
        tracing::error!("Failed to read index template: {}", e);
        AppError::Storage(e)
    })?;
    Ok(Html(index_html.replace("{{username}}", &username)).into_response())
}

#[axum::debug_handler]
pub async fn api_signup(
    State((store, _)): State<(StoreService, Config)>,
    Json(form): Json<SignupForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let email = form.email.trim();
    let password = form.password.trim();
    let confirm_password = form.confirm_password.trim();
    let favorite_beach = form.favorite_beach.trim();

    if [username, email, password, confirm_password, favorite_beach]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(AppError::Validation(
            "🐚 Please fill in all fields like completing a seashell collection!".into(),
        ));
    }
    if username.len() < 3 || username.len() > 20 {
        return Err(AppError::Validation(
            "🏄‍♀️ Your beach name should be 3-20 characters long!".into(),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "🐚 Beach names can only contain letters, numbers, and underscores!".into(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation(
            "📧 That email doesn't look quite right - check it like you'd check the tide chart!".into(),
        ));
    }
    if password.len() < 6 {
        return Err(AppError::Validation(
            "🔒 Your password should be at least 6 characters long!".into(),
        ));
    }
    if password != confirm_password {
        return Err(AppError::Validation(
            "🔐 Your passwords don't match like synchronized waves!".into(),
        ));
    }
    if !form.terms {
        return Err(AppError::Validation(
            "🏖️ Please agree to ride the waves responsibly!".into(),
        ));
    }

    store.create_user(username, email, password, favorite_beach)?;
    tracing::info!("Signup completed for user: {}", username);

    Ok(Json(json!({
        "message": format!("🌊 Welcome to the ocean, {}! Your beach paradise awaits!", username),
        "user": username,
    }))
    .into_response())
}

pub async fn api_check_username(
    State((store, _)): State<(StoreService, Config)>,
    Json(form): Json<CheckUsernameForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let available = !username.is_empty() && store.username_available(username)?;
    Ok(Json(json!({ "available": available })).into_response())
}

#[axum::debug_handler]
pub async fn api_login(
    State((store, config)): State<(StoreService, Config)>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let password = form.password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "🐚 Please provide both username and password!".into(),
        ));
    }

    let Some(user) = store.login(username, password)? else {
        tracing::info!("Failed login attempt for user: {}", username);
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "message": "🏖️ Invalid credentials. New to our ocean? Create an account to start your beach journey!"
            })),
        )
            .into_response());
    };

    session
        .insert(SESSION_KEY, username.to_string())
        .await
        .map_err(|e| AppError::Auth(format!("Session error: {}", e)))?;
    if form.remember {
        session.set_expiry(Some(Expiry::OnInactivity(Duration::days(
            config.session.remember_days,
        ))));
    }

    let time_greeting = time_greeting(username);
    tracing::info!("Login succeeded for user: {}", username);

    Ok(Json(json!({
        "message": format!(
            "🌊 Welcome back to your ocean of productivity, {}! {}",
            username, time_greeting
        ),
        "token": format!(
            "ocean_token_{}_{}",
            username,
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        ),
        "user": username,
        "time_greeting": time_greeting,
        "favorite_beach": user.favorite_beach,
    }))
    .into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(session: Session) -> Response {
    if let Err(e) = session.remove::<String>(SESSION_KEY).await {
        tracing::warn!("Session removal error: {}", e);
    }
    Redirect::to("/login").into_response()
}

fn time_greeting(username: &str) -> String {
    let now = Local::now();
    format!(
        "{}! ({})",
        greeting_for_hour(now.hour(), username),
        now.format("%I:%M %p")
    )
}

fn greeting_for_hour(hour: u32, username: &str) -> String {
    if hour < 6 {
        format!("🌙 Late night productivity, {}", username)
    } else if hour < 12 {
        format!("🌅 Good morning, {}", username)
    } else if hour < 17 {
        format!("☀️ Good afternoon, {}", username)
    } else if hour < 21 {
        format!("🌅 Good evening, {}", username)
    } else {
        format!("🌙 Good night, {}", username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_hour_boundaries() {
        assert!(greeting_for_hour(0, "a").contains("Late night"));
        assert!(greeting_for_hour(5, "a").contains("Late night"));
        assert!(greeting_for_hour(6, "a").contains("Good morning"));
        assert!(greeting_for_hour(11, "a").contains("Good morning"));
        assert!(greeting_for_hour(12, "a").contains("Good afternoon"));
        assert!(greeting_for_hour(16, "a").contains("Good afternoon"));
        assert!(greeting_for_hour(17, "a").contains("Good evening"));
        assert!(greeting_for_hour(20, "a").contains("Good evening"));
        assert!(greeting_for_hour(21, "a").contains("Good night"));
        assert!(greeting_for_hour(23, "a").contains("Good night"));
    }

    #[test]
    fn test_username_pattern() {
        assert!(USERNAME_RE.is_match("sandy_toes99"));
        assert!(!USERNAME_RE.is_match("sandy toes"));
        assert!(!USERNAME_RE.is_match("wave-rider"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL_RE.is_match("surf@example.com"));
        assert!(!EMAIL_RE.is_match("not-an-email"));
        assert!(!EMAIL_RE.is_match("two@at@signs"));
    }
}
