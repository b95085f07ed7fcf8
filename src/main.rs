use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use ocean_tasks::{
    config::Config,
    handlers, middleware,
    services::{JsonFileStorage, StoreService},
};

#[tokio::main]
async fn main() {
    // Initialize basic tracing subscriber
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load().expect("Failed to load configuration");
    let config_state = config.clone();

    // Flat JSON document storage behind the store service
    let storage = Arc::new(JsonFileStorage::new(
        &config.storage.tasks_file,
        &config.storage.users_file,
    ));
    let store = StoreService::new(storage);

    // Session store setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(config.session.cookie_name.clone());

    // Create router with all routes
    let app = Router::new()
        // Page routes
        .route("/", get(handlers::serve_index_page))
        .route("/login", get(handlers::serve_login_page))
        .route("/signup", get(handlers::serve_signup_page))
        .route("/logout", get(handlers::handle_logout))
        .route("/profile", get(handlers::serve_profile_page))
        // Auth API
        .route("/api/signup", post(handlers::api_signup))
        .route("/api/login", post(handlers::api_login))
        .route("/api/check-username", post(handlers::api_check_username))
        // Task API
        .route("/api/tasks", get(handlers::get_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/:task_id",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/api/calendar/:year/:month", get(handlers::get_calendar_tasks))
        // Insight API
        .route("/api/motivational-message", post(handlers::motivational_message))
        .route("/api/task-analysis", post(handlers::task_analysis))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Add middleware
        .layer(from_fn(middleware::require_auth))
        .layer(session_layer)
        // Add state
        .with_state((store, config_state));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await
    .expect("Failed to bind server");

    tracing::info!(
        "Server running on {}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Failed to start server");
}
