use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::handlers::SESSION_KEY;

const PUBLIC_PATHS: &[&str] = &[
    "/login",
    "/signup",
    "/api/login",
    "/api/signup",
    "/api/check-username",
];

pub async fn require_auth(session: Session, req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path();

    if PUBLIC_PATHS.contains(&path) || path.starts_with("/static") {
        return next.run(req).await;
    }

    match session.get::<String>(SESSION_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        _ => Redirect::to("/login").into_response(),
    }
}
