pub mod auth;
pub mod content;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod session;
pub mod squiggs;
pub mod views;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Every route of the app. Static assets and transport layers are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(views::index))
        .route("/health", get(health))
        .route("/api/signup", post(auth::sign_up))
        .route("/api/signin", post(auth::sign_in))
        .route("/api/signout", post(auth::sign_out))
        .route("/api/squiggs/top", get(squiggs::top_squiggs))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/squiggs", post(squiggs::create_squigg))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> &'static str {
    "ok"
}
