//! Top-level router configuration combining API and page routes.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /health`      - Store health check (public)
//! - `/api/auth/*`       - Accounts and sessions
//! - `/api/shorturl/*`   - Link management and redirect alias
//! - `/dashboard/*`      - Pages for signed-in users
//! - everything else     - Public pages, 404 fallback
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Auth gate** - Session check by route class, see [`crate::api::middleware::auth_gate`]
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth_gate, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::handlers::not_found_handler;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with the auth gate and tracing applied, without path
/// normalization.
pub fn app_routes(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/auth", api::routes::auth_routes())
        .nest("/shorturl", api::routes::shorturl_routes());

    Router::new()
        .merge(web::routes::public_routes())
        .nest("/dashboard", web::routes::protected_routes())
        .nest("/api", api_router)
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_gate::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing so `/dashboard/` and
/// `/dashboard` are the same page.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state))
}
