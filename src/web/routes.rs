//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    dashboard_handler, home_handler, learn_more_handler, login_page_handler, not_found_handler,
    register_page_handler, urls_handler, verify_email_page_handler,
};
use axum::{Router, routing::get};

/// Pages anyone may open.
///
/// # Endpoints
///
/// - `GET /`              - Landing page
/// - `GET /login`         - Login form
/// - `GET /register`      - Registration form
/// - `GET /learn-more`    - Product description
/// - `GET /not-found`     - Target of unknown short codes (404)
/// - `GET /verify-email`  - Landing page of the verification email link
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_page_handler))
        .route("/register", get(register_page_handler))
        .route("/learn-more", get(learn_more_handler))
        .route("/not-found", get(not_found_handler))
        .route("/verify-email", get(verify_email_page_handler))
}

/// Pages behind a session, nested under `/dashboard`.
///
/// # Endpoints
///
/// - `GET /`     - Dashboard home with link count
/// - `GET /urls` - The user's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/urls", get(urls_handler))
}
