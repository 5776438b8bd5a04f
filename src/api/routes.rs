//! API route configuration.
//!
//! Authentication is enforced once for the whole application by
//! [`crate::api::middleware::auth_gate`]; these routers only map paths.

use crate::api::handlers::{
    create_handler, current_user_handler, delete_handler, list_handler, login_handler,
    logout_handler, redirect_handler, register_handler, resend_verification_handler,
    verify_email_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Account routes, nested under `/api/auth`.
///
/// # Endpoints
///
/// - `POST /register`            - Create an account
/// - `POST /login`               - Open a session
/// - `POST /logout`              - Close the session
/// - `GET  /user`                - Current session user
/// - `POST /verify-email`        - Confirm an email address
/// - `POST /resend-verification` - Send a new verification email
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/user", get(current_user_handler))
        .route("/verify-email", post(verify_email_handler))
        .route("/resend-verification", post(resend_verification_handler))
}

/// Short URL routes, nested under `/api/shorturl`.
///
/// # Endpoints
///
/// - `POST   /create`          - Create a short link
/// - `GET    /all`             - List own links
/// - `DELETE /delete/{id}`     - Soft-delete an own link
/// - `GET    /redirect/{code}` - Resolve a short code
pub fn shorturl_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_handler))
        .route("/all", get(list_handler))
        .route("/delete/{id}", delete(delete_handler))
        .route("/redirect/{code}", get(redirect_handler))
}
