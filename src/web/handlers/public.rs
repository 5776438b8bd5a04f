//! Static public pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
struct HomeTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
struct RegisterTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "learn_more.html")]
struct LearnMoreTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {}

/// `GET /`
pub async fn home_handler() -> impl IntoResponse {
    HomeTemplate {}
}

/// `GET /login`
pub async fn login_page_handler() -> impl IntoResponse {
    LoginTemplate {}
}

/// `GET /register`
pub async fn register_page_handler() -> impl IntoResponse {
    RegisterTemplate {}
}

/// `GET /learn-more`
pub async fn learn_more_handler() -> impl IntoResponse {
    LearnMoreTemplate {}
}

/// `GET /not-found`, also the router fallback. Always answers 404.
pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate {})
}
