//! Dashboard pages for signed-in users.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;

use crate::api::extractors::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    name: String,
    link_count: usize,
    total_clicks: i64,
}

/// One table row of the links page.
struct UrlRow {
    id: i64,
    short_url: String,
    original_url: String,
    click_count: i64,
    created_at: String,
    expires: String,
    expired: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "urls.html")]
struct UrlsTemplate {
    name: String,
    rows: Vec<UrlRow>,
}

/// Renders the dashboard home.
///
/// # Endpoint
///
/// `GET /dashboard`
pub async fn dashboard_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let links = state.link_service.list_by_owner(user.id).await?;

    Ok(DashboardTemplate {
        name: user.name,
        link_count: links.len(),
        total_clicks: links.iter().map(|entry| entry.link.click_count).sum(),
    })
}

/// Renders the user's links as a table.
///
/// # Endpoint
///
/// `GET /dashboard/urls`
pub async fn urls_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let rows = state
        .link_service
        .list_by_owner(user.id)
        .await?
        .into_iter()
        .map(|entry| {
            let link = entry.link;
            UrlRow {
                id: link.id,
                expired: link.is_expired_at(now),
                short_url: link.shortened_url,
                original_url: link.original_url,
                click_count: link.click_count,
                created_at: link.created_at.format("%Y-%m-%d %H:%M").to_string(),
                expires: link
                    .expired_at
                    .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "never".to_string()),
            }
        })
        .collect();

    Ok(UrlsTemplate {
        name: user.name,
        rows,
    })
}
