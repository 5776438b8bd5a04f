//! Handlers for short URL management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::api::dto::shorturl::{
    CreateShortUrlRequest, CreateShortUrlResponse, MessageResponse, ShortUrlListItem,
    ShortUrlListResponse,
};
use crate::api::extractors::{CurrentUser, MaybeUser};
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the session user.
///
/// # Endpoint
///
/// `POST /api/shorturl/create`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "example.com/a",
///   "customSlug": "promo",
///   "expiry": { "value": 3, "unit": "days" }
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed URL or slug
/// - 401 without a session (unless anonymous creation is enabled)
/// - 409 if the custom slug is taken
pub async fn create_handler(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<CreateShortUrlRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.is_none() && !state.allow_anonymous_create {
        return Err(AppError::unauthorized("Authentication required", json!({})));
    }

    if payload.original_url.trim().is_empty() {
        return Err(AppError::bad_request(
            "URL is required",
            json!({ "field": "originalUrl" }),
        ));
    }

    let link = state
        .link_service
        .create(CreateLink {
            original_url: payload.original_url,
            custom_slug: payload.custom_slug,
            expiry: payload.expiry.as_ref().and_then(|e| e.to_expiry()),
            owner_user_id: user.map(|u| u.id),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShortUrlResponse {
            success: true,
            message: "Short URL created".to_string(),
            short_url: link.into(),
        }),
    ))
}

/// Lists the session user's links with click history.
///
/// # Endpoint
///
/// `GET /api/shorturl/all`
pub async fn list_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ShortUrlListResponse>, AppError> {
    let now = Utc::now();
    let links = state.link_service.list_by_owner(user.id).await?;

    Ok(Json(ShortUrlListResponse {
        success: true,
        data: links
            .into_iter()
            .map(|entry| ShortUrlListItem::at(entry, now))
            .collect(),
    }))
}

/// Soft-deletes one of the session user's links.
///
/// # Endpoint
///
/// `DELETE /api/shorturl/delete/{id}`
///
/// # Errors
///
/// - 400 if `id` is not a number
/// - 404 if the link does not exist, is deleted, or belongs to someone else
pub async fn delete_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::bad_request("Invalid id", json!({ "id": id })))?;

    state.link_service.soft_delete(id, Some(user.id)).await?;

    Ok(Json(MessageResponse::ok("Short URL deleted")))
}
