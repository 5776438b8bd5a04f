//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::extractors::ClientMeta;
use crate::application::services::{Resolution, Visitor};
use crate::error::AppError;
use crate::state::AppState;

const NOT_FOUND_PAGE: &str = "/not-found";

/// Resolves a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}` and `GET /api/shorturl/redirect/{code}`
///
/// # Responses
///
/// - **301** to the destination, with caching disabled for browsers and
///   intermediaries so every visit reaches the server and is counted
/// - **302** to `/not-found` for unknown or deleted codes
/// - **410** for expired links
/// - **500** if the stored destination is corrupt
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ClientMeta {
        ip_address,
        user_agent,
    }: ClientMeta,
) -> Result<Response, AppError> {
    let visitor = Visitor {
        ip_address,
        user_agent,
    };

    match state.redirect_service.resolve(&code, visitor).await? {
        Resolution::Redirect { destination, .. } => {
            let location = location_header(&destination)?;
            Ok((StatusCode::MOVED_PERMANENTLY, no_store_headers(location)).into_response())
        }
        Resolution::NotFound => Ok((
            StatusCode::FOUND,
            [(header::LOCATION, HeaderValue::from_static(NOT_FOUND_PAGE))],
        )
            .into_response()),
        Resolution::Expired { expired_at } => Err(AppError::gone(
            "This short link has expired",
            json!({ "code": code, "expiredAt": expired_at }),
        )),
    }
}

/// `destination` is the URL's ASCII serialization. Anything else would go out
/// as raw bytes, so it is refused.
fn location_header(destination: &str) -> Result<HeaderValue, AppError> {
    destination
        .is_ascii()
        .then(|| HeaderValue::from_str(destination).ok())
        .flatten()
        .ok_or_else(|| {
            AppError::internal(
                "Destination cannot be sent as a Location header",
                json!({ "destination": destination }),
            )
        })
}

fn no_store_headers(location: HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, location);
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        HeaderName::from_static("cdn-cache-control"),
        HeaderValue::from_static("no-store"),
    );
    headers.insert(
        HeaderName::from_static("surrogate-control"),
        HeaderValue::from_static("no-store"),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_store_headers() {
        let headers = no_store_headers(HeaderValue::from_static("https://example.com/a"));

        assert_eq!(headers[header::LOCATION], "https://example.com/a");
        assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("no-store"));
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "0");
        assert_eq!(headers["cdn-cache-control"], "no-store");
    }

    #[test]
    fn test_location_keeps_ascii_destination_verbatim() {
        assert_eq!(
            location_header("https://example.com/a?b=c").unwrap(),
            "https://example.com/a?b=c"
        );
    }

    #[test]
    fn test_location_refuses_raw_unicode() {
        let err = location_header("https://example.com/caf\u{e9}").unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
