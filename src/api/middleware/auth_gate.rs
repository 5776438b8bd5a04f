//! Session gate applied to every request.
//!
//! Each path falls into exactly one [`RouteClass`], checked in this order:
//!
//! 1. **Public** - pages and auth endpoints anyone may call, plus the
//!    redirect API prefix
//! 2. **Protected API** - link management and `/api/auth/user`
//! 3. **Protected page** - `/dashboard` and below
//! 4. **Short code** - a single segment of `[A-Za-z0-9_-]{1,12}`
//! 5. **Other** - everything else (e.g. `/health`, longer custom slugs)
//!
//! Only protected classes consult the session store. A failed check answers
//! 401 for APIs and redirects pages to `/login`; if the request carried a
//! session cookie, the response also clears it. Store errors count as
//! failures.

use std::sync::LazyLock;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use regex::Regex;
use serde_json::json;

use crate::api::extractors::CurrentUser;
use crate::api::session_cookie::{SESSION_COOKIE, session_cookie, session_removal};
use crate::application::services::SessionCheck;
use crate::error::AppError;
use crate::state::AppState;

const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/learn-more",
    "/not-found",
    "/verify-email",
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/logout",
    "/api/auth/verify-email",
    "/api/auth/resend-verification",
];

const PUBLIC_PREFIXES: &[&str] = &["/api/shorturl/redirect/"];

const PROTECTED_API_PATHS: &[&str] = &[
    "/api/shorturl/create",
    "/api/shorturl/all",
    "/api/auth/user",
];

const PROTECTED_API_PREFIXES: &[&str] = &["/api/shorturl/delete/"];

const ANONYMOUS_CREATE_PATH: &str = "/api/shorturl/create";

static SHORT_CODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9_-]{1,12}$").expect("valid short code regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    ProtectedApi,
    ProtectedPage,
    ShortCode,
    Other,
}

/// Classifies a request path. Trailing slashes are ignored.
pub fn classify(path: &str) -> RouteClass {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
    {
        return RouteClass::Public;
    }

    if PROTECTED_API_PATHS.contains(&path)
        || PROTECTED_API_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
    {
        return RouteClass::ProtectedApi;
    }

    if path == "/dashboard" || path.starts_with("/dashboard/") {
        return RouteClass::ProtectedPage;
    }

    if SHORT_CODE_PATH.is_match(path) {
        return RouteClass::ShortCode;
    }

    RouteClass::Other
}

/// Gate middleware. Install with `middleware::from_fn_with_state`.
pub async fn layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let class = classify(&path);

    if !matches!(class, RouteClass::ProtectedApi | RouteClass::ProtectedPage) {
        return next.run(req).await;
    }

    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let user = match &session_id {
        Some(id) => match state.session_service.validate(id).await {
            SessionCheck::Authenticated(user) => Some(user),
            SessionCheck::Unauthenticated(reason) => {
                tracing::debug!(%path, ?reason, "Session rejected");
                None
            }
        },
        None => None,
    };

    if let (Some(user), Some(id)) = (user, &session_id) {
        req.extensions_mut().insert(CurrentUser(user));
        let response = next.run(req).await;
        // Re-issued so the browser-side Max-Age slides with activity.
        return (
            jar.add(session_cookie(id.clone(), state.secure_cookies)),
            response,
        )
            .into_response();
    }

    let jar = if session_id.is_some() {
        jar.remove(session_removal())
    } else {
        jar
    };

    if state.allow_anonymous_create && path.trim_end_matches('/') == ANONYMOUS_CREATE_PATH {
        return (jar, next.run(req).await).into_response();
    }

    match class {
        RouteClass::ProtectedPage => (jar, Redirect::to("/login")).into_response(),
        _ => (
            jar,
            AppError::unauthorized("Authentication required", json!({})),
        )
            .into_response(),
    }
}
