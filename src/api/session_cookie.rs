//! The `sessionId` cookie.

use axum_extra::extract::cookie::{Cookie, SameSite};
use cookie::time::Duration;

use crate::domain::entities::SESSION_IDLE_TIMEOUT_SECS;

pub const SESSION_COOKIE: &str = "sessionId";

/// Cookie carrying a session id: HttpOnly, SameSite=Lax, 7-day Max-Age,
/// `Path=/`, and `Secure` when `secure` is set.
pub fn session_cookie(session_id: impl Into<String>, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.into()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(SESSION_IDLE_TIMEOUT_SECS))
        .path("/")
        .build()
}

/// Cookie to pass to `CookieJar::remove` so the browser drops the session.
pub fn session_removal() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
