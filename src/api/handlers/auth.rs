//! Handlers for account endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, LoginRequest, RegisterRequest, ResendVerificationRequest, VerifyEmailRequest,
};
use crate::api::extractors::{ClientMeta, CurrentUser};
use crate::api::session_cookie::{SESSION_COOKIE, session_cookie, session_removal};
use crate::application::services::EmailVerification;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and triggers the verification email.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// Returns 400 for invalid input or an already registered email.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = state.auth_service.register(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::with_user(
            "Registration successful. Please check your email to verify your account.",
            user,
        )),
    ))
}

/// Checks credentials and opens a session.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// On success sets the `sessionId` cookie.
///
/// # Errors
///
/// - 400 if email or password is missing
/// - 401 for an unknown email or wrong password
pub async fn login_handler(
    State(state): State<AppState>,
    ClientMeta {
        ip_address,
        user_agent,
    }: ClientMeta,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let session = state
        .session_service
        .create(user.id, ip_address, user_agent)
        .await?;

    Ok((
        jar.add(session_cookie(session.id, state.secure_cookies)),
        Json(AuthResponse::with_user("Login successful", user)),
    ))
}

/// Ends the current session, if any.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// Always answers 200 and clears the cookie. A failed session delete is
/// logged only.
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.session_service.destroy(cookie.value()).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    (jar.remove(session_removal()), Json(AuthResponse::message("Logout successful")))
}

/// Returns the session user.
///
/// # Endpoint
///
/// `GET /api/auth/user`
pub async fn current_user_handler(CurrentUser(user): CurrentUser) -> Json<AuthResponse> {
    Json(AuthResponse::with_user("Authenticated", user))
}

/// Confirms an email address from a signed token.
///
/// # Endpoint
///
/// `POST /api/auth/verify-email`
///
/// # Errors
///
/// Returns 400 for a bad, expired or orphaned token.
pub async fn verify_email_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = match state.auth_service.verify_email(&payload.token).await? {
        EmailVerification::Verified(user) => {
            AuthResponse::with_user("Email verified successfully", user)
        }
        EmailVerification::AlreadyVerified(user) => {
            AuthResponse::with_user("Email is already verified", user)
        }
    };

    Ok(Json(response))
}

/// Sends a fresh verification email.
///
/// # Endpoint
///
/// `POST /api/auth/resend-verification`
///
/// # Errors
///
/// - 404 if the email is not registered
/// - 400 if it is already verified
pub async fn resend_verification_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .resend_verification(&payload.email)
        .await?;

    Ok(Json(AuthResponse::message("Verification email sent")))
}
