//! Landing page for the link in the verification email.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::application::services::EmailVerification;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    #[serde(default)]
    token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "verify_email.html")]
struct VerifyEmailTemplate {
    verified: bool,
    message: String,
}

/// Confirms the address and renders the outcome.
///
/// # Endpoint
///
/// `GET /verify-email?token=...`
///
/// Answers 200 when the address is (or already was) verified, 400 otherwise.
pub async fn verify_email_page_handler(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> impl IntoResponse {
    let outcome = if query.token.is_empty() {
        Err("Verification token is missing".to_string())
    } else {
        state
            .auth_service
            .verify_email(&query.token)
            .await
            .map_err(|e| match e {
                AppError::Internal { message, .. } => {
                    tracing::error!(%message, "Email verification page failed");
                    "Verification failed, please try again".to_string()
                }
                e => e.to_string(),
            })
    };

    match outcome {
        Ok(EmailVerification::Verified(user)) => (
            StatusCode::OK,
            VerifyEmailTemplate {
                verified: true,
                message: format!("Thanks {}, your email is verified.", user.name),
            },
        ),
        Ok(EmailVerification::AlreadyVerified(_)) => (
            StatusCode::OK,
            VerifyEmailTemplate {
                verified: true,
                message: "Your email was already verified.".to_string(),
            },
        ),
        Err(message) => (
            StatusCode::BAD_REQUEST,
            VerifyEmailTemplate {
                verified: false,
                message,
            },
        ),
    }
}
