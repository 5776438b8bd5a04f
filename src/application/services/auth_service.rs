//! Account registration, credential checks and email verification.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::application::services::verification::VerificationSigner;
use crate::domain::entities::{NewUser, User};
use crate::domain::mailer::Mailer;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::store_call::bounded;

/// Hash checked against when the email is unknown, so both rejection paths
/// pay the same Argon2 cost.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("unknown-account-placeholder").ok());

/// Input for [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Outcome of [`AuthService::verify_email`].
#[derive(Debug, Clone)]
pub enum EmailVerification {
    Verified(User),
    AlreadyVerified(User),
}

/// Service for user accounts.
///
/// Passwords are stored as Argon2id PHC strings. Verification tokens are
/// stateless HMAC-signed claims (see [`VerificationSigner`]); delivery goes
/// through the injected [`Mailer`] and never decides the outcome of the
/// calling operation.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    signer: VerificationSigner,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        signer: VerificationSigner,
        store_timeout: Duration,
    ) -> Self {
        Self {
            users,
            mailer,
            signer,
            store_timeout,
        }
    }

    /// Registers a new user and sends a verification email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the email is already registered.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let (user, _delivery) = self.register_and_notify(registration).await?;
        Ok(user)
    }

    /// Same as [`register`](Self::register), also handing back the detached
    /// verification email delivery.
    pub async fn register_and_notify(
        &self,
        registration: Registration,
    ) -> Result<(User, Option<JoinHandle<()>>), AppError> {
        let email = normalize_email(&registration.email);

        if self.find_by_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let new_user = NewUser {
            name: registration.name.trim().to_string(),
            email: email.clone(),
            password_hash: hash_password(&registration.password)?,
            email_verified_at: None,
        };

        let created = bounded(self.store_timeout, "user.create", self.users.create(new_user)).await;
        let user = match created {
            Ok(user) => user,
            Err(AppError::Conflict { .. }) => return Err(email_taken(&email)),
            Err(e) => return Err(e),
        };

        tracing::info!(user_id = user.id, "User registered");
        let delivery = self.spawn_verification(&user);

        Ok((user, delivery))
    }

    /// Checks credentials.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password", json!({}));

        let Some(user) = self.find_by_email(&normalize_email(email)).await? else {
            if let Some(dummy) = DUMMY_PASSWORD_HASH.as_deref() {
                verify_password(password, dummy)?;
            }
            return Err(invalid());
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid());
        }

        Ok(user)
    }

    /// Marks the token's user as verified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad or expired token, or when the
    /// token names a user that no longer exists.
    pub async fn verify_email(&self, token: &str) -> Result<EmailVerification, AppError> {
        let claims = self.signer.verify(token)?;

        let user = bounded(
            self.store_timeout,
            "user.find_by_id",
            self.users.find_by_id(claims.user_id),
        )
        .await?
        .filter(|user| user.email == claims.email)
        .ok_or_else(|| {
            AppError::bad_request(
                "Invalid or expired verification token",
                json!({ "reason": "unknown user" }),
            )
        })?;

        if user.is_verified() {
            return Ok(EmailVerification::AlreadyVerified(user));
        }

        let now = Utc::now();
        bounded(
            self.store_timeout,
            "user.mark_email_verified",
            self.users.mark_email_verified(user.id, now),
        )
        .await?;

        tracing::info!(user_id = user.id, "Email verified");
        Ok(EmailVerification::Verified(User {
            email_verified_at: Some(now),
            ..user
        }))
    }

    /// Issues a fresh verification token for an unverified account.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown email
    /// - [`AppError::Validation`] if the account is already verified
    /// - [`AppError::Internal`] if the mailer reports failure or does not
    ///   answer within the store timeout
    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Email is not registered", json!({ "email": email }))
            })?;

        if user.is_verified() {
            return Err(AppError::bad_request("Email is already verified", json!({})));
        }

        let token = self.signer.issue(user.id, &user.email)?;
        bounded(
            self.store_timeout,
            "mailer.send_verification",
            self.mailer.send_verification(&user.email, &user.name, &token),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        bounded(self.store_timeout, "user.find_by_email", self.users.find_by_email(email)).await
    }

    fn spawn_verification(&self, user: &User) -> Option<JoinHandle<()>> {
        let token = match self.signer.issue(user.id, &user.email) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(
                    user_id = user.id,
                    error = %e,
                    "Failed to issue verification token"
                );
                return None;
            }
        };

        let mailer = Arc::clone(&self.mailer);
        let (user_id, email, name) = (user.id, user.email.clone(), user.name.clone());
        Some(tokio::spawn(async move {
            if let Err(e) = mailer.send_verification(&email, &name, &token).await {
                tracing::warn!(user_id, error = %e, "Verification email was not sent");
            }
        }))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(email: &str) -> AppError {
    AppError::bad_request("Email is already registered", json!({ "email": email }))
}
