//! Login sessions with a 7-day sliding idle window.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::json;

use crate::domain::entities::{Session, User, session_idle_timeout};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::store_call::bounded;

/// Random bytes per session id (256 bits).
const SESSION_ID_BYTES: usize = 32;

/// Why a session did not authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Unknown,
    IdleExpired,
    UserMissing,
    StoreError,
}

/// Result of [`SessionService::validate`].
#[derive(Debug, Clone)]
pub enum SessionCheck {
    Authenticated(User),
    Unauthenticated(Rejection),
}

impl SessionCheck {
    pub fn into_user(self) -> Option<User> {
        match self {
            SessionCheck::Authenticated(user) => Some(user),
            SessionCheck::Unauthenticated(_) => None,
        }
    }
}

/// Generates a URL-safe session id from 32 OS-random bytes (43 characters).
pub fn generate_session_id() -> Result<String, AppError> {
    let mut buffer = [0u8; SESSION_ID_BYTES];
    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal("Failed to generate session id", json!({ "reason": e.to_string() }))
    })?;

    Ok(URL_SAFE_NO_PAD.encode(buffer))
}

pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserRepository>,
    store_timeout: Duration,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserRepository>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            users,
            store_timeout,
        }
    }

    /// Opens a session for `user_id`.
    pub async fn create(
        &self,
        user_id: i64,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<Session, AppError> {
        let now = Utc::now();
        let session = Session {
            id: generate_session_id()?,
            user_id,
            created_at: now,
            last_activity: now,
            ip_address,
            user_agent,
        };

        bounded(
            self.store_timeout,
            "session.create",
            self.sessions.create(session.clone()),
        )
        .await?;

        tracing::info!(user_id, "Session created");
        Ok(session)
    }

    pub async fn validate(&self, session_id: &str) -> SessionCheck {
        self.validate_at(session_id, Utc::now()).await
    }

    /// Validates a session as of `now`.
    ///
    /// Idle-expired sessions are deleted. Valid sessions have their
    /// `last_activity` moved to `now`. Store failures reject the session.
    pub async fn validate_at(&self, session_id: &str, now: DateTime<Utc>) -> SessionCheck {
        let found = bounded(
            self.store_timeout,
            "session.find",
            self.sessions.find(session_id),
        )
        .await;

        let session = match found {
            Ok(Some(session)) => session,
            Ok(None) => return SessionCheck::Unauthenticated(Rejection::Unknown),
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, treating as unauthenticated");
                return SessionCheck::Unauthenticated(Rejection::StoreError);
            }
        };

        if session.is_idle_expired_at(now) {
            let deleted = bounded(
                self.store_timeout,
                "session.delete",
                self.sessions.delete(session_id),
            )
            .await;
            if let Err(e) = deleted {
                tracing::warn!(error = %e, "Failed to delete expired session");
            }
            counter!("sessions_expired_total").increment(1);
            tracing::info!(user_id = session.user_id, "Session expired");
            return SessionCheck::Unauthenticated(Rejection::IdleExpired);
        }

        let touched = bounded(
            self.store_timeout,
            "session.touch",
            self.sessions.touch(session_id, now),
        )
        .await;
        if let Err(e) = touched {
            tracing::warn!(error = %e, "Session touch failed, treating as unauthenticated");
            return SessionCheck::Unauthenticated(Rejection::StoreError);
        }

        let user = bounded(
            self.store_timeout,
            "user.find_by_id",
            self.users.find_by_id(session.user_id),
        )
        .await;

        match user {
            Ok(Some(user)) => SessionCheck::Authenticated(user),
            Ok(None) => SessionCheck::Unauthenticated(Rejection::UserMissing),
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed, treating as unauthenticated");
                SessionCheck::Unauthenticated(Rejection::StoreError)
            }
        }
    }

    /// Deletes a session. Absent sessions are not an error.
    pub async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        bounded(self.store_timeout, "session.delete", self.sessions.delete(session_id)).await
    }

    /// Deletes every session idle for longer than the sliding window.
    pub async fn purge_idle(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - session_idle_timeout();
        let removed = bounded(
            self.store_timeout,
            "session.delete_idle_before",
            self.sessions.delete_idle_before(cutoff),
        )
        .await?;

        counter!("sessions_expired_total").increment(removed);
        Ok(removed)
    }
}
