//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AuthService, ClickService, LinkService, RedirectService, SessionService, VerificationSigner,
};
use crate::domain::mailer::Mailer;
use crate::domain::repositories::{
    ClickRepository, LinkRepository, SessionRepository, UserRepository,
};

/// The four stores the service layer is built on.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

/// Values from [`crate::config::Config`] that services and handlers need.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub store_timeout: Duration,
    pub verification_secret: String,
    pub secure_cookies: bool,
    pub allow_anonymous_create: bool,
}

/// Services are constructed once at startup and shared behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub session_service: Arc<SessionService>,
    pub auth_service: Arc<AuthService>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
    pub allow_anonymous_create: bool,
}

impl AppState {
    pub fn new(repos: Repositories, mailer: Arc<dyn Mailer>, settings: Settings) -> Self {
        let timeout = settings.store_timeout;

        let link_service = Arc::new(LinkService::new(
            repos.links.clone(),
            repos.clicks.clone(),
            settings.base_url,
            timeout,
        ));
        let click_service = Arc::new(ClickService::new(
            repos.links.clone(),
            repos.clicks.clone(),
            timeout,
        ));
        let redirect_service = Arc::new(RedirectService::new(link_service.clone(), click_service));
        let session_service = Arc::new(SessionService::new(
            repos.sessions,
            repos.users.clone(),
            timeout,
        ));
        let auth_service = Arc::new(AuthService::new(
            repos.users,
            mailer,
            VerificationSigner::new(settings.verification_secret),
            timeout,
        ));

        Self {
            link_service,
            redirect_service,
            session_service,
            auth_service,
            secure_cookies: settings.secure_cookies,
            allow_anonymous_create: settings.allow_anonymous_create,
        }
    }
}
