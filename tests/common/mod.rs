#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shortkeun::domain::entities::{
    Click, ClickStamp, LinkStatus, NewClick, NewShortLink, NewUser, Session, ShortLink, User,
};
use shortkeun::domain::mailer::Mailer;
use shortkeun::domain::repositories::{
    ClickRepository, LinkRepository, SessionRepository, UserRepository,
};
use shortkeun::error::AppError;
use shortkeun::routes::app_routes;
use shortkeun::state::{AppState, Repositories, Settings};

pub const BASE_URL: &str = "http://sho.rt";
pub const SECRET: &str = "integration-secret";

#[derive(Default)]
struct Tables {
    links: Vec<ShortLink>,
    clicks: Vec<Click>,
    users: Vec<User>,
    sessions: Vec<Session>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of all four repositories.
///
/// Soft deletes keep the row with a `Deleted` status, like the SQL store.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    atomic_increment: bool,
    fail_links: Mutex<bool>,
    fail_sessions: Mutex<bool>,
    counter_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            atomic_increment: true,
            fail_links: Mutex::new(false),
            fail_sessions: Mutex::new(false),
            counter_delay: Mutex::new(None),
        }
    }

    /// A store that reports no indivisible increment, forcing the
    /// read-modify-write counter path.
    pub fn without_atomic_increment() -> Self {
        Self {
            atomic_increment: false,
            ..Self::new()
        }
    }

    /// Makes every link read fail with a store error.
    pub fn fail_link_reads(&self, fail: bool) {
        *self.fail_links.lock().unwrap() = fail;
    }

    /// Makes every click counter increment take `delay` before it lands.
    pub fn delay_counter(&self, delay: Duration) {
        *self.counter_delay.lock().unwrap() = Some(delay);
    }

    /// Makes every session read fail with a store error.
    pub fn fail_session_reads(&self, fail: bool) {
        *self.fail_sessions.lock().unwrap() = fail;
    }

    pub fn insert_link(
        &self,
        code: &str,
        original_url: &str,
        owner_user_id: Option<i64>,
        expired_at: Option<DateTime<Utc>>,
    ) -> ShortLink {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let link = ShortLink {
            id: tables.next_id(),
            original_url: original_url.to_string(),
            code: code.to_string(),
            shortened_url: format!("{BASE_URL}/{code}"),
            click_count: 0,
            expired_at,
            created_at: now,
            updated_at: now,
            status: LinkStatus::Active,
            owner_user_id,
        };
        tables.links.push(link.clone());
        link
    }

    pub fn insert_session(&self, user_id: i64, last_activity: DateTime<Utc>) -> String {
        let id = format!("test-session-{user_id}-{}", last_activity.timestamp());
        self.tables.lock().unwrap().sessions.push(Session {
            id: id.clone(),
            user_id,
            created_at: last_activity,
            last_activity,
            ip_address: None,
            user_agent: None,
        });
        id
    }

    /// Any stored link, including soft-deleted ones.
    pub fn link(&self, id: i64) -> Option<ShortLink> {
        let tables = self.tables.lock().unwrap();
        tables.links.iter().find(|l| l.id == id).cloned()
    }

    pub fn clicks_for(&self, link_id: i64) -> Vec<Click> {
        let tables = self.tables.lock().unwrap();
        tables
            .clicks
            .iter()
            .filter(|c| c.short_link_id == link_id)
            .cloned()
            .collect()
    }

    pub fn session(&self, id: &str) -> Option<Session> {
        let tables = self.tables.lock().unwrap();
        tables.sessions.iter().find(|s| s.id == id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    fn check(flag: &Mutex<bool>) -> Result<(), AppError> {
        if *flag.lock().unwrap() {
            return Err(AppError::internal("store unavailable", json!({})));
        }
        Ok(())
    }
}

fn active(link: &ShortLink) -> bool {
    link.status.is_active()
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .links
            .iter()
            .any(|l| active(l) && l.code == new_link.code)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_urls_active_code_key" }),
            ));
        }

        let now = Utc::now();
        let link = ShortLink {
            id: tables.next_id(),
            original_url: new_link.original_url,
            code: new_link.code,
            shortened_url: new_link.shortened_url,
            click_count: 0,
            expired_at: new_link.expired_at,
            created_at: now,
            updated_at: now,
            status: LinkStatus::Active,
            owner_user_id: new_link.owner_user_id,
        };
        tables.links.push(link.clone());
        Ok(link)
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Self::check(&self.fail_links)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .find(|l| active(l) && l.code == code)
            .cloned())
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Self::check(&self.fail_links)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .find(|l| active(l) && l.id == id)
            .cloned())
    }

    async fn list_active_by_owner(&self, owner_user_id: i64) -> Result<Vec<ShortLink>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut links: Vec<ShortLink> = tables
            .links
            .iter()
            .filter(|l| active(l) && l.owner_user_id == Some(owner_user_id))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        match tables.links.iter_mut().find(|l| active(l) && l.id == id) {
            Some(link) => {
                link.status = LinkStatus::Deleted { at: now };
                link.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn supports_atomic_increment(&self) -> bool {
        self.atomic_increment
    }

    async fn increment_click_count(&self, id: i64) -> Result<(), AppError> {
        let delay = *self.counter_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut tables = self.tables.lock().unwrap();
        if let Some(link) = tables.links.iter_mut().find(|l| l.id == id) {
            link.click_count += 1;
            link.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn click_count(&self, id: i64) -> Result<Option<i64>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.click_count))
    }

    async fn set_click_count(&self, id: i64, click_count: i64) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(link) = tables.links.iter_mut().find(|l| l.id == id) {
            link.click_count = click_count;
            link.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        Self::check(&self.fail_links)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.links.iter().filter(|l| active(l)).count() as i64)
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.links.iter().any(|l| l.id == new_click.short_link_id) {
            return Err(AppError::internal("Database error", json!({})));
        }

        let click = Click {
            id: tables.next_id(),
            short_link_id: new_click.short_link_id,
            created_at: Utc::now(),
            ip_address: new_click.ip_address,
            user_agent: new_click.user_agent,
        };
        tables.clicks.push(click.clone());
        Ok(click)
    }

    async fn stamps_for_links(&self, link_ids: &[i64]) -> Result<Vec<ClickStamp>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .clicks
            .iter()
            .filter(|c| link_ids.contains(&c.short_link_id))
            .map(|c| ClickStamp {
                short_link_id: c.short_link_id,
                created_at: c.created_at,
            })
            .collect())
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self.clicks_for(link_id).len() as i64)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().clicks.len() as i64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let user = User {
            id: tables.next_id(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            email_verified_at: new_user.email_verified_at,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.user_by_email(email))
    }

    async fn mark_email_verified(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.email_verified_at.get_or_insert(at);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, session: Session) -> Result<(), AppError> {
        self.tables.lock().unwrap().sessions.push(session);
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<Session>, AppError> {
        Self::check(&self.fail_sessions)?;
        Ok(self.session(id))
    }

    async fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(session) = tables.sessions.iter_mut().find(|s| s.id == id) {
            session.last_activity = session.last_activity.max(at);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.tables.lock().unwrap().sessions.retain(|s| s.id != id);
        Ok(())
    }

    async fn delete_idle_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.last_activity >= cutoff);
        Ok((before - tables.sessions.len()) as u64)
    }
}

/// Mailer that keeps every verification token it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingMailer {
    /// Makes every send take `delay` before it is recorded.
    pub fn delay_sends(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Waits until at least `count` emails have gone out.
    pub async fn wait_for_sends(&self, count: usize) {
        eventually(|| self.sent_count() >= count).await;
    }

    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, to: &str, _name: &str, token: &str) -> Result<(), AppError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn settings() -> Settings {
    Settings {
        base_url: BASE_URL.to_string(),
        store_timeout: Duration::from_secs(2),
        verification_secret: SECRET.to_string(),
        secure_cookies: false,
        allow_anonymous_create: false,
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(MemoryStore::new(), settings())
}

pub fn spawn_app_with(store: MemoryStore, settings: Settings) -> TestApp {
    let store = Arc::new(store);
    let mailer = Arc::new(RecordingMailer::default());

    let repos = Repositories {
        links: store.clone(),
        clicks: store.clone(),
        users: store.clone(),
        sessions: store.clone(),
    };

    let state = AppState::new(repos, mailer.clone(), settings);
    let server = TestServer::new(app_routes(state.clone())).unwrap();

    TestApp {
        server,
        state,
        store,
        mailer,
    }
}

impl TestApp {
    /// Registers an account and waits for its verification email.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let sent_before = self.mailer.sent_count();
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        self.mailer.wait_for_sends(sent_before + 1).await;
        response.json::<Value>()
    }

    /// Waits until `count` clicks on `link_id` are both logged and counted.
    pub async fn wait_for_clicks(&self, link_id: i64, count: usize) {
        eventually(|| {
            let counted = self
                .store
                .link(link_id)
                .is_some_and(|link| link.click_count == count as i64);
            counted && self.store.clicks_for(link_id).len() == count
        })
        .await;
    }

    /// Logs in and returns the session id from the `sessionId` cookie.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.cookie("sessionId").value().to_string()
    }

    /// Registers a fresh account and returns its session id.
    pub async fn signed_in(&self, email: &str) -> String {
        self.register("Tester", email, "secret1").await;
        self.login(email, "secret1").await
    }

    pub async fn create_link(&self, session: &str, body: Value) -> Value {
        let response = self
            .server
            .post("/api/shorturl/create")
            .add_header("Cookie", cookie(session))
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }
}

pub fn cookie(session: &str) -> String {
    format!("sessionId={session}")
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::days(days)
}

/// Polls `check` until it holds, failing the test after two seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within two seconds");
}
