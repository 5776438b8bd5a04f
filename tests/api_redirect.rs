mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{MemoryStore, settings, spawn_app, spawn_app_with};
use serde_json::Value;
use shortkeun::application::services::{Resolution, Visitor};
use std::time::{Duration as StdDuration, Instant};
use tokio::task::JoinSet;

#[tokio::test]
async fn test_redirect_is_permanent_and_uncacheable() {
    let app = spawn_app();
    let link = app
        .store
        .insert_link("abc123", "https://example.com/a", None, None);

    let response = app
        .server
        .get("/abc123")
        .add_header("User-Agent", "integration-test")
        .await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/a");
    assert!(
        response
            .header("cache-control")
            .to_str()
            .unwrap()
            .contains("no-store")
    );
    assert_eq!(response.header("pragma"), "no-cache");
    assert_eq!(response.header("expires"), "0");

    app.wait_for_clicks(link.id, 1).await;
    let clicks = app.store.clicks_for(link.id);
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].user_agent.as_deref(), Some("integration-test"));
    assert_eq!(app.store.link(link.id).unwrap().click_count, 1);
}

#[tokio::test]
async fn test_redirect_adds_missing_scheme() {
    let app = spawn_app();
    app.store.insert_link("legacy", "example.com/old", None, None);

    let response = app.server.get("/legacy").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/old");
}

#[tokio::test]
async fn test_redirect_api_alias_behaves_the_same() {
    let app = spawn_app();
    let link = app
        .store
        .insert_link("alias1", "https://example.com/b", None, None);

    let response = app.server.get("/api/shorturl/redirect/alias1").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/b");
    app.wait_for_clicks(link.id, 1).await;
}

#[tokio::test]
async fn test_unknown_code_goes_to_not_found_page() {
    let app = spawn_app();

    let response = app.server.get("/nope42").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/not-found");
}

#[tokio::test]
async fn test_expired_link_is_gone_and_not_counted() {
    let app = spawn_app();
    let link = app.store.insert_link(
        "old123",
        "https://example.com",
        None,
        Some(Utc::now() - Duration::seconds(1)),
    );

    let response = app.server.get("/old123").await;

    response.assert_status(StatusCode::GONE);
    assert_eq!(response.json::<Value>()["error"]["code"], "expired");
    assert!(app.store.clicks_for(link.id).is_empty());
    assert_eq!(app.store.link(link.id).unwrap().click_count, 0);
}

#[tokio::test]
async fn test_link_before_expiry_still_redirects() {
    let app = spawn_app();
    app.store.insert_link(
        "soon12",
        "https://example.com",
        None,
        Some(Utc::now() + Duration::hours(1)),
    );

    app.server
        .get("/soon12")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_corrupt_destination_is_internal_error() {
    let app = spawn_app();
    let link = app.store.insert_link("broken", "http://", None, None);

    let response = app.server.get("/broken").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["message"], "Internal server error");
    assert!(app.store.clicks_for(link.id).is_empty());
}

#[tokio::test]
async fn test_lookup_failure_resolves_as_not_found() {
    let app = spawn_app();
    app.store.insert_link("abc123", "https://example.com", None, None);
    app.store.fail_link_reads(true);

    let response = app.server.get("/abc123").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/not-found");
}

#[tokio::test]
async fn test_forwarded_for_first_hop_is_recorded() {
    let app = spawn_app();
    let link = app.store.insert_link("ipcode", "https://example.com", None, None);

    app.server
        .get("/ipcode")
        .add_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    app.wait_for_clicks(link.id, 1).await;
    let clicks = app.store.clicks_for(link.id);
    assert_eq!(clicks[0].ip_address.as_deref(), Some("203.0.113.7"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clicks_are_all_counted() {
    const VISITS: usize = 64;

    let app = spawn_app();
    let link = app.store.insert_link("hot123", "https://example.com", None, None);

    let mut tasks = JoinSet::new();
    for _ in 0..VISITS {
        let resolver = app.state.redirect_service.clone();
        tasks.spawn(async move { resolver.resolve("hot123", Visitor::default()).await });
    }

    while let Some(joined) = tasks.join_next().await {
        let resolution = joined.unwrap().unwrap();
        assert!(matches!(resolution, Resolution::Redirect { .. }));
    }

    app.wait_for_clicks(link.id, VISITS).await;
}

#[tokio::test]
async fn test_fallback_counter_path_still_counts_sequential_clicks() {
    let app = spawn_app_with(MemoryStore::without_atomic_increment(), settings());
    let link = app.store.insert_link("slow12", "https://example.com", None, None);

    for visit in 1..=3 {
        app.server
            .get("/slow12")
            .await
            .assert_status(StatusCode::MOVED_PERMANENTLY);
        app.wait_for_clicks(link.id, visit).await;
    }
}

#[tokio::test]
async fn test_long_custom_slug_still_resolves() {
    let app = spawn_app();
    app.store
        .insert_link("a-very-long-slug-20", "https://example.com", None, None);

    app.server
        .get("/a-very-long-slug-20")
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn test_slow_counter_does_not_hold_the_redirect() {
    let app = spawn_app();
    let link = app.store.insert_link("slowct", "https://example.com", None, None);
    app.store.delay_counter(StdDuration::from_secs(1));

    let started = Instant::now();
    let response = app.server.get("/slowct").await;
    let elapsed = started.elapsed();

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert!(elapsed < StdDuration::from_millis(500), "redirect took {elapsed:?}");

    app.wait_for_clicks(link.id, 1).await;
}

#[tokio::test]
async fn test_slow_counter_does_not_hold_resolution() {
    let app = spawn_app();
    let link = app.store.insert_link("slowsv", "https://example.com", None, None);
    app.store.delay_counter(StdDuration::from_secs(1));

    let started = Instant::now();
    let (resolution, accounting) = app
        .state
        .redirect_service
        .resolve_and_account("slowsv", Visitor::default(), Utc::now())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(matches!(resolution, Resolution::Redirect { .. }));
    assert!(elapsed < StdDuration::from_millis(500), "resolve took {elapsed:?}");

    accounting.unwrap().await.unwrap();
    assert_eq!(app.store.link(link.id).unwrap().click_count, 1);
    assert_eq!(app.store.clicks_for(link.id).len(), 1);
}

#[tokio::test]
async fn test_unicode_destination_is_percent_encoded_in_location() {
    let app = spawn_app();
    let session = app.signed_in("ana@example.com").await;
    app.create_link(
        &session,
        serde_json::json!({ "originalUrl": "https://example.com/caf\u{e9}", "customSlug": "cafe" }),
    )
    .await;

    let response = app.server.get("/cafe").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/caf%C3%A9");
}
