//! HTTP-level tests for the administrative sweep trigger.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::Value;

use cover_sweep::api;
use cover_sweep::app_state::AppState;
use cover_sweep::domain::{Event, EventId, PhotoSubmission, Profile, UserId, Venue};
use cover_sweep::persistence::MemoryStore;
use cover_sweep::service::{SweepOptions, SweepRunner};

const SECRET: &str = "cron-secret";

struct Fixture {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
    event_id: EventId,
    winner: UserId,
}

async fn spawn_server(secret: Option<&str>) -> Fixture {
    let store = Arc::new(MemoryStore::new());

    let venue = Venue::new("Fenway Park");
    let venue_id = venue.id;
    store.insert_venue(venue).await;

    let Some(date) = NaiveDate::from_ymd_opt(2024, 5, 10) else {
        panic!("valid date");
    };
    let Some(closes_at) = Utc.with_ymd_and_hms(2024, 5, 11, 23, 59, 59).single() else {
        panic!("valid timestamp");
    };
    let event = Event::new(venue_id, date)
        .with_teams("NYY", "BOS")
        .with_voting_closes_at(closes_at);
    let event_id = event.id;
    store.insert_event(event).await;

    let winner = UserId::new();
    store.insert_profile(Profile::new(winner)).await;
    let mut submission = PhotoSubmission::new(winner, event_id, "https://img/fenway.jpg");
    submission.like_count = 12;
    submission.capture_verified = true;
    store.insert_submission(submission).await;

    let state = AppState {
        sweep_runner: Arc::new(SweepRunner::new(store.handle(), SweepOptions::default())),
        sweep_secret: secret.map(Arc::from),
    };
    let app = api::build_router().with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Fixture {
        addr,
        store,
        event_id,
        winner,
    }
}

async fn is_selected(fixture: &Fixture) -> bool {
    fixture
        .store
        .event(fixture.event_id)
        .await
        .is_some_and(|e| e.selected_submission.is_some())
}

#[tokio::test]
async fn missing_credential_is_rejected_before_work() {
    let fixture = spawn_server(Some(SECRET)).await;
    let url = format!("http://{}/admin/sweep", fixture.addr);

    let Ok(response) = reqwest::Client::new().post(&url).send().await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let Ok(body) = response.json::<Value>().await else {
        panic!("body is not json");
    };
    assert_eq!(body["error"]["code"], 1401);
    assert!(!is_selected(&fixture).await);
}

#[tokio::test]
async fn wrong_credential_is_rejected() {
    let fixture = spawn_server(Some(SECRET)).await;
    let url = format!("http://{}/admin/sweep", fixture.addr);

    let Ok(response) = reqwest::Client::new()
        .post(&url)
        .bearer_auth("not-the-secret")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!is_selected(&fixture).await);
}

#[tokio::test]
async fn unconfigured_secret_rejects_everything() {
    let fixture = spawn_server(None).await;
    let url = format!("http://{}/admin/sweep", fixture.addr);

    let Ok(response) = reqwest::Client::new()
        .post(&url)
        .bearer_auth(SECRET)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!is_selected(&fixture).await);
}

#[tokio::test]
async fn authorized_sweep_selects_once() {
    let fixture = spawn_server(Some(SECRET)).await;
    let url = format!("http://{}/admin/sweep", fixture.addr);
    let client = reqwest::Client::new();

    let Ok(response) = client.post(&url).bearer_auth(SECRET).send().await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let Ok(body) = response.json::<Value>().await else {
        panic!("body is not json");
    };
    assert_eq!(body["selected"], 1);
    assert_eq!(body["unresolved"], 0);
    assert_eq!(body["failed"], 0);
    assert!(is_selected(&fixture).await);

    // GET is accepted as well; nothing is left to select.
    let Ok(response) = client.get(&url).bearer_auth(SECRET).send().await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let Ok(body) = response.json::<Value>().await else {
        panic!("body is not json");
    };
    assert_eq!(body["selected"], 0);
    assert_eq!(body["effects_recovered"], 0);
    assert_eq!(body["heroes_repaired"], 0);

    assert_eq!(fixture.store.notifications().await.len(), 1);
    assert_eq!(fixture.store.cover_photo_count(fixture.winner).await, Some(1));
}

#[tokio::test]
async fn health_is_public() {
    let fixture = spawn_server(Some(SECRET)).await;
    let url = format!("http://{}/health", fixture.addr);

    let Ok(response) = reqwest::get(&url).await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let Ok(body) = response.json::<Value>().await else {
        panic!("body is not json");
    };
    assert_eq!(body["status"], "healthy");
}
