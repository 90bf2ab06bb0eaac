//! REST API layer: route handlers, DTOs, authentication, and router
//! composition.

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::sweep::routes())
        .merge(handlers::system::routes())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{NaiveDate, TimeZone, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{Event, PhotoSubmission, Profile, UserId, Venue};
    use crate::persistence::MemoryStore;
    use crate::service::{SweepOptions, SweepRunner};

    fn app_over(store: &Arc<MemoryStore>, secret: Option<&str>) -> Router {
        let state = AppState {
            sweep_runner: Arc::new(SweepRunner::new(store.handle(), SweepOptions::default())),
            sweep_secret: secret.map(Arc::from),
        };
        build_router().with_state(state)
    }

    fn app(secret: Option<&str>) -> Router {
        app_over(&Arc::new(MemoryStore::new()), secret)
    }

    fn authorized_sweep() -> Request<Body> {
        let Ok(request) = Request::post("/admin/sweep")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        request
    }

    #[tokio::test]
    async fn sweep_requires_bearer_scheme() {
        let Ok(request) = Request::post("/admin/sweep")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        let Ok(response) = app(Some("secret")).oneshot(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sweep_with_secret_on_empty_store_succeeds() {
        let Ok(response) = app(Some("secret")).oneshot(authorized_sweep()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[allow(clippy::indexing_slicing)]
    async fn sweep_route_selects_closed_event() {
        let store = Arc::new(MemoryStore::new());
        let venue = Venue::new("Lakeside Arena");
        let venue_id = venue.id;
        store.insert_venue(venue).await;
        let (Some(date), Some(closes_at)) = (
            NaiveDate::from_ymd_opt(2024, 5, 10),
            Utc.with_ymd_and_hms(2024, 5, 11, 23, 59, 59).single(),
        ) else {
            panic!("valid timestamps");
        };
        let event = Event::new(venue_id, date).with_voting_closes_at(closes_at);
        let event_id = event.id;
        store.insert_event(event).await;
        let user = UserId::new();
        store.insert_profile(Profile::new(user)).await;
        let winner = PhotoSubmission::new(user, event_id, "https://img/route.jpg");
        let winner_id = winner.id;
        store.insert_submission(winner).await;

        let Ok(response) = app_over(&store, Some("secret"))
            .oneshot(authorized_sweep())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("invalid JSON");
        };
        assert_eq!(body["selected"], 1);
        assert_eq!(body["failed"], 0);

        let selected = store.event(event_id).await.and_then(|e| e.selected_submission);
        assert_eq!(selected, Some(winner_id));
    }

    #[tokio::test]
    async fn settings_report_admin_disabled_without_secret() {
        let Ok(request) = Request::get("/config/sweep").body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = app(None).oneshot(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
