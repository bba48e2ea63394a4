//! JSON REST handlers for external workday signals.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use workshift_app::ports::{Clock, EventPublisher, EventSubscriber};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for updating a signal.
#[derive(Deserialize)]
pub struct UpdateSignalRequest {
    pub state: String,
}

/// A signal as stored, raw value untouched.
#[derive(Serialize)]
pub struct SignalResponse {
    pub signal_id: String,
    pub state: String,
}

/// `GET /api/signals`
pub async fn list<EP, C>(State(state): State<AppState<EP, C>>) -> Json<BTreeMap<String, String>>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    Json(state.registry.signals().await)
}

/// `PUT /api/signals/{signal_id}`
///
/// Stores the raw value and emits `signal_changed`; observers watching the
/// signal refresh immediately.
pub async fn update<EP, C>(
    State(state): State<AppState<EP, C>>,
    Path(signal_id): Path<String>,
    Json(req): Json<UpdateSignalRequest>,
) -> Result<Json<SignalResponse>, ApiError>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    state
        .registry
        .set_signal(signal_id.clone(), req.state.clone())
        .await?;
    Ok(Json(SignalResponse {
        signal_id,
        state: req.state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;
    use workshift_app::event_bus::InProcessEventBus;
    use workshift_app::ports::SystemClock;
    use workshift_app::registry::StateRegistry;
    use workshift_domain::event::EventType;

    #[tokio::test]
    async fn should_store_signal_and_emit_event() {
        let bus = Arc::new(InProcessEventBus::default());
        let mut rx = bus.subscribe();
        let state = AppState::new(StateRegistry::new(Arc::clone(&bus)), SystemClock);
        let app = crate::router::build(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/signals/binary_sensor.workday")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"state": "off"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            state.registry.signals().await.get("binary_sensor.workday"),
            Some(&"off".to_string())
        );
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::SignalChanged);
        assert_eq!(event.data["state"], "off");
    }

    #[tokio::test]
    async fn should_list_signals() {
        let state = AppState::new(
            StateRegistry::new(Arc::new(InProcessEventBus::default())),
            SystemClock,
        );
        state
            .registry
            .set_signal("binary_sensor.workday", "on")
            .await
            .unwrap();
        let app = crate::router::build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/signals")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["binary_sensor.workday"], "on");
    }

    #[tokio::test]
    async fn should_reject_body_without_state() {
        let app = crate::router::build(AppState::new(
            StateRegistry::new(Arc::new(InProcessEventBus::default())),
            SystemClock,
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/signals/binary_sensor.workday")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"value": "off"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
