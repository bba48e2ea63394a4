//! JSON REST handlers for published entities.

use axum::Json;
use axum::extract::{Path, State};

use workshift_app::ports::{Clock, EventPublisher, EventSubscriber};
use workshift_domain::entity::Entity;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/entities`
pub async fn list<EP, C>(State(state): State<AppState<EP, C>>) -> Json<Vec<Entity>>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    Json(state.registry.list().await)
}

/// `GET /api/entities/{entity_id}`
pub async fn get<EP, C>(
    State(state): State<AppState<EP, C>>,
    Path(entity_id): Path<String>,
) -> Result<Json<Entity>, ApiError>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    let entity = state.registry.get(&entity_id).await?;
    Ok(Json(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tower::ServiceExt;
    use workshift_app::event_bus::InProcessEventBus;
    use workshift_app::ports::SystemClock;
    use workshift_app::registry::{EntityUpdate, StateRegistry};
    use workshift_domain::entity::EntityState;

    async fn state_with_sensor() -> AppState<Arc<InProcessEventBus>> {
        let registry = StateRegistry::new(Arc::new(InProcessEventBus::default()));
        registry
            .publish(EntityUpdate {
                entity_id: "sensor.crew_today".into(),
                unique_id: "entry_today".into(),
                friendly_name: "Crew Today".into(),
                state: EntityState::Numeric(2),
                attributes: BTreeMap::new(),
                at: workshift_domain::time::now(),
            })
            .await
            .unwrap();
        AppState::new(registry, SystemClock)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_list_published_entities() {
        let app = crate::router::build(state_with_sensor().await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/entities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["entity_id"], "sensor.crew_today");
        assert_eq!(body[0]["state"], 2);
    }

    #[tokio::test]
    async fn should_get_entity_by_id() {
        let app = crate::router::build(state_with_sensor().await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/entities/sensor.crew_today")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["friendly_name"], "Crew Today");
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_entity() {
        let app = crate::router::build(state_with_sensor().await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/entities/sensor.missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("sensor.missing"));
    }
}
