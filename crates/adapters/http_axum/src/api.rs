//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod calendars;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod signals;
pub mod sse;

use axum::Router;
use axum::routing::{get, put};

use workshift_app::ports::{Clock, EventPublisher, EventSubscriber};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<EP, C>() -> Router<AppState<EP, C>>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/entities", get(entities::list::<EP, C>))
        .route("/entities/{entity_id}", get(entities::get::<EP, C>))
        .route("/signals", get(signals::list::<EP, C>))
        .route("/signals/{signal_id}", put(signals::update::<EP, C>))
        .route(
            "/calendars/{entity_id}/events",
            get(calendars::events::<EP, C>),
        )
        .route("/events/stream", get(sse::stream::<EP, C>))
}
