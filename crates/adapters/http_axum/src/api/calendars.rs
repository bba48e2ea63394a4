//! Calendar range queries.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use workshift_app::observers::CalendarEvent;
use workshift_app::ports::{Clock, EventPublisher, EventSubscriber};
use workshift_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters: RFC 3339 instants, any offset.
#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// `GET /api/calendars/{entity_id}/events?start=..&end=..`
pub async fn events<EP, C>(
    State(state): State<AppState<EP, C>>,
    Path(entity_id): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    let events = state
        .registry
        .calendar_events(&entity_id, range.start, range.end, state.clock.now())
        .await?;
    tracing::debug!(%entity_id, count = events.len(), "calendar range served");
    Ok(Json(events))
}
