//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use workshift_app::ports::{Clock, EventPublisher, EventSubscriber};
use workshift_domain::event::{Event as BusEvent, EventType};

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of `state_changed` and
/// `signal_changed` events.
///
/// Each bus event is sent as a JSON `data:` frame until the client
/// disconnects. A lagging client skips the dropped events.
pub async fn stream<EP, C>(
    State(state): State<AppState<EP, C>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    let event_stream =
        BroadcastStream::new(state.registry.subscribe()).filter_map(|result| match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default()
                    .event(event_name(&event))
                    .data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize event for SSE stream");
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "SSE subscriber lagged, some events were dropped");
                None
            }
        });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

fn event_name(event: &BusEvent) -> &'static str {
    match event.event_type {
        EventType::StateChanged => "state_changed",
        EventType::SignalChanged => "signal_changed",
    }
}
