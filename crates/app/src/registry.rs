//! State registry — published entity snapshots and raw workday signals.
//!
//! Observers push [`EntityUpdate`]s here; the HTTP adapter reads from it.
//! External workday signals are also stored here so that observers can take
//! an immutable [`SignalSnapshot`] before every resolver pass. Calendar
//! observers register themselves to answer range queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use workshift_domain::entity::{AttributeValue, Entity, EntityState};
use workshift_domain::error::{NotFoundError, ValidationError, WorkshiftError};
use workshift_domain::event::{Event, EventType};
use workshift_domain::id::EntryId;
use workshift_domain::schedule::SignalSnapshot;
use workshift_domain::time::Timestamp;

use crate::observers::{CalendarEvent, CalendarObserver, Observer};
use crate::ports::{EventPublisher, EventSubscriber};

/// Fresh state computed by an observer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityUpdate {
    pub entity_id: String,
    pub unique_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub at: Timestamp,
}

/// In-memory store of entity snapshots and signal values.
pub struct StateRegistry<EP> {
    entities: RwLock<BTreeMap<String, Entity>>,
    signals: RwLock<BTreeMap<String, String>>,
    calendars: RwLock<BTreeMap<String, Arc<CalendarObserver>>>,
    owners: RwLock<BTreeMap<String, EntryId>>,
    publisher: EP,
}

impl<EP: EventPublisher> StateRegistry<EP> {
    pub fn new(publisher: EP) -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            signals: RwLock::new(BTreeMap::new()),
            calendars: RwLock::new(BTreeMap::new()),
            owners: RwLock::new(BTreeMap::new()),
            publisher,
        }
    }

    /// Upsert an entity snapshot.
    ///
    /// Emits `state_changed` when the entity is new or its state differs from
    /// the stored one. Attribute-only changes just bump `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshiftError::Validation`] for an empty entity id, or the
    /// publisher's error.
    pub async fn publish(&self, update: EntityUpdate) -> Result<Entity, WorkshiftError> {
        let (entity, previous) = {
            let mut entities = self.entities.write().await;
            match entities.get_mut(&update.entity_id) {
                Some(existing) => {
                    existing.unique_id = update.unique_id;
                    existing.friendly_name = update.friendly_name;
                    let previous = existing.apply(update.state, update.attributes, update.at);
                    let changed = previous.map(Some);
                    (existing.clone(), changed)
                }
                None => {
                    let entity = Entity::builder()
                        .entity_id(update.entity_id)
                        .unique_id(update.unique_id)
                        .friendly_name(update.friendly_name)
                        .state(update.state)
                        .attributes(update.attributes)
                        .timestamp(update.at)
                        .build()?;
                    entities.insert(entity.entity_id.clone(), entity.clone());
                    (entity, Some(None))
                }
            }
        };

        if let Some(from) = previous {
            tracing::debug!(entity_id = %entity.entity_id, state = %entity.state, "state changed");
            let event = Event::new(
                EventType::StateChanged,
                entity.entity_id.clone(),
                serde_json::json!({
                    "from": from,
                    "to": entity.state,
                }),
            );
            self.publisher.publish(event).await?;
        }
        Ok(entity)
    }

    /// Look up one entity.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshiftError::NotFound`] when no entity has that id.
    pub async fn get(&self, entity_id: &str) -> Result<Entity, WorkshiftError> {
        self.entities
            .read()
            .await
            .get(entity_id)
            .cloned()
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Entity",
                    id: entity_id.to_string(),
                }
                .into()
            })
    }

    /// All entities, ordered by id.
    pub async fn list(&self) -> Vec<Entity> {
        self.entities.read().await.values().cloned().collect()
    }

    /// Forget an entity, e.g. when its schedule is torn down.
    pub async fn remove(&self, entity_id: &str) -> Option<Entity> {
        self.entities.write().await.remove(entity_id)
    }

    /// Store the raw value of an external signal and emit `signal_changed`.
    ///
    /// # Errors
    ///
    /// Returns the publisher's error.
    pub async fn set_signal(
        &self,
        signal_id: impl Into<String>,
        raw: impl Into<String>,
    ) -> Result<(), WorkshiftError> {
        let signal_id = signal_id.into();
        let raw = raw.into();
        self.signals
            .write()
            .await
            .insert(signal_id.clone(), raw.clone());
        tracing::debug!(%signal_id, state = %raw, "signal updated");
        let event = Event::new(
            EventType::SignalChanged,
            signal_id,
            serde_json::json!({ "state": raw }),
        );
        self.publisher.publish(event).await
    }

    /// Raw signal values, ordered by id.
    pub async fn signals(&self) -> BTreeMap<String, String> {
        self.signals.read().await.clone()
    }

    /// Immutable copy of the signals for one resolver pass.
    pub async fn signal_snapshot(&self) -> SignalSnapshot {
        self.signals
            .read()
            .await
            .iter()
            .map(|(id, raw)| (id.clone(), raw.clone()))
            .collect()
    }

    /// Reserve entity ids for one schedule entry, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`] naming the first id that is
    /// already held, whoever holds it.
    pub async fn claim(&self, owner: EntryId, entity_ids: &[String]) -> Result<(), WorkshiftError> {
        let mut owners = self.owners.write().await;
        if let Some(taken) = entity_ids.iter().find(|id| owners.contains_key(*id)) {
            return Err(ValidationError::DuplicateName(taken.clone()).into());
        }
        for entity_id in entity_ids {
            owners.insert(entity_id.clone(), owner);
        }
        Ok(())
    }

    /// Give back every id held by `owner`.
    pub async fn release(&self, owner: EntryId) {
        self.owners
            .write()
            .await
            .retain(|_, current| *current != owner);
    }

    /// Make a calendar available to range queries.
    pub async fn register_calendar(&self, calendar: Arc<CalendarObserver>) {
        self.calendars
            .write()
            .await
            .insert(calendar.entity_id().to_string(), calendar);
    }

    pub async fn remove_calendar(&self, entity_id: &str) -> Option<Arc<CalendarObserver>> {
        self.calendars.write().await.remove(entity_id)
    }

    /// Events of one calendar overlapping `[start, end)`, evaluated as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when `end <= start` and
    /// [`WorkshiftError::NotFound`] for an unknown calendar.
    pub async fn calendar_events(
        &self,
        entity_id: &str,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Result<Vec<CalendarEvent>, WorkshiftError> {
        if end <= start {
            return Err(ValidationError::InvalidRange.into());
        }
        let calendar = self
            .calendars
            .read()
            .await
            .get(entity_id)
            .cloned()
            .ok_or_else(|| NotFoundError {
                entity: "Calendar",
                id: entity_id.to_string(),
            })?;
        let snapshot = self.signal_snapshot().await;
        Ok(calendar.events_between(start, end, now, &snapshot))
    }
}

impl<EP: EventSubscriber> StateRegistry<EP> {
    /// Subscribe to the bus this registry publishes on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.publisher.subscribe()
    }
}
