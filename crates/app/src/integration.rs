//! Integration lifecycle — one running set of observers per schedule.
//!
//! The daemon calls the lifecycle methods in order:
//!
//! 1. [`start`](WorkshiftIntegration::start) — spawn the observer tasks
//! 2. (observers publish until told to stop)
//! 3. [`teardown`](WorkshiftIntegration::teardown) — stop them and forget their entities
//!
//! [`reload`](WorkshiftIntegration::reload) swaps in a new schedule by doing
//! both with the new configuration in between.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use workshift_domain::error::WorkshiftError;
use workshift_domain::id::EntryId;
use workshift_domain::schedule::ScheduleConfig;

use crate::observers::{CalendarObserver, CoverageSensor, DaySensor, Observer, run_observer};
use crate::ports::{Clock, EventPublisher, EventSubscriber};
use crate::registry::StateRegistry;

struct Running {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    entity_ids: Vec<String>,
    calendar_id: String,
}

/// All observers of one configured schedule.
pub struct WorkshiftIntegration<EP, C> {
    entry_id: EntryId,
    schedule: Arc<ScheduleConfig>,
    registry: Arc<StateRegistry<EP>>,
    clock: C,
    running: Option<Running>,
}

impl<EP, C> WorkshiftIntegration<EP, C>
where
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    pub fn new(
        entry_id: EntryId,
        schedule: Arc<ScheduleConfig>,
        registry: Arc<StateRegistry<EP>>,
        clock: C,
    ) -> Self {
        Self {
            entry_id,
            schedule,
            registry,
            clock,
            running: None,
        }
    }

    #[must_use]
    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    #[must_use]
    pub fn schedule(&self) -> &Arc<ScheduleConfig> {
        &self.schedule
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Entity ids of the running observers; empty when stopped.
    #[must_use]
    pub fn entity_ids(&self) -> &[String] {
        self.running
            .as_ref()
            .map_or(&[], |running| running.entity_ids.as_slice())
    }

    /// Spawn the coverage, today, tomorrow and calendar observers.
    ///
    /// Must be called from within a tokio runtime. Starting twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`](workshift_domain::error::ValidationError::DuplicateName)
    /// when another running schedule already publishes one of the entity ids,
    /// e.g. "Night Crew" next to "night-crew". Nothing is spawned then.
    pub async fn start(&mut self) -> Result<(), WorkshiftError> {
        if self.running.is_some() {
            tracing::warn!(schedule = self.schedule.name(), "integration already started");
            return Ok(());
        }

        let calendar = Arc::new(CalendarObserver::new(self.entry_id, Arc::clone(&self.schedule)));
        let coverage = CoverageSensor::new(self.entry_id, Arc::clone(&self.schedule));
        let today = DaySensor::today(self.entry_id, Arc::clone(&self.schedule));
        let tomorrow = DaySensor::tomorrow(self.entry_id, Arc::clone(&self.schedule));

        let calendar_id = calendar.entity_id().to_string();
        let entity_ids = vec![
            coverage.entity_id().to_string(),
            today.entity_id().to_string(),
            tomorrow.entity_id().to_string(),
            calendar_id.clone(),
        ];
        if let Err(err) = self.registry.claim(self.entry_id, &entity_ids).await {
            tracing::error!(schedule = self.schedule.name(), error = %err, "entity ids already in use");
            return Err(err);
        }
        self.registry.register_calendar(Arc::clone(&calendar)).await;

        let (shutdown, _) = watch::channel(false);
        let tasks = vec![
            self.spawn(coverage, &shutdown),
            self.spawn(today, &shutdown),
            self.spawn(tomorrow, &shutdown),
            self.spawn(calendar, &shutdown),
        ];

        tracing::info!(
            schedule = self.schedule.name(),
            entry_id = %self.entry_id,
            entities = ?entity_ids,
            "integration started"
        );
        self.running = Some(Running {
            shutdown,
            tasks,
            entity_ids,
            calendar_id,
        });
        Ok(())
    }

    fn spawn<O: Observer>(&self, observer: O, shutdown: &watch::Sender<bool>) -> JoinHandle<()> {
        tokio::spawn(run_observer(
            observer,
            Arc::clone(&self.registry),
            self.clock.clone(),
            shutdown.subscribe(),
        ))
    }

    /// Stop every observer, cancelling pending wake-ups, and forget the
    /// published entities. Stopping a stopped integration is a no-op.
    pub async fn teardown(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        // receivers may already be gone if every task ended
        let _ = running.shutdown.send(true);
        for task in running.tasks {
            if let Err(err) = task.await {
                tracing::warn!(schedule = self.schedule.name(), error = %err, "observer task failed");
            }
        }

        self.registry.remove_calendar(&running.calendar_id).await;
        for entity_id in &running.entity_ids {
            self.registry.remove(entity_id).await;
        }
        self.registry.release(self.entry_id).await;
        tracing::info!(schedule = self.schedule.name(), entry_id = %self.entry_id, "integration stopped");
    }

    /// Replace the schedule: teardown, swap, start.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start); the integration is left stopped.
    pub async fn reload(&mut self, schedule: Arc<ScheduleConfig>) -> Result<(), WorkshiftError> {
        let was_running = self.is_running();
        self.teardown().await;
        self.schedule = schedule;
        if was_running {
            self.start().await?;
        }
        Ok(())
    }
}
