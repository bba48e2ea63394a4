//! Observer task loop.
//!
//! One tokio task per observer: evaluate, publish, sleep until the next wake
//! instant or a relevant signal change.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use workshift_domain::event::Event;

use super::Observer;
use crate::ports::{Clock, EventPublisher, EventSubscriber};
use crate::registry::StateRegistry;

/// Drive one observer until `shutdown` flips to `true` or its sender drops.
///
/// Each pass takes a signal snapshot, evaluates, publishes, then waits for
/// the earliest of: the evaluation's wake-up instant, a change of a watched
/// workday signal, or shutdown. Only one wake-up is pending at a time and
/// it is dropped before the next one is armed.
pub async fn run_observer<O, EP, C>(
    observer: O,
    registry: Arc<StateRegistry<EP>>,
    clock: C,
    mut shutdown: watch::Receiver<bool>,
) where
    O: Observer,
    EP: EventPublisher + EventSubscriber + Send + Sync + 'static,
    C: Clock + Send + Sync,
{
    let watched = observer.schedule().workday().watched_signals();
    let mut signals = (!watched.is_empty()).then(|| registry.subscribe());

    tracing::debug!(entity_id = observer.entity_id(), ?watched, "observer started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let now = clock.now();
        let snapshot = registry.signal_snapshot().await;
        let evaluation = observer.evaluate(now, &snapshot);
        let next_wake = evaluation.next_wake;

        if let Err(err) = registry.publish(evaluation.update).await {
            tracing::warn!(entity_id = observer.entity_id(), error = %err, "failed to publish state");
        }
        tracing::debug!(entity_id = observer.entity_id(), %next_wake, "next refresh armed");

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            () = clock.sleep_until(next_wake) => {}
            () = signal_change(&mut signals, &watched) => {
                tracing::debug!(entity_id = observer.entity_id(), "workday signal changed");
            }
        }
    }

    tracing::debug!(entity_id = observer.entity_id(), "observer stopped");
}

/// Resolve on the next change of a watched signal; never resolve without a
/// subscription.
async fn signal_change(rx: &mut Option<broadcast::Receiver<Event>>, watched: &[String]) {
    if let Some(receiver) = rx.as_mut() {
        loop {
            match receiver.recv().await {
                Ok(event) if event.is_signal_change_for(watched) => return,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event subscriber lagged, refreshing");
                    return;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        *rx = None;
    }
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use crate::observers::{CoverageSensor, DaySensor};
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use std::sync::Mutex;
    use workshift_domain::entity::EntityState;
    use workshift_domain::event::EventType;
    use workshift_domain::id::EntryId;
    use workshift_domain::schedule::{ScheduleConfig, WorkdayOverride};
    use workshift_domain::time::Timestamp;

    /// Clock whose wake-ups complete instantly and move "now" to the deadline.
    #[derive(Clone)]
    struct SteppingClock {
        now: Arc<Mutex<Timestamp>>,
    }

    impl SteppingClock {
        fn at(start: Timestamp) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Timestamp {
            *self.now.lock().unwrap()
        }

        fn sleep_until(&self, deadline: Timestamp) -> impl Future<Output = ()> + Send {
            let now = Arc::clone(&self.now);
            async move {
                tokio::task::yield_now().await;
                let mut guard = now.lock().unwrap();
                if *guard < deadline {
                    *guard = deadline;
                }
            }
        }
    }

    /// Clock that never wakes up on its own.
    #[derive(Clone)]
    struct FrozenClock(Timestamp);

    impl Clock for FrozenClock {
        fn now(&self) -> Timestamp {
            self.0
        }

        fn sleep_until(&self, _deadline: Timestamp) -> impl Future<Output = ()> + Send {
            std::future::pending()
        }
    }

    fn utc(day: u32, hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn schedule(workday: WorkdayOverride) -> Arc<ScheduleConfig> {
        Arc::new(
            ScheduleConfig::builder()
                .name("Crew")
                .pattern("123012301230")
                .base_date(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
                .shift_starts([6, 14, 22].map(|h| NaiveTime::from_hms_opt(h, 0, 0).unwrap()))
                .workday(workday)
                .build(),
        )
    }

    #[tokio::test]
    async fn should_follow_shift_boundaries() {
        let bus = Arc::new(InProcessEventBus::new(64));
        let mut rx = bus.subscribe();
        let registry = Arc::new(StateRegistry::new(Arc::clone(&bus)));
        let (tx, shutdown) = watch::channel(false);

        let sensor = CoverageSensor::new(EntryId::new(), schedule(WorkdayOverride::disabled()));
        let task = tokio::spawn(run_observer(
            sensor,
            Arc::clone(&registry),
            SteppingClock::at(utc(6, 5)),
            shutdown,
        ));

        // off (new) -> on at 06:00 -> off at 14:00
        let mut states = Vec::new();
        while states.len() < 3 {
            let event = rx.recv().await.unwrap();
            if event.event_type == EventType::StateChanged {
                states.push(event.data["to"].clone());
            }
        }
        tx.send(true).unwrap();
        task.await.unwrap();

        assert_eq!(states, vec!["off", "on", "off"]);
    }

    #[tokio::test]
    async fn should_refresh_when_watched_signal_changes() {
        let bus = Arc::new(InProcessEventBus::new(64));
        let registry = Arc::new(StateRegistry::new(Arc::clone(&bus)));
        let (tx, shutdown) = watch::channel(false);

        let sensor = DaySensor::today(
            EntryId::new(),
            schedule(WorkdayOverride::new(Some("binary_sensor.workday".into()), None)),
        );
        let mut rx = bus.subscribe();
        let task = tokio::spawn(run_observer(
            sensor,
            Arc::clone(&registry),
            FrozenClock(utc(6, 12)),
            shutdown,
        ));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.data["to"], 1);

        registry.set_signal("binary_sensor.workday", "off").await.unwrap();
        loop {
            let event = rx.recv().await.unwrap();
            if event.event_type == EventType::StateChanged {
                assert_eq!(event.data["to"], 0);
                break;
            }
        }

        tx.send(true).unwrap();
        task.await.unwrap();
        let entity = registry.get("sensor.crew_today").await.unwrap();
        assert_eq!(entity.state, EntityState::Numeric(0));
    }

    #[tokio::test]
    async fn should_stop_when_shutdown_sender_is_dropped() {
        let registry = Arc::new(StateRegistry::new(Arc::new(InProcessEventBus::new(16))));
        let (tx, shutdown) = watch::channel(false);
        let sensor = CoverageSensor::new(EntryId::new(), schedule(WorkdayOverride::disabled()));
        let task = tokio::spawn(run_observer(
            sensor,
            Arc::clone(&registry),
            FrozenClock(utc(6, 12)),
            shutdown,
        ));
        tokio::task::yield_now().await;
        drop(tx);
        task.await.unwrap();
        assert!(registry.get("binary_sensor.crew_on_shift").await.is_ok());
    }
}
