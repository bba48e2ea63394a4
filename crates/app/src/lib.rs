//! # workshift-app
//!
//! Application layer — observers, host infrastructure and **port definitions**.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement or provide:
//!   - `Clock` — current instant and cancellable one-shot wake-ups
//!   - `EventPublisher` / `EventSubscriber` — the event bus
//! - Provide **observers** that turn the domain resolver into published state:
//!   - `CoverageSensor` — on/off while a shift runs
//!   - `DaySensor` — shift code for today / tomorrow
//!   - `CalendarObserver` — current event and range queries
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (event bus, state registry)
//! - Manage the **integration lifecycle** (start, teardown, reload)
//!
//! ## Dependency rule
//! Depends on `workshift-domain` only (plus `tokio` for channels, timers and
//! file reads). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod event_bus;
pub mod integration;
pub mod label;
pub mod observers;
pub mod ports;
pub mod registry;
