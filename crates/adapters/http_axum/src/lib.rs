//! # workshift-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the published entities (`/api/entities`)
//! - Accept workday **signal updates** from the host (`/api/signals`)
//! - Answer **calendar range queries** (`/api/calendars/{id}/events`)
//! - Stream bus events as **Server-Sent Events** (`/api/events/stream`)
//!
//! ## Dependency rule
//! Depends on `workshift-app` (registry and ports) and `workshift-domain`
//! (types used in request/response mapping). Never leaks axum types into
//! the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
