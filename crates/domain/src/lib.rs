//! # workshift-domain
//!
//! Pure domain model for the workshift system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **schedule configuration** (pattern, anchor date, start times,
//!   manual days off, workday override, time zone)
//! - Resolve **shift occurrences** for a date or an instant
//! - Define **entity snapshots** (the state observers publish) and **events**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! The resolver never reads the wall clock: callers pass "today" explicitly.

pub mod error;
pub mod id;
pub mod time;

pub mod entity;
pub mod event;
pub mod schedule;
