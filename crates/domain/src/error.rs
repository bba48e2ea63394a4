//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`WorkshiftError`] via `#[from]`.

/// Top-level error for domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkshiftError {
    /// Input rejected by a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A requested item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A failure in the host infrastructure (event bus, label files, …).
    #[error("host error")]
    Host(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations.
///
/// Schedule-related variants display as the stable keys a configuration
/// front-end can map to user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty_name")]
    EmptyName,

    #[error("name_exists: {0}")]
    DuplicateName(String),

    #[error("empty_entity_id")]
    EmptyEntityId,

    #[error("invalid_shift_hours: {0} (expected 1-24)")]
    InvalidShiftHours(u32),

    #[error("invalid_shifts_per_day: {0} (expected 1-9)")]
    InvalidShiftsPerDay(u32),

    #[error("invalid_shift_start_format: {0:?}")]
    InvalidShiftStartFormat(String),

    #[error("invalid_shift_start_order: {0:?}")]
    InvalidShiftStartOrder(String),

    #[error("shift_start_count_mismatch: expected {expected}, got {actual}")]
    ShiftStartCountMismatch { expected: usize, actual: usize },

    #[error("invalid_schedule_date: {0:?}")]
    InvalidScheduleDate(String),

    #[error("invalid_schedule_pattern")]
    InvalidSchedulePattern,

    #[error("invalid_schedule_digit: {digit} exceeds {shifts_per_day} shifts")]
    InvalidScheduleDigit { digit: u32, shifts_per_day: u32 },

    #[error("invalid_day_off: {0:?}")]
    InvalidDayOff(String),

    #[error("workday_required")]
    WorkdayEntityRequired,

    #[error("invalid_time_zone: {0:?}")]
    InvalidTimeZone(String),

    #[error("too_many_shift_names: {names} names for {shifts_per_day} shifts")]
    TooManyShiftNames { names: usize, shifts_per_day: u32 },

    #[error("invalid_range: end must be after start")]
    InvalidRange,
}

/// Lookup miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl WorkshiftError {
    /// Wrap any host-side failure.
    pub fn host(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Host(Box::new(err))
    }
}
