//! Entity state — the primary value an observer publishes.

use serde::{Serialize, Serializer};

/// Published state of an entity.
///
/// Binary sensors and calendars use [`On`](Self::On) / [`Off`](Self::Off);
/// day sensors publish the shift code as [`Numeric`](Self::Numeric).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityState {
    On,
    Off,
    Numeric(i64),
    #[default]
    Unknown,
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for EntityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(value) => serializer.serialize_i64(*value),
            other => serializer.collect_str(other),
        }
    }
}
