//! UUID-backed identifiers.
//!
//! [`EntryId`] prefixes every entity's unique id, so it must stay the same
//! across restarts for a given schedule. [`EntryId::for_schedule`] derives it
//! from the schedule name; [`EventId`] is random per event.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::slugify;

/// Namespace for name-derived entry ids.
const ENTRY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_3a9e_52d4_4b0e_9f8a_7d21_c4e6_b305);

macro_rules! uuid_newtype {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[must_use]
            pub const fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_newtype!(
    /// Identifies one configured schedule (a "config entry").
    EntryId
);

uuid_newtype!(
    /// Identifies one [`Event`](crate::event::Event).
    EventId
);

impl EntryId {
    /// Random id, for entries that are not tied to a configured name.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Stable id for the schedule called `name`.
    ///
    /// Names that map to the same entity slug map to the same id.
    #[must_use]
    pub fn for_schedule(name: &str) -> Self {
        Self(Uuid::new_v5(&ENTRY_NAMESPACE, slugify(name).as_bytes()))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}
