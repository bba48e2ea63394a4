//! Entity — a published snapshot of one observer's state.
//!
//! An entity is what the host sees: an id such as
//! `binary_sensor.night_crew_on_shift`, a state, and typed attributes.

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ValidationError, WorkshiftError};
use crate::time::{Timestamp, now};

/// Current state of one published entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Host-facing id, `<platform>.<object_id>`.
    pub entity_id: String,
    /// Stable id derived from the owning schedule entry.
    pub unique_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Last time `state` changed value.
    pub last_changed: Timestamp,
    /// Last time the entity was published, changed or not.
    pub last_updated: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshiftError::Validation`] when `entity_id` is empty.
    pub fn validate(&self) -> Result<(), WorkshiftError> {
        if self.entity_id.trim().is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        Ok(())
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Apply a fresh state and attribute set.
    ///
    /// `last_changed` only moves when the state value differs; `last_updated`
    /// always moves. Returns the previous state when it changed.
    pub fn apply(
        &mut self,
        state: EntityState,
        attributes: BTreeMap<String, AttributeValue>,
        at: Timestamp,
    ) -> Option<EntityState> {
        let previous = if self.state == state {
            None
        } else {
            self.last_changed = at;
            Some(std::mem::replace(&mut self.state, state))
        };
        self.attributes = attributes;
        self.last_updated = at;
        previous
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<String>,
    unique_id: Option<String>,
    friendly_name: Option<String>,
    state: EntityState,
    attributes: BTreeMap<String, AttributeValue>,
    timestamp: Option<Timestamp>,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: BTreeMap<String, AttributeValue>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set both `last_changed` and `last_updated`; defaults to now.
    #[must_use]
    pub fn timestamp(mut self, at: Timestamp) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkshiftError::Validation`] if `entity_id` is missing or empty.
    pub fn build(self) -> Result<Entity, WorkshiftError> {
        let at = self.timestamp.unwrap_or_else(now);
        let entity_id = self.entity_id.unwrap_or_default();
        let entity = Entity {
            unique_id: self.unique_id.unwrap_or_else(|| entity_id.clone()),
            friendly_name: self.friendly_name.unwrap_or_else(|| entity_id.clone()),
            entity_id,
            state: self.state,
            attributes: self.attributes,
            last_changed: at,
            last_updated: at,
        };
        entity.validate()?;
        Ok(entity)
    }
}

/// Lowercase `[a-z0-9_]` form of a display name, used in entity ids.
///
/// Runs of other characters collapse into a single `_`; an empty result
/// becomes `"workshift"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        "workshift".to_string()
    } else {
        slug
    }
}
