// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coalescer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::WhiteMode;
use crate::error::{ConfigError, Error, ParseError};
use crate::event::DEFAULT_EVENT_CAPACITY;
use crate::field::{ConflictGroups, FieldId, FieldSet};

/// Default debounce window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

/// Fields whose zero sentinel turns the light off by default.
pub const DEFAULT_OFF_TRIGGERS: FieldSet = FieldSet::of(&[FieldId::Power, FieldId::Brightness]);

/// Configuration for a [`CommandCoalescer`](super::CommandCoalescer).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use accessory_coalescer::coalescer::{CoalescerConfig, WhiteMode};
///
/// // Full color light with a shorter window
/// let config = CoalescerConfig::light()
///     .with_window(Duration::from_millis(250))
///     .with_entity_id("light.living_room");
/// assert!(config.validate().is_ok());
///
/// // Night-light with a dedicated white channel
/// let config = CoalescerConfig::light().with_white_mode(WhiteMode::WhiteLevel);
///
/// // From JSON
/// let config = CoalescerConfig::from_json(
///     r#"{"window_ms": 300, "fields": ["power", "brightness"], "conflicts": []}"#,
/// ).unwrap();
/// assert_eq!(config.window, Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescerConfig {
    /// Quiet period after the last write before the batch is flushed.
    #[serde(rename = "window_ms", with = "window_ms")]
    pub window: Duration,
    /// Fields this light accepts. Writes to other fields are ignored.
    pub fields: FieldSet,
    /// Mutually exclusive field groups.
    pub conflicts: ConflictGroups,
    /// Fields whose zero sentinel requests power-off.
    pub off_triggers: FieldSet,
    /// How color temperature writes are expressed downstream.
    pub white_mode: WhiteMode,
    /// Flush a pending batch at teardown instead of discarding it.
    pub flush_on_teardown: bool,
    /// Target entity added to every service call.
    pub entity_id: Option<String>,
    /// Event bus capacity.
    pub event_capacity: usize,
}

impl CoalescerConfig {
    /// Configuration for a full color light: every field, color temperature
    /// conflicting with hue/saturation.
    #[must_use]
    pub fn light() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            fields: FieldSet::ALL,
            conflicts: ConflictGroups::default(),
            off_triggers: DEFAULT_OFF_TRIGGERS,
            white_mode: WhiteMode::default(),
            flush_on_teardown: false,
            entity_id: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Configuration for a dimmable single-channel light: power and
    /// brightness, no conflicts.
    #[must_use]
    pub fn dimmable() -> Self {
        Self {
            fields: FieldSet::of(&[FieldId::Power, FieldId::Brightness]),
            conflicts: ConflictGroups::none(),
            ..Self::light()
        }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// Missing keys take their [`CoalescerConfig::light`] value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for malformed JSON and `Error::Config` if the
    /// result fails [`CoalescerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the debounce window.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the accepted fields.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the conflict groups.
    #[must_use]
    pub fn with_conflicts(mut self, conflicts: ConflictGroups) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// Sets the fields whose zero sentinel requests power-off.
    ///
    /// A `Power(false)` write always turns the light off regardless.
    #[must_use]
    pub fn with_off_triggers(mut self, triggers: FieldSet) -> Self {
        self.off_triggers = triggers;
        self
    }

    /// Sets how color temperature writes are expressed.
    #[must_use]
    pub fn with_white_mode(mut self, mode: WhiteMode) -> Self {
        self.white_mode = mode;
        self
    }

    /// Flush (rather than discard) a pending batch at teardown.
    #[must_use]
    pub fn with_flush_on_teardown(mut self, flush: bool) -> Self {
        self.flush_on_teardown = flush;
        self
    }

    /// Sets the target entity for service calls.
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Sets the event bus capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroWindow`, `ConfigError::ZeroEventCapacity`,
    /// or the first conflict group violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        self.conflicts.validate()
    }
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self::light()
    }
}

mod window_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(window: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(window.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_defaults() {
        let config = CoalescerConfig::light();
        assert_eq!(config.window, Duration::from_millis(500));
        assert_eq!(config.fields, FieldSet::ALL);
        assert_eq!(config.white_mode, WhiteMode::ColorTemperature);
        assert!(!config.flush_on_teardown);
        assert_eq!(config, CoalescerConfig::default());
    }

    #[test]
    fn dimmable_has_no_color() {
        let config = CoalescerConfig::dimmable();
        assert!(!config.fields.contains(FieldId::Hue));
        assert!(config.conflicts.groups().is_empty());
        assert_eq!(config.window, DEFAULT_WINDOW);
    }

    #[test]
    fn builder_sets_fields() {
        let config = CoalescerConfig::light()
            .with_window(Duration::from_secs(1))
            .with_off_triggers(FieldSet::of(&[FieldId::Power]))
            .with_flush_on_teardown(true)
            .with_entity_id("light.desk")
            .with_event_capacity(8);

        assert_eq!(config.window, Duration::from_secs(1));
        assert!(!config.off_triggers.contains(FieldId::Brightness));
        assert!(config.flush_on_teardown);
        assert_eq!(config.entity_id.as_deref(), Some("light.desk"));
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn validate_rejects_zero_window() {
        let config = CoalescerConfig::light().with_window(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = CoalescerConfig::light().with_event_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroEventCapacity));
    }

    #[test]
    fn validate_rejects_empty_group() {
        let config = CoalescerConfig::light()
            .with_conflicts(ConflictGroups::new(vec![FieldSet::EMPTY]));
        assert_eq!(config.validate(), Err(ConfigError::EmptyConflictGroup(0)));
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = CoalescerConfig::from_json(
            r#"{
                "window_ms": 200,
                "white_mode": "white_level",
                "entity_id": "light.projector"
            }"#,
        )
        .unwrap();

        assert_eq!(config.window, Duration::from_millis(200));
        assert_eq!(config.white_mode, WhiteMode::WhiteLevel);
        assert_eq!(config.entity_id.as_deref(), Some("light.projector"));
        assert_eq!(config.conflicts, ConflictGroups::default());
    }

    #[test]
    fn from_json_validates() {
        let err = CoalescerConfig::from_json(r#"{"window_ms": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroWindow)));
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = CoalescerConfig::from_json("{").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Json(_))));
    }

    #[test]
    fn json_round_trip() {
        let config = CoalescerConfig::dimmable().with_window(Duration::from_millis(750));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""window_ms":750"#));
        assert_eq!(CoalescerConfig::from_json(&json).unwrap(), config);
    }
}
