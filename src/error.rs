// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the coalescer library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: value validation, configuration, parsing, and the downstream
//! action's own error contract.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing input.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The coalescer configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The downstream action reported a failure.
    #[error("action error: {0}")]
    Action(#[from] ActionError),

    /// No tokio runtime was available to schedule timers on.
    #[error("no tokio runtime available")]
    NoRuntime,
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A saturation value is outside the valid range (0-100).
    #[error("saturation value {0} is out of range [0, 100]")]
    InvalidSaturation(u8),

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u8),
}

/// Errors related to parsing identifiers and JSON input.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field identifier was not recognized.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A characteristic write carried a value of the wrong JSON type.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field being written.
        field: crate::field::FieldId,
        /// The offending JSON value.
        value: String,
    },

    /// A colour mode string was not recognized.
    #[error("unknown color mode: {0}")]
    UnknownColorMode(String),
}

/// Errors related to coalescer configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The debounce window must be longer than zero.
    #[error("debounce window must be non-zero")]
    ZeroWindow,

    /// A conflict group was declared without any fields.
    #[error("conflict group {0} is empty")]
    EmptyConflictGroup(usize),

    /// Two conflict groups share a field.
    #[error("field {field} appears in more than one conflict group")]
    OverlappingConflictGroups {
        /// The shared field.
        field: String,
    },

    /// The event channel needs room for at least one event.
    #[error("event capacity must be non-zero")]
    ZeroEventCapacity,
}

/// Errors returned by a downstream action.
///
/// The coalescer never retries; these are reported on the event bus and in
/// the log, then the batch is dropped.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The target refused the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The target is currently unreachable.
    #[error("target unavailable: {0}")]
    Unavailable(String),

    /// Any other failure from the downstream implementation.
    #[error(transparent)]
    Failed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
