// File: ./src/model/error.rs
use std::fmt;

use crate::messages;

/// The kinds of records the model tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Profile,
    Event,
    Appointment,
}

/// Errors surfaced by the model layer. All of them are local and
/// non-retryable; callers turn them into user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Adding or editing would collide with a record of the same identity.
    Duplicate(EntityKind),
    /// The operation names a record the store does not track.
    NotFound(EntityKind),
    /// A field value failed its validation predicate.
    Validation(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Duplicate(EntityKind::Profile) => {
                write!(f, "{}", messages::MESSAGE_DUPLICATE_PROFILE)
            }
            ModelError::Duplicate(EntityKind::Event) => {
                write!(f, "{}", messages::MESSAGE_DUPLICATE_EVENT)
            }
            ModelError::Duplicate(EntityKind::Appointment) => {
                write!(f, "{}", messages::MESSAGE_DUPLICATE_APPOINTMENT)
            }
            ModelError::NotFound(EntityKind::Profile) => {
                write!(f, "{}", messages::MESSAGE_PROFILE_NOT_FOUND)
            }
            ModelError::NotFound(EntityKind::Event) => {
                write!(f, "{}", messages::MESSAGE_EVENT_NOT_FOUND)
            }
            ModelError::NotFound(EntityKind::Appointment) => {
                write!(f, "{}", messages::MESSAGE_APPOINTMENT_NOT_FOUND)
            }
            ModelError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ModelError {}
