//! Delivery error types

use thiserror::Error;

/// Outcomes that stop a lookup or an update short.
///
/// `NotFound` and `StoreUnavailable` read the same to the chat user; they stay
/// separate here so the logs can tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid identifier")]
    InvalidIdentifier,

    #[error("record not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("update failed: {0}")]
    UpdateFailed(String),
}

/// Error reported by a [`TabularStore`](crate::store::TabularStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error reported by a [`ReplySink`](crate::machine::ReplySink) while delivering an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SinkError(pub String);

pub type Result<T, E = DeliveryError> = std::result::Result<T, E>;
