//! Confirmation states

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::session::PendingConfirmation;

/// Where a session stands. Derived from the pending-confirmation registry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    /// Nothing waiting for an answer.
    #[default]
    Idle,

    /// A record was shown and the session has not answered yes or no yet.
    AwaitingConfirmation { identifier: Identifier },
}

impl From<Option<PendingConfirmation>> for ConfirmationState {
    fn from(pending: Option<PendingConfirmation>) -> Self {
        match pending {
            Some(pending) => Self::AwaitingConfirmation {
                identifier: pending.identifier,
            },
            None => Self::Idle,
        }
    }
}

impl ConfirmationState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingConfirmation { .. })
    }

    pub fn pending_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::AwaitingConfirmation { identifier } => Some(identifier),
            Self::Idle => None,
        }
    }
}
