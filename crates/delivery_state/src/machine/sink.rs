//! Outbound side of the machine

use async_trait::async_trait;
use parking_lot::Mutex;

use super::events::OutboundAction;
use crate::error::SinkError;

/// Carries outbound actions to the chat platform.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn deliver(&self, action: OutboundAction) -> Result<(), SinkError>;
}

/// Sink that keeps every action it receives. Handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    actions: Mutex<Vec<OutboundAction>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<OutboundAction> {
        self.actions.lock().clone()
    }

    pub fn take(&self) -> Vec<OutboundAction> {
        std::mem::take(&mut *self.actions.lock())
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn deliver(&self, action: OutboundAction) -> Result<(), SinkError> {
        self.actions.lock().push(action);
        Ok(())
    }
}
