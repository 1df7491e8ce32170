use std::sync::Arc;

use delivery_state::{ConfirmationMachine, ReplySink};

pub struct AppState {
    /// Only updates posted to `/{bot_token}` are accepted.
    pub bot_token: String,
    pub machine: Arc<ConfirmationMachine>,
    pub sink: Arc<dyn ReplySink>,
}

impl AppState {
    pub fn new(
        bot_token: impl Into<String>,
        machine: Arc<ConfirmationMachine>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            machine,
            sink,
        }
    }
}
