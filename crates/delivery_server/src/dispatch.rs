//! Bot API side of the reply sink

use async_trait::async_trait;
use delivery_state::{Button, OutboundAction, ReplySink, SinkError};
use telegram_client::{InlineKeyboardButton, InlineKeyboardMarkup, TelegramClient};
use tracing::debug;

/// Sends machine actions to Telegram.
pub struct TelegramDispatcher {
    client: TelegramClient,
}

impl TelegramDispatcher {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReplySink for TelegramDispatcher {
    async fn deliver(&self, action: OutboundAction) -> Result<(), SinkError> {
        let result = match action {
            OutboundAction::SendMessage {
                session,
                text,
                buttons,
            } => {
                debug!("[{}] sendMessage", session);
                let markup = keyboard(&buttons);
                self.client
                    .send_message(session.0, &text, markup.as_ref())
                    .await
                    .map(|_| ())
            }
            OutboundAction::EditMessage {
                session,
                message_id,
                text,
            } => {
                debug!("[{}] editMessageText {}", session, message_id);
                self.client
                    .edit_message_text(session.0, message_id, &text)
                    .await
            }
            OutboundAction::AckButton { event_id, text } => {
                self.client
                    .answer_callback_query(&event_id, Some(&text))
                    .await
            }
        };
        result.map_err(|e| SinkError(e.to_string()))
    }
}

/// One row of inline buttons, or no keyboard at all.
pub fn keyboard(buttons: &[Button]) -> Option<InlineKeyboardMarkup> {
    if buttons.is_empty() {
        return None;
    }
    Some(InlineKeyboardMarkup::single_row(
        buttons
            .iter()
            .map(|b| InlineKeyboardButton {
                text: b.label.clone(),
                callback_data: b.payload.clone(),
            })
            .collect(),
    ))
}
