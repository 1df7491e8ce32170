//! Telegram updates to machine events

use delivery_state::{InboundEvent, SessionId};
use telegram_client::Update;

/// The event an update carries, if any.
///
/// Messages become text events, with empty text when they carry none
/// (stickers, photos), so they are answered like any unreadable DNI. Button
/// presses become button events. Anything else (edits, presses on messages
/// too old to carry their origin) yields `None`.
pub fn inbound_event(update: Update) -> Option<InboundEvent> {
    if let Some(message) = update.message {
        return Some(InboundEvent::Text {
            session: SessionId(message.chat.id),
            text: message.text.unwrap_or_default(),
        });
    }

    let query = update.callback_query?;
    let message = query.message?;
    Some(InboundEvent::Button {
        session: SessionId(message.chat.id),
        message_id: message.message_id,
        event_id: query.id,
        payload: query.data.unwrap_or_default(),
    })
}
