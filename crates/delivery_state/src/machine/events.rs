//! Inbound chat events and outbound chat actions

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::session::SessionId;

/// What the transport hands to the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A plain text message.
    Text { session: SessionId, text: String },

    /// An inline button was pressed on a message the bot sent earlier.
    Button {
        session: SessionId,
        /// Message carrying the button, edited in place with the outcome.
        message_id: i64,
        /// Id of the press itself, used to acknowledge it.
        event_id: String,
        payload: String,
    },
}

impl InboundEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Text { session, .. } | Self::Button { session, .. } => *session,
        }
    }
}

/// What the machine asks the transport to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundAction {
    SendMessage {
        session: SessionId,
        text: String,
        /// Inline buttons shown in a single row. Empty for plain messages.
        buttons: Vec<Button>,
    },
    EditMessage {
        session: SessionId,
        message_id: i64,
        text: String,
    },
    AckButton {
        event_id: String,
        /// Toast text; empty acknowledges silently.
        text: String,
    },
}

impl OutboundAction {
    pub fn send(session: SessionId, text: impl Into<String>) -> Self {
        Self::SendMessage {
            session,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, Self::SendMessage { .. })
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Self::EditMessage { .. })
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Self::AckButton { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Confirm,
    Decline,
}

impl ButtonAction {
    fn tag(self) -> &'static str {
        match self {
            Self::Confirm => "ok",
            Self::Decline => "no",
        }
    }
}

/// Callback data carried by a button: `ok|<id>` or `no|<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPayload {
    pub action: ButtonAction,
    pub identifier: String,
}

impl ButtonPayload {
    pub fn confirm(identifier: &Identifier) -> Self {
        Self {
            action: ButtonAction::Confirm,
            identifier: identifier.to_string(),
        }
    }

    pub fn decline(identifier: &Identifier) -> Self {
        Self {
            action: ButtonAction::Decline,
            identifier: identifier.to_string(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, identifier) = raw.split_once('|')?;
        let action = match tag {
            "ok" => ButtonAction::Confirm,
            "no" => ButtonAction::Decline,
            _ => return None,
        };
        if identifier.is_empty() || identifier.contains('|') {
            return None;
        }
        Some(Self {
            action,
            identifier: identifier.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!("{}|{}", self.action.tag(), self.identifier)
    }
}

/// How a trimmed text message is read before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand {
    Start,
    Affirmative,
    Negative,
    Other,
}

impl TextCommand {
    pub fn classify(text: &str) -> Self {
        let command = text.split('@').next().unwrap_or(text);
        if command == "/start" || command == "/help" {
            return Self::Start;
        }

        match text.to_lowercase().as_str() {
            "si" | "sí" => Self::Affirmative,
            "no" => Self::Negative,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::normalize;

    #[test]
    fn payload_round_trips_through_callback_data() {
        let id = normalize("12345678Z").unwrap();
        assert_eq!(ButtonPayload::confirm(&id).encode(), "ok|12345678Z");
        assert_eq!(ButtonPayload::decline(&id).encode(), "no|12345678Z");
        assert_eq!(
            ButtonPayload::parse("ok|12345678Z"),
            Some(ButtonPayload::confirm(&id))
        );
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        for raw in ["", "ok", "ok|", "maybe|123", "ok|1|2", "|123"] {
            assert!(ButtonPayload::parse(raw).is_none(), "payload {raw:?}");
        }
    }

    #[test]
    fn classifies_confirmation_words() {
        assert_eq!(TextCommand::classify("si"), TextCommand::Affirmative);
        assert_eq!(TextCommand::classify("SÍ"), TextCommand::Affirmative);
        assert_eq!(TextCommand::classify("Sí"), TextCommand::Affirmative);
        assert_eq!(TextCommand::classify("No"), TextCommand::Negative);
        assert_eq!(TextCommand::classify("nope"), TextCommand::Other);
        assert_eq!(TextCommand::classify("12345678Z"), TextCommand::Other);
    }

    #[test]
    fn classifies_start_commands() {
        assert_eq!(TextCommand::classify("/start"), TextCommand::Start);
        assert_eq!(TextCommand::classify("/start@entregas_bot"), TextCommand::Start);
        assert_eq!(TextCommand::classify("/help"), TextCommand::Start);
        assert_eq!(TextCommand::classify("/stop"), TextCommand::Other);
    }

    #[test]
    fn event_reports_its_session() {
        let event = InboundEvent::Button {
            session: SessionId(42),
            message_id: 1,
            event_id: "cb".into(),
            payload: "ok|1".into(),
        };
        assert_eq!(event.session(), SessionId(42));
    }
}
