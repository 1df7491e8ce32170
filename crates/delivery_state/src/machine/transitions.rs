//! Confirmation state machine
//!
//! Reads one inbound event, consults the record store and the pending
//! registry, and decides which chat actions to emit.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::events::{Button, ButtonAction, ButtonPayload, InboundEvent, OutboundAction, TextCommand};
use super::replies::{self, ConfirmationStyle};
use super::sink::ReplySink;
use super::states::ConfirmationState;
use crate::error::DeliveryError;
use crate::identifier::{normalize, Identifier};
use crate::session::{PendingConfirmation, PendingStore, SessionId, SessionLocks};
use crate::store::RecordStore;

/// Result of handling one event.
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub session: SessionId,
    /// The state before the event.
    pub from: ConfirmationState,
    /// The state after the event.
    pub to: ConfirmationState,
    /// Actions emitted, in delivery order.
    pub actions: Vec<OutboundAction>,
    /// Whether the state actually changed.
    pub changed: bool,
}

pub struct ConfirmationMachine {
    store: RecordStore,
    pending: Arc<dyn PendingStore>,
    locks: SessionLocks,
    style: ConfirmationStyle,
}

impl ConfirmationMachine {
    pub fn new(store: RecordStore, pending: Arc<dyn PendingStore>) -> Self {
        Self {
            store,
            pending,
            locks: SessionLocks::new(),
            style: ConfirmationStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ConfirmationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> ConfirmationStyle {
        self.style
    }

    pub async fn state(&self, session: SessionId) -> ConfirmationState {
        self.pending.get(session).await.into()
    }

    /// Handle `event` and deliver its actions through `sink`.
    ///
    /// Events of one session are fully processed, replies included, before
    /// the next one for that session starts.
    pub async fn process(&self, event: InboundEvent, sink: &dyn ReplySink) -> StateTransition {
        let session = event.session();
        let _guard = self.locks.acquire(session).await;

        let transition = self.handle_event(event).await;

        for action in transition.actions.iter().cloned() {
            if let Err(e) = sink.deliver(action).await {
                error!("[{}] Failed to deliver reply: {}", session, e);
            }
        }

        if transition.changed {
            debug!(
                "[{}] State changed: {:?} -> {:?}",
                session, transition.from, transition.to
            );
        }
        transition
    }

    async fn handle_event(&self, event: InboundEvent) -> StateTransition {
        let session = event.session();
        let from = self.state(session).await;

        let actions = match event {
            InboundEvent::Text { text, .. } => self.on_text(session, &from, text.trim()).await,
            InboundEvent::Button {
                message_id,
                event_id,
                payload,
                ..
            } => self.on_button(session, message_id, event_id, &payload).await,
        };

        let to = self.state(session).await;
        StateTransition {
            session,
            changed: from != to,
            from,
            to,
            actions,
        }
    }

    async fn on_text(
        &self,
        session: SessionId,
        state: &ConfirmationState,
        text: &str,
    ) -> Vec<OutboundAction> {
        let command = TextCommand::classify(text);

        match (command, state.pending_identifier()) {
            (TextCommand::Start, _) => vec![OutboundAction::send(session, replies::INSTRUCTIONS)],

            (TextCommand::Affirmative, Some(identifier)) => {
                let outcome = self.store.mark_delivered(identifier).await;
                self.pending.remove(session).await;
                vec![OutboundAction::send(
                    session,
                    self.update_reply(session, identifier, outcome),
                )]
            }

            (TextCommand::Negative, Some(identifier)) => {
                self.pending.remove(session).await;
                info!("[{}] Left {} unchanged", session, identifier);
                vec![OutboundAction::send(session, replies::NO_CHANGES)]
            }

            // Anything else is a fresh lookup. A pending confirmation stays
            // in place until a later lookup overwrites it.
            _ => self.lookup(session, text).await,
        }
    }

    async fn lookup(&self, session: SessionId, text: &str) -> Vec<OutboundAction> {
        let identifier = match normalize(text) {
            Ok(identifier) => identifier,
            Err(_) => {
                debug!("[{}] Rejected identifier {:?}", session, text);
                return vec![OutboundAction::send(session, replies::INVALID_IDENTIFIER)];
            }
        };

        let record = match self.store.find_by_identifier(&identifier).await {
            Ok(record) => record,
            Err(DeliveryError::NotFound) => {
                info!("[{}] {} not in sheet", session, identifier);
                return vec![OutboundAction::send(session, replies::not_found(&identifier))];
            }
            Err(e) => {
                warn!("[{}] Lookup of {} failed: {}", session, identifier, e);
                return vec![OutboundAction::send(session, replies::not_found(&identifier))];
            }
        };

        if record.delivered {
            info!("[{}] {} already delivered", session, identifier);
            return vec![OutboundAction::send(
                session,
                replies::already_delivered(&record.display_name),
            )];
        }

        self.pending
            .put(PendingConfirmation {
                session,
                identifier: identifier.clone(),
            })
            .await;
        info!("[{}] Awaiting confirmation for {}", session, identifier);

        vec![self.confirmation_prompt(session, &identifier, &record.display_name)]
    }

    fn confirmation_prompt(
        &self,
        session: SessionId,
        identifier: &Identifier,
        display_name: &str,
    ) -> OutboundAction {
        let buttons = match self.style {
            ConfirmationStyle::Buttons => vec![
                Button {
                    label: replies::BUTTON_CONFIRM.to_string(),
                    payload: ButtonPayload::confirm(identifier).encode(),
                },
                Button {
                    label: replies::BUTTON_DECLINE.to_string(),
                    payload: ButtonPayload::decline(identifier).encode(),
                },
            ],
            ConfirmationStyle::TextCommands => Vec::new(),
        };

        OutboundAction::SendMessage {
            session,
            text: replies::confirm_prompt(display_name, self.style),
            buttons,
        }
    }

    async fn on_button(
        &self,
        session: SessionId,
        message_id: i64,
        event_id: String,
        raw_payload: &str,
    ) -> Vec<OutboundAction> {
        let Some(payload) = ButtonPayload::parse(raw_payload) else {
            warn!("[{}] Ignoring malformed button payload {:?}", session, raw_payload);
            return vec![OutboundAction::AckButton {
                event_id,
                text: String::new(),
            }];
        };

        self.pending.remove(session).await;

        match payload.action {
            ButtonAction::Confirm => {
                let (ack, text) = match normalize(&payload.identifier) {
                    Ok(identifier) => {
                        let outcome = self.store.mark_delivered(&identifier).await;
                        let ack = if outcome.is_ok() {
                            replies::ACK_DELIVERED
                        } else {
                            replies::ACK_FAILED
                        };
                        (ack, self.update_reply(session, &identifier, outcome))
                    }
                    Err(_) => {
                        warn!(
                            "[{}] Button carried invalid identifier {:?}",
                            session, payload.identifier
                        );
                        (replies::ACK_FAILED, replies::UPDATE_FAILED.to_string())
                    }
                };

                vec![
                    OutboundAction::AckButton {
                        event_id,
                        text: ack.to_string(),
                    },
                    OutboundAction::EditMessage {
                        session,
                        message_id,
                        text,
                    },
                ]
            }
            ButtonAction::Decline => {
                info!("[{}] Left {} unchanged", session, payload.identifier);
                vec![
                    OutboundAction::AckButton {
                        event_id,
                        text: replies::ACK_NO_CHANGES.to_string(),
                    },
                    OutboundAction::EditMessage {
                        session,
                        message_id,
                        text: replies::unchanged(&payload.identifier),
                    },
                ]
            }
        }
    }

    fn update_reply(
        &self,
        session: SessionId,
        identifier: &Identifier,
        outcome: Result<(), DeliveryError>,
    ) -> String {
        match outcome {
            Ok(()) => replies::delivered(identifier),
            Err(e) => {
                warn!("[{}] Could not mark {} delivered: {}", session, identifier, e);
                replies::UPDATE_FAILED.to_string()
            }
        }
    }
}
