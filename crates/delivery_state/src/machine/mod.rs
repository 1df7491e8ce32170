//! Confirmation state machine
//!
//! Per-session yes/no flow for marking records as delivered.

mod events;
pub mod replies;
mod sink;
mod states;
mod transitions;

pub use events::{Button, ButtonAction, ButtonPayload, InboundEvent, OutboundAction, TextCommand};
pub use replies::ConfirmationStyle;
pub use sink::{RecordingSink, ReplySink};
pub use states::ConfirmationState;
pub use transitions::{ConfirmationMachine, StateTransition};
