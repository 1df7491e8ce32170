//! delivery_state - Delivery confirmation core
//!
//! Identifier normalization, the record store adapter over a tabular
//! backend, and the per-chat confirmation state machine.

pub mod error;
pub mod identifier;
pub mod machine;
pub mod record;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use error::{DeliveryError, SinkError, StoreError};
pub use identifier::{normalize, Identifier};
pub use machine::{
    Button, ButtonPayload, ConfirmationMachine, ConfirmationState, ConfirmationStyle, InboundEvent,
    OutboundAction, RecordingSink, ReplySink, StateTransition,
};
pub use record::{Record, RowLocator, SheetLayout, SheetRow};
pub use session::{InMemoryPendingStore, PendingConfirmation, PendingStore, SessionId};
pub use store::{MemorySheet, RecordStore, TabularStore};
