//! delivery_server - Webhook front end of the delivery bot
//!
//! Receives Telegram updates over HTTP, feeds them to the confirmation
//! machine and sends the replies back through the Bot API.

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;
pub mod updates;

pub use config::Cli;
pub use dispatch::TelegramDispatcher;
pub use server::{app_config, run_server};
pub use state::AppState;
