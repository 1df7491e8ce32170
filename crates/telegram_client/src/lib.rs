//! Telegram Bot API client
//!
//! Covers the handful of methods a webhook bot needs: sending and editing
//! messages, answering button presses, and registering the webhook.

pub mod client;
pub mod error;
pub mod types;

pub use client::{TelegramClient, DEFAULT_API_BASE};
pub use error::{Result, TelegramError};
pub use types::{CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update};
