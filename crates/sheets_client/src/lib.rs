//! Google Sheets client
//!
//! Reads and updates one worksheet through the Sheets v4 REST API and exposes
//! it to the delivery core as a [`delivery_state::TabularStore`].

pub mod auth;
pub mod client;
pub mod error;
pub mod store;

pub use auth::{AccessTokenSource, ServiceAccountAuth, ServiceAccountKey, StaticToken};
pub use client::{column_letters, SheetsClient, DEFAULT_API_BASE};
pub use error::{Result, SheetsError};
pub use store::rows_from_values;
