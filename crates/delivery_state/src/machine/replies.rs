//! Reply texts shown to chat users. These strings are part of the bot's
//! visible behaviour; keep them byte-for-byte.

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

pub const INSTRUCTIONS: &str = "Envíame un DNI (ej. 12345678Z).";
pub const INVALID_IDENTIFIER: &str = "DNI no válido.";
pub const UPDATE_FAILED: &str = "❌ Error";
pub const NO_CHANGES: &str = "Sin cambios.";

pub const BUTTON_CONFIRM: &str = "✅ Sí";
pub const BUTTON_DECLINE: &str = "❌ No";

pub const ACK_DELIVERED: &str = "✅";
pub const ACK_FAILED: &str = "❌";
pub const ACK_NO_CHANGES: &str = "Sin cambios";

/// How the yes/no choice is offered to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStyle {
    /// Inline `ok|<id>` / `no|<id>` buttons.
    #[default]
    Buttons,
    /// Ask the user to type "si" or "no".
    TextCommands,
}

pub fn delivered(identifier: &Identifier) -> String {
    format!("✅ {}", identifier)
}

pub fn not_found(identifier: &Identifier) -> String {
    format!("❌ {} no encontrado.", identifier)
}

pub fn already_delivered(display_name: &str) -> String {
    format!("✅ {} – Ya entregado.", display_name)
}

pub fn unchanged(identifier: &str) -> String {
    format!("{}: sin cambios", identifier)
}

pub fn confirm_prompt(display_name: &str, style: ConfirmationStyle) -> String {
    match style {
        ConfirmationStyle::Buttons => format!("📋 {}\n\n¿Marcar?", display_name),
        ConfirmationStyle::TextCommands => format!("📋 {}\n\n¿Marcar? (si/no)", display_name),
    }
}
