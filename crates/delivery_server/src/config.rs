use std::time::Duration;

use clap::{Parser, ValueEnum};
use delivery_state::ConfirmationStyle;

#[derive(Parser, Debug, Clone)]
#[command(name = "delivery-bot")]
#[command(about = "Telegram bot that marks deliveries in a Google Sheet")]
#[command(version)]
pub struct Cli {
    /// Telegram bot token, also the secret path of the webhook
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Spreadsheet id from the sheet URL
    #[arg(long, env = "SHEET_ID")]
    pub sheet_id: String,

    /// Service-account key file contents (JSON)
    #[arg(long, env = "GOOGLE_CREDENTIALS", hide_env_values = true)]
    pub google_credentials: String,

    /// Worksheet to use instead of the first one
    #[arg(long, env = "SHEET_NAME")]
    pub sheet_name: Option<String>,

    /// Public base URL; when set the webhook is registered at `{url}/{token}`
    #[arg(long, env = "RENDER_EXTERNAL_URL")]
    pub public_url: Option<String>,

    /// Server port
    #[arg(long, env = "PORT", default_value = "10000")]
    pub port: u16,

    /// How the operator confirms a lookup
    #[arg(long, env = "CONFIRMATION_STYLE", value_enum, default_value = "buttons")]
    pub confirmation_style: StyleArg,

    /// Seconds before a sheet call is abandoned, 0 waits forever
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value = "15")]
    pub store_timeout_secs: u64,

    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Log filter (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Buttons,
    Text,
}

impl Cli {
    pub fn style(&self) -> ConfirmationStyle {
        match self.confirmation_style {
            StyleArg::Buttons => ConfirmationStyle::Buttons,
            StyleArg::Text => ConfirmationStyle::TextCommands,
        }
    }

    pub fn store_timeout(&self) -> Option<Duration> {
        (self.store_timeout_secs > 0).then(|| Duration::from_secs(self.store_timeout_secs))
    }

    /// Full webhook URL, or `None` when no public URL is configured.
    pub fn webhook_url(&self) -> Option<String> {
        let base = self.public_url.as_deref()?.trim().trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        Some(format!("{}/{}", base, self.bot_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "delivery-bot",
            "--bot-token",
            "123:ABC",
            "--sheet-id",
            "sheet-id",
            "--google-credentials",
            "{}",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn webhook_url_appends_token() {
        let cli = parse(&["--public-url", "https://bot.onrender.com/"]);
        assert_eq!(
            cli.webhook_url().as_deref(),
            Some("https://bot.onrender.com/123:ABC")
        );
    }

    #[test]
    fn blank_public_url_skips_webhook() {
        let cli = parse(&["--public-url", "  "]);
        assert_eq!(cli.webhook_url(), None);
    }

    #[test]
    fn text_style_maps_to_text_commands() {
        let cli = parse(&["--confirmation-style", "text"]);
        assert_eq!(cli.style(), ConfirmationStyle::TextCommands);

        let cli = parse(&["--confirmation-style", "buttons"]);
        assert_eq!(cli.style(), ConfirmationStyle::Buttons);
    }

    #[test]
    fn zero_timeout_disables_limit() {
        assert_eq!(parse(&["--store-timeout-secs", "0"]).store_timeout(), None);
        assert_eq!(
            parse(&["--store-timeout-secs", "5"]).store_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn rejects_unknown_style() {
        let result = Cli::try_parse_from([
            "delivery-bot",
            "--bot-token",
            "t",
            "--sheet-id",
            "s",
            "--google-credentials",
            "{}",
            "--confirmation-style",
            "emoji",
        ]);
        assert!(result.is_err());
    }
}
