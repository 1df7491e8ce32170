use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use delivery_server::logging::init_logging;
use delivery_server::{run_server, AppState, Cli, TelegramDispatcher};
use delivery_state::{ConfirmationMachine, InMemoryPendingStore, RecordStore};
use sheets_client::SheetsClient;
use telegram_client::TelegramClient;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_level.as_deref());

    info!("Starting delivery bot on port {}", cli.port);
    info!("  Confirmation style: {:?}", cli.style());

    let mut sheets = SheetsClient::from_service_account(&cli.sheet_id, &cli.google_credentials)
        .context("failed to load Google credentials")?;
    if let Some(name) = &cli.sheet_name {
        info!("  Worksheet: {}", name);
        sheets = sheets.with_sheet_title(name.clone());
    }

    let mut store = RecordStore::new(Arc::new(sheets));
    if let Some(timeout) = cli.store_timeout() {
        store = store.with_timeout(timeout);
    }
    let machine = ConfirmationMachine::new(store, Arc::new(InMemoryPendingStore::new()))
        .with_style(cli.style());

    let telegram = TelegramClient::new(cli.bot_token.clone());
    match cli.webhook_url() {
        Some(url) => telegram
            .set_webhook(&url)
            .await
            .context("failed to register webhook")?,
        None => warn!("RENDER_EXTERNAL_URL not set, leaving the webhook as it is"),
    }

    let state = AppState::new(
        cli.bot_token.clone(),
        Arc::new(machine),
        Arc::new(TelegramDispatcher::new(telegram)),
    );
    run_server(state, cli.port).await.context("server stopped")
}
