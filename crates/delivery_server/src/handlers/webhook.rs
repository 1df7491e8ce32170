use actix_web::{web, HttpResponse};
use telegram_client::Update;
use tracing::{debug, warn};

use crate::state::AppState;
use crate::updates::inbound_event;

/// Telegram update endpoint.
///
/// Answers `200 ok` for anything posted to the right path, even when the
/// body is unreadable or handling fails, so Telegram does not redeliver.
pub async fn handler(
    state: web::Data<AppState>,
    token: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    if token.as_str() != state.bot_token {
        return HttpResponse::NotFound().finish();
    }

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            let update_id = update.update_id;
            match inbound_event(update) {
                Some(event) => {
                    state.machine.process(event, state.sink.as_ref()).await;
                }
                None => debug!("Update {} has nothing to handle", update_id),
            }
        }
        Err(e) => warn!("Discarding malformed update: {}", e),
    }

    HttpResponse::Ok().body("ok")
}
