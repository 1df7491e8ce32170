use std::io;

use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::handlers;
use crate::state::AppState;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::handler))
        .route("/{token}", web::post().to(handlers::webhook::handler));
}

pub async fn run_server(state: AppState, port: u16) -> io::Result<()> {
    let state = web::Data::new(state);

    info!("Listening on 0.0.0.0:{}", port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(app_config))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
