//! main file for the server

mod controller;
pub mod model;
mod remote;
mod scheduler;
mod service;
mod state;
mod util;

use std::io;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use tokio_util::sync::CancellationToken;
use crate::server::model::config::ServerConfig;
use crate::server::remote::postgrest::PostgrestStore;
use crate::server::scheduler::job::form_sweeper;
use crate::server::state::AppState;

/// Run the server
pub async fn run(
    ServerConfig { addr, remote, default_session_id, form_idle }: ServerConfig,
) -> io::Result<()> {
    let store = PostgrestStore::new(&remote).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let state = AppState::new(store, default_session_id);

    let cancel_token = CancellationToken::new();
    let sweeper = tokio::spawn(form_sweeper(state.get_forms(), form_idle, cancel_token.clone()));

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(controller::configure)
    })
        .bind(addr)?
        .run()
        .await;

    info!("server stopped, shutting down the form sweeper");
    cancel_token.cancel();
    if let Err(e) = sweeper.await {
        log::error!("form sweeper ended abnormally, {}", e);
    }
    result
}
