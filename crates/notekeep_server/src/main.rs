//! notekeep HTTP server entry point.

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use notekeep_core::init_logging;
use notekeep_server::{configure_routes, AppState, ServerConfig};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let config = ServerConfig::from_env().map_err(startup_error)?;
    init_logging(config.log_level, config.log_target.clone()).map_err(startup_error)?;

    let state = web::Data::new(AppState::from_config(&config).map_err(startup_error)?);
    info!(
        "event=server_start module=server status=ok bind={}:{} database={}",
        config.bind_addr,
        config.port,
        config.database_path.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}

fn startup_error(message: String) -> io::Error {
    eprintln!("notekeep: {message}");
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
