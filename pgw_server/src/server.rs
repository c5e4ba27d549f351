use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use pgw_channels::Service;

use crate::{config::ServerConfig, errors::ServerError, routes::configure};

/// Loads `.env`, initialises logging and runs the server with configuration read from the environment. This is the
/// entry point for binaries embedding the gateway.
pub async fn run_from_env(service: Service) -> Result<(), ServerError> {
    dotenvy::dotenv().ok();
    let _ = env_logger::try_init();
    let config = ServerConfig::from_env_or_default();
    run_server(config, service).await
}

pub async fn run_server(config: ServerConfig, service: Service) -> Result<(), ServerError> {
    if service.channels().is_empty() {
        return Err(ServerError::InitializeError("No payment channels have been registered".into()));
    }
    let srv = create_server_instance(config, service)?;
    srv.await.map_err(ServerError::from)
}

pub fn create_server_instance(config: ServerConfig, service: Service) -> Result<Server, ServerError> {
    info!("💻️ Starting payment gateway on {}:{} with channels {:?}", config.host, config.port, service.channels());
    let service = web::Data::new(service);
    let app_config = web::Data::new(config.clone());
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pgw::access_log"))
            .app_data(service.clone())
            .app_data(app_config.clone())
            .configure(configure)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
