mod config;
mod error;
mod job_controller;
mod services;

use crate::config::AppConfig;
use crate::job_controller::state::JobsState;
use crate::services::attachments::CertificateGenerator;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let url = format!("http://{}:{}", config.host, config.port);

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new(100);

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        job_controller::state::start_job_updater(updater_state, rx).await;
    });

    if config.access_token.is_none() {
        warn!("MAILMERGE_ACCESS_TOKEN is not set, only dry runs are possible");
    }
    info!("Server running at {}", url);

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    let certificates = CertificateGenerator::default();
    if certificates.provider().is_none() {
        warn!("No certificate generator installed, attached certificates are sent without images");
    }
    let certificates = web::Data::new(certificates);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(config.clone())
            .app_data(certificates.clone())
            .service(services::templates::configure_routes())
            .service(services::data_sources::csv::configure_routes())
            .service(services::merge::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
