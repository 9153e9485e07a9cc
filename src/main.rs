use crate::security::auth::AuthService;
use crate::services::reports::ReportService;
use crate::services::sheets::{NotificationSink, SheetsForwarder};
use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod error;
mod security;
mod services;

pub use error::Error;

async fn run_app() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Pulse maintenance checklist service");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    // Create the in-memory stores and seed the default accounts
    let stores = db::StoreService::new().await;

    // Create auth service
    let auth_service = Arc::new(AuthService::new(
        stores.users.clone(),
        stores.otp_codes.clone(),
        &config.security,
    ));

    // Create the spreadsheet forwarder and report service
    let sink: Arc<dyn NotificationSink> = Arc::new(SheetsForwarder::new(&config.sheets)?);
    let report_service = Arc::new(ReportService::new(
        stores.users.clone(),
        stores.reports.clone(),
        sink,
    ));

    // Start the REST API; this blocks until the server stops
    let http_server = api::rest::RestApi::new(
        &config.api,
        auth_service,
        report_service,
        &config.security,
    )?;
    http_server.run().await
}

fn main() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    if let Err(e) = runtime.block_on(run_app()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
