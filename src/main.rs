use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod geo;
mod geofence;
mod model;
mod routes;
mod service;
mod storage;
mod store;
mod tracker;

use config::Config;

use crate::api::checkin::FixFeed;
use crate::docs::ApiDoc;
use crate::service::checkin::CheckInService;
use crate::service::message::MessageClient;
use crate::service::monitor::GeofenceMonitor;
use crate::storage::SlotFile;
use crate::store::identity::IdentityStore;
use crate::store::ledger::AttendanceLedger;
use crate::store::reference::ReferencePointStore;
use crate::tracker::{LocationTracker, reported_fix_feed};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "geocheckin"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    // The four persisted value slots
    let data_dir = PathBuf::from(&config.data_dir);
    let reference = Arc::new(ReferencePointStore::open(
        SlotFile::new(&data_dir, "reference.json"),
        config::DEFAULT_REFERENCE_LOCATION,
    )?);
    let ledger = Arc::new(AttendanceLedger::open(SlotFile::new(
        &data_dir,
        "ledger.json",
    ))?);
    let identity = Arc::new(IdentityStore::open(
        SlotFile::new(&data_dir, "users.json"),
        SlotFile::new(&data_dir, "session.json"),
    )?);

    // Continuous position watch, fed by device reports; released when the
    // monitor is dropped at shutdown.
    let (fix_tx, fix_source) = reported_fix_feed(64);
    let subscription =
        LocationTracker::start(fix_source, Duration::from_secs(config.fix_wait_secs));
    let monitor = Arc::new(GeofenceMonitor::start(
        subscription,
        reference.clone(),
        config.allowed_radius_m,
    ));

    let messages = MessageClient::from_config(
        config.message_service_url.clone(),
        Duration::from_millis(config.message_timeout_ms),
    );
    let checkin = Arc::new(CheckInService::new(
        ledger.clone(),
        monitor.clone(),
        messages,
    ));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::from(reference.clone()))
            .app_data(Data::from(ledger.clone()))
            .app_data(Data::from(identity.clone()))
            .app_data(Data::from(monitor.clone()))
            .app_data(Data::from(checkin.clone()))
            .app_data(Data::new(FixFeed(fix_tx.clone())))
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
