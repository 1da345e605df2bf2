use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use studyhive::ai::AiService;
use studyhive::catalog;
use studyhive::config::AppConfig;
use studyhive::error::AppResult;
use studyhive::handlers::AppState;
use studyhive::routes;
use studyhive::store::Store;

#[actix_web::main]
async fn main() -> AppResult<()> {
    let matches = Command::new("studyhive")
        .version(env!("CARGO_PKG_VERSION"))
        .about("studyhive - student Q&A knowledge-base server")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Populate the store with sample student content")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("studyhive=info".parse().unwrap()))
        .init();

    tracing::info!("Starting studyhive server");

    // Load configuration
    let config = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::load_from_file(&PathBuf::from(path))?,
        None => AppConfig::load()?,
    };

    // Open the file-backed store
    let store = Arc::new(Store::open(&config.storage.data_dir)?);
    tracing::info!("Store opened at {:?}", config.storage.data_dir);

    if matches.get_flag("seed") {
        let added = catalog::seed_samples(&store)?;
        tracing::info!("Seeded {added} sample Q&A pairs");
    }

    let ai = Arc::new(AiService::from_config(&config));

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = web::Data::new(AppState {
        store,
        ai,
        config: Arc::new(config),
        start_time: SystemTime::now(),
    });

    tracing::info!("Starting HTTP server on {}", server_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(routes::configure_routes)
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
