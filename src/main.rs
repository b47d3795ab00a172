use actix_web::{App, HttpServer, web};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer, filter::LevelFilter};
mod api;
use crate::api::{
    health::health_config,
    job::{handlers::job_config, JobService},
    validation,
};
mod cli;
mod config;
mod db;
mod shutdown;
use crate::cli::{Cli, Command};
use crate::db::job_repository::JobRepository;
use crate::shutdown::ShutdownCoordinator;

/// Daily rotating, uncolored log file for one level
fn file_layer<S>(log_dir: &str, name: &str, level: LevelFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, name))
        .with_ansi(false)
        .with_filter(level)
}

/// Console output plus daily rotating files per level:
/// logs/info.log.2024-12-22, logs/error.log.2024-12-22, ...
fn init_tracing(log_dir: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer(log_dir, "info.log", LevelFilter::INFO))
        .with(file_layer(log_dir, "warn.log", LevelFilter::WARN))
        .with(file_layer(log_dir, "error.log", LevelFilter::ERROR))
        .with(file_layer(log_dir, "debug.log", LevelFilter::DEBUG))
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config::Config {
        database_url,
        max_payload_size,
        max_db_connections,
        log_dir,
        host,
        port,
    } = config::Config::from_env()
        .expect("Failed to load configuration");

    std::fs::create_dir_all(&log_dir)
        .expect("Failed to create logs directory");
    init_tracing(&log_dir);

    let pool = db::connection::get_connection(&database_url, max_db_connections).await
        .expect("Failed to connect to database");

    info!("Starting jobs-api");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool).await
        .expect("Failed to run database migrations");

    if *cli.command() == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    let job_service = web::Data::new(JobService::new(Arc::new(JobRepository::new(pool.clone()))));

    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default()
            .limit(max_payload_size);

        App::new()
            .app_data(job_service.clone())
            .app_data(payload_config)
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", host, port);

    let server = server
        .bind((host.as_str(), port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);
    coordinator.wait_for_shutdown().await
}
