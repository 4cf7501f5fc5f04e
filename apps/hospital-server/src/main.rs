use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header, Method};
use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use hospital_api::api::rest::{routes, AppState};
use hospital_api::domain::auth::TokenSigner;
use hospital_api::domain::service::Service;
use hospital_api::infra::storage::migrations::Migrator;

mod config;

use config::{AppConfig, DEV_JWT_SECRET};

/// Hospital Dashboard API server
#[derive(Parser)]
#[command(name = "hospital-server")]
#[command(about = "Hospital administration dashboard backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},hospital_api={default_level}")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    if config.auth.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("Using the built-in development JWT secret; set auth.jwt_secret");
    }

    let mut connect_opts = ConnectOptions::new(config.database.url.clone());
    connect_opts
        .max_connections(config.database.max_conns)
        .acquire_timeout(Duration::from_secs(5));

    tracing::info!("Connecting to database: {}", config.database.url);
    let db = Database::connect(connect_opts)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    let tokens = TokenSigner::new(&config.auth.jwt_secret, config.auth.token_ttl_days);
    let service = Arc::new(Service::new(db, tokens));
    let state = AppState::new(service, config.auth.secure_cookies);

    let origins: Vec<_> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let mut app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    if config.server.timeout_sec > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Hospital server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    } else {
        tracing::info!("Shutdown signal received");
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
