//! Wandersoul - REST backend for travel destinations and local guides

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{BootstrapAdminConfig, Config, ConfigSource, LoggingConfig};
use wandersoul_api::validation::normalize_email;
use wandersoul_api::{AppState, create_router};
use wandersoul_auth::JwtManager;
use wandersoul_db::{Database, NewUser, UserRole};

/// Wandersoul - travel destinations and local guides API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "WANDERSOUL_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "WANDERSOUL_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let (mut config, source) = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    config.validate()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting Wandersoul v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path),
        ConfigSource::Defaults(path) => {
            warn!("Config file not found at {}, using defaults", path)
        }
    }

    if config.auth.uses_default_secret() {
        warn!("Using the default JWT secret; set JWT_SECRET_KEY or auth.jwt_secret");
    }
    if config.auth.allow_admin_signup {
        warn!("Public registration may create administrators (auth.allow_admin_signup)");
    }

    // Initialize database
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create the configured admin if no users exist
    if let Some(admin) = &config.auth.bootstrap_admin {
        bootstrap_admin(&db, admin).await?;
    }

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));

    // Install the Prometheus recorder
    let metrics_handle = if config.metrics.enabled {
        Some(Arc::new(PrometheusBuilder::new().install_recorder()?))
    } else {
        None
    };

    // Create application state
    let state = AppState::new(db, jwt, config.auth.allow_admin_signup);

    // Create router
    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Create the first administrator on an empty user table
async fn bootstrap_admin(db: &Database, admin: &BootstrapAdminConfig) -> Result<()> {
    if db.has_users().await? {
        return Ok(());
    }

    info!("Creating bootstrap admin user");
    let password_hash = wandersoul_auth::hash_password(&admin.password)?;
    db.insert_user(NewUser {
        fname: admin.fname.clone(),
        sname: admin.sname.clone(),
        email: normalize_email(&admin.email),
        password_hash,
        role: UserRole::Admin,
    })
    .await?;
    info!("Bootstrap admin created (email: {})", admin.email);
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
