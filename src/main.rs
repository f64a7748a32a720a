//! ObjectGate - Minimal authenticated HTTP gateway for object storage
//!
//! A thin HTTP front for a single backing bucket, gated by a
//! shared-secret authorization rule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use objectgate::config::GatewayConfig;
use objectgate::error::Result;
use objectgate::gateway::GatewayServer;
use objectgate::store::Bucket;

/// ObjectGate - Minimal authenticated HTTP gateway for object storage
#[derive(Parser)]
#[command(name = "objectgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "objectgate.toml")]
    config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway
    Start,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "objectgate.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => run_start(cli.config, cli.log_level).await,
        Commands::Init { output } => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"), "pretty");
            run_init(output)
        }
        Commands::Validate => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"), "pretty");
            run_validate(cli.config)
        }
    }
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Start the gateway
async fn run_start(config_path: PathBuf, log_level: Option<String>) -> Result<()> {
    // Config comes first so logging can honor its level and format; load
    // failures are reported on stderr directly.
    let config = match GatewayConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {:?}: {}", config_path, e);
            eprintln!("Please check that the config file exists and is valid TOML");
            return Err(e);
        }
    };

    let level = log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, &config.logging.format);

    tracing::info!("Starting ObjectGate...");
    tracing::info!(
        "Storage backend: {} ({})",
        config.storage.backend,
        config.storage.root.display()
    );
    if config.auth.secret.is_none() {
        tracing::warn!("No auth secret configured; PUT and DELETE requests will be denied");
    }
    tracing::info!(
        "Unauthenticated reads allowed for {} key(s)",
        config.auth.allow_list.len()
    );

    let bucket = match Bucket::from_config(&config.storage) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("Failed to initialize storage backend: {}", e);
            return Err(e);
        }
    };

    let server = GatewayServer::new(config, bucket);
    server.start().await
}

/// Write an example configuration file
fn run_init(output: PathBuf) -> Result<()> {
    if output.exists() {
        return Err(objectgate::Error::Config(format!(
            "refusing to overwrite existing file {:?}",
            output
        )));
    }

    let config = GatewayConfig::example();
    config.to_file(&output)?;
    tracing::info!("Wrote example configuration to {:?}", output);
    tracing::info!("Edit auth.secret before deploying");
    Ok(())
}

/// Validate configuration file
fn run_validate(config_path: PathBuf) -> Result<()> {
    match GatewayConfig::from_file(&config_path) {
        Ok(config) => {
            tracing::info!("Configuration {:?} is valid", config_path);
            tracing::info!("  server.bind_address = {}", config.server.bind_address);
            tracing::info!("  storage.backend = {}", config.storage.backend);
            tracing::info!(
                "  auth.secret = {}",
                if config.auth.secret.is_some() { "(set)" } else { "(unset)" }
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Configuration {:?} is invalid: {}", config_path, e);
            Err(e)
        }
    }
}
