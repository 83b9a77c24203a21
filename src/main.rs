//! Weather Gateway - cached current-weather lookups by city name

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use weather_gateway::{
    cli::{Cli, Command},
    config::Config,
    gateway::{Gateway, validate_city},
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing
    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(mut config) => {
            // Apply CLI overrides
            if let Some(port) = cli.port {
                config.server.port = port;
            }
            if let Some(ref host) = cli.host {
                config.server.host = host.clone();
            }
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Some(Command::Lookup { city }) => run_lookup(config, &city).await,
        Some(Command::Serve) | None => run_server(config).await,
    }
}

/// Run a single lookup and print the response
async fn run_lookup(config: Config, city: &str) -> ExitCode {
    if let Err(detail) = validate_city(city) {
        eprintln!("❌ Invalid city: {detail}");
        return ExitCode::FAILURE;
    }

    let gateway = match Gateway::new(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("❌ Failed to create client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match gateway.weather().lookup(city).await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Failed to serialize to JSON: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the gateway server
async fn run_server(config: Config) -> ExitCode {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "Starting Weather Gateway"
    );

    let gateway = match Gateway::new(config) {
        Ok(g) => g,
        Err(e) => {
            error!("Failed to create gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Run with graceful shutdown
    if let Err(e) = gateway.run().await {
        error!("Gateway error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Gateway shutdown complete");
    ExitCode::SUCCESS
}
