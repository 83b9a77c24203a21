//! Gateway server

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::router::{AppState, WEATHER_PATH, create_router};
use crate::cache::TtlCache;
use crate::config::Config;
use crate::upstream::{OpenMeteoClient, WeatherUpstream};
use crate::weather::WeatherService;
use crate::{Error, Result};

/// Weather gateway server
///
/// Owns the process-wide cache and lookup service: both are built here at
/// startup and dropped when the server returns.
pub struct Gateway {
    /// Configuration
    config: Config,
    /// Lookup orchestrator shared with request handlers
    weather: Arc<WeatherService>,
}

impl Gateway {
    /// Create a gateway backed by the Open-Meteo APIs
    pub fn new(config: Config) -> Result<Self> {
        let upstream = Arc::new(OpenMeteoClient::new(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a gateway over an arbitrary upstream source
    pub fn with_upstream(config: Config, upstream: Arc<dyn WeatherUpstream>) -> Self {
        let cache = Arc::new(TtlCache::new());
        let weather = Arc::new(WeatherService::new(upstream, cache, config.cache.ttl));
        Self { config, weather }
    }

    /// The lookup service this gateway serves
    pub fn weather(&self) -> Arc<WeatherService> {
        Arc::clone(&self.weather)
    }

    /// Run the gateway until a shutdown signal arrives
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let state = Arc::new(AppState {
            weather: Arc::clone(&self.weather),
        });
        let app = create_router(state, &self.config.cors);

        let listener = TcpListener::bind(addr).await?;

        info!("============================================================");
        info!("WEATHER GATEWAY v{}", env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(
            "  GET  http://{}:{}{}?city=<name>",
            self.config.server.host, self.config.server.port, WEATHER_PATH
        );
        info!(
            geocoding = %self.config.upstream.geocoding_base_url,
            forecast = %self.config.upstream.forecast_base_url,
            timeout_secs = self.config.upstream.timeout.as_secs(),
            "Upstreams"
        );
        info!(ttl_secs = self.config.cache.ttl.as_secs(), "Response cache enabled");
        info!(origins = ?self.config.cors.allowed_origins, "CORS");
        info!("============================================================");

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown_tx))
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => result?,
            _ = shutdown_rx.recv() => {
                // Drain in-flight requests, bounded by the shutdown timeout
                let timeout = self.config.server.shutdown_timeout;
                match tokio::time::timeout(timeout, &mut server).await {
                    Ok(result) => result?,
                    Err(_) => warn!(
                        timeout_secs = timeout.as_secs(),
                        "Graceful shutdown timed out, dropping open connections"
                    ),
                }
            }
        }

        let stats = self.weather.cache_stats();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.size,
            "Discarding response cache"
        );

        Ok(())
    }
}

/// Shutdown signal handler
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
