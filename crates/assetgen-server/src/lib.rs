mod cors;
mod health;

use std::net::SocketAddr;

use assetgen_config::Config;
use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent or the
    /// generation pipeline cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let pipeline = assetgen_imagegen::build_pipeline(config)?;

        let mut app = Router::new().route("/", get(health::root_handler(config.server.root_message.clone())));

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        // Persisted artifacts, read-only
        if let Some(store) = pipeline.store() {
            let prefix = config.storage.public_prefix.trim_end_matches('/');
            tracing::debug!(prefix, dir = %store.base_path().display(), "serving generated artifacts");
            app = app.nest_service(prefix, ServeDir::new(store.base_path()));
        }

        // Generation
        app = app.merge(assetgen_imagegen::endpoint_router().with_state(pipeline));

        // Apply middleware layers (innermost first)
        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
