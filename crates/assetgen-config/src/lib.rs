#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod storage;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use pipeline::*;
pub use provider::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;

/// Top-level AssetGen configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and routing
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream image provider
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Artifact persistence
    #[serde(default)]
    pub storage: StorageConfig,
    /// Request validation
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
