use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// HTTP listener and routing configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Plain-text body returned by `GET /`
    #[serde(default = "default_root_message")]
    pub root_message: String,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    /// Let `X-Forwarded-Proto` and `X-Forwarded-Host` decide the origin of
    /// artifact links. Disable when not behind a proxy that sets them.
    #[serde(default = "default_trust_forwarded_headers")]
    pub trust_forwarded_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            root_message: default_root_message(),
            health: HealthConfig::default(),
            cors: None,
            trust_forwarded_headers: default_trust_forwarded_headers(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

#[allow(clippy::missing_const_for_fn)]
fn default_trust_forwarded_headers() -> bool {
    true
}

fn default_root_message() -> String {
    "AssetGen API is alive and running!".to_string()
}
