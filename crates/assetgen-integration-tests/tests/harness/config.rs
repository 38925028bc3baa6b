//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, path::Path};

use assetgen_config::{Config, CorsConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at a mock provider, storing under `storage_dir`
    pub fn new(provider_base_url: &str, storage_dir: &Path) -> Self {
        let mut config = Config::default();

        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.provider.api_key = Some(SecretString::from("test-key"));
        config.provider.base_url = Some(provider_base_url.parse().expect("valid URL"));
        config.provider.timeout = "2s".to_owned();
        config.storage.base_path = storage_dir.join("public").join("generated");

        Self { config }
    }

    /// Return provider URLs instead of persisting
    pub fn passthrough(mut self) -> Self {
        self.config.storage.enabled = false;
        self
    }

    /// Accept requests without a `type`
    pub fn without_type_validation(mut self) -> Self {
        self.config.pipeline.require_type = false;
        self
    }

    /// Pin the origin used in artifact links
    pub fn with_public_base_url(mut self, url: &str) -> Self {
        self.config.storage.public_base_url = Some(url.parse().expect("valid URL"));
        self
    }

    /// Ignore `X-Forwarded-*` when building artifact links
    pub fn without_forwarded_headers(mut self) -> Self {
        self.config.server.trust_forwarded_headers = false;
        self
    }

    /// Serve artifacts under a different URL prefix
    pub fn with_public_prefix(mut self, prefix: &str) -> Self {
        prefix.clone_into(&mut self.config.storage.public_prefix);
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
