use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

/// Local persistence of generated artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// When disabled, the provider's own image URL is returned as-is
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory artifacts are written to
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// URL path prefix under which `base_path` is served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Absolute origin for artifact links; when unset the inbound
    /// request's scheme and host are used
    #[serde(default)]
    pub public_base_url: Option<Url>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_path: default_base_path(),
            public_prefix: default_public_prefix(),
            public_base_url: None,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_base_path() -> PathBuf {
    PathBuf::from("public/generated")
}

fn default_public_prefix() -> String {
    "/public/generated".to_string()
}
