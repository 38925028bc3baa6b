use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream image generation provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider protocol
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    /// Bearer credential, usually `{{ env.OPENAI_API_KEY }}`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Requested resolution, `<width>x<height>`
    #[serde(default = "default_size")]
    pub size: String,
    /// Upper bound for each upstream call (e.g. "30s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            api_key: None,
            base_url: None,
            size: default_size(),
            timeout: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid duration or is zero
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        let timeout = duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid provider timeout '{}': {e}", self.timeout))?;

        if timeout.is_zero() {
            anyhow::bail!("provider timeout must be greater than zero");
        }

        Ok(timeout)
    }
}

/// Supported provider protocols
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// `OpenAI` images API (or a compatible endpoint)
    #[default]
    Openai,
}

fn default_size() -> String {
    "512x512".to_string()
}

fn default_timeout() -> String {
    "60s".to_string()
}
