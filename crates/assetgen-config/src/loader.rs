use std::path::Path;

use secrecy::ExposeSecret;

use crate::{AnyOrList, Config};

/// Routes mounted unconditionally by the server, besides `/`
const RESERVED_ROUTES: &[&str] = &["/generate"];

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_provider()?;
        self.validate_storage()?;
        self.validate_routes()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if health.enabled && (!health.path.starts_with('/') || health.path == "/") {
            anyhow::bail!("server.health.path must be an absolute path other than '/', got '{}'", health.path);
        }

        if let Some(ref cors) = self.server.cors
            && cors.credentials
        {
            let wildcard = [
                ("origins", &cors.origins),
                ("methods", &cors.methods),
                ("headers", &cors.headers),
            ]
            .into_iter()
            .find_map(|(name, value)| (*value == AnyOrList::Any).then_some(name))
            .or_else(|| cors.expose_headers.iter().any(|h| h == "*").then_some("expose_headers"));

            if let Some(field) = wildcard {
                anyhow::bail!(
                    "server.cors.credentials cannot be combined with a wildcard; list explicit server.cors.{field}"
                );
            }
        }

        Ok(())
    }

    fn validate_provider(&self) -> anyhow::Result<()> {
        let has_key = self
            .provider
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());

        if !has_key {
            anyhow::bail!("provider.api_key must be set");
        }

        self.provider.timeout_duration()?;

        let valid_size = self
            .provider
            .size
            .split_once('x')
            .is_some_and(|(w, h)| w.parse::<u32>().is_ok_and(|w| w > 0) && h.parse::<u32>().is_ok_and(|h| h > 0));

        if !valid_size {
            anyhow::bail!("provider.size must look like <width>x<height>, got '{}'", self.provider.size);
        }

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        let prefix = &self.storage.public_prefix;

        if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
            anyhow::bail!("storage.public_prefix must be an absolute path other than '/', got '{prefix}'");
        }

        if let Some(ref base) = self.storage.public_base_url
            && (base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https"))
        {
            anyhow::bail!("storage.public_base_url must be an absolute http(s) URL");
        }

        Ok(())
    }

    /// Reject mount points that would overlap once the router is assembled
    fn validate_routes(&self) -> anyhow::Result<()> {
        let health = self.server.health.enabled.then(|| self.server.health.path.as_str());
        let prefix = self.storage.enabled.then(|| self.storage.public_prefix.as_str());

        for (name, path) in [("server.health.path", health), ("storage.public_prefix", prefix)] {
            if let Some(path) = path
                && let Some(reserved) = RESERVED_ROUTES.iter().find(|r| overlaps(path, r))
            {
                anyhow::bail!("{name} '{path}' collides with the {reserved} route");
            }
        }

        if let (Some(health), Some(prefix)) = (health, prefix)
            && overlaps(health, prefix)
        {
            anyhow::bail!("storage.public_prefix '{prefix}' collides with server.health.path '{health}'");
        }

        Ok(())
    }
}

/// Whether one path equals the other or sits beneath it
fn overlaps(a: &str, b: &str) -> bool {
    let a = a.trim_end_matches('/');
    let b = b.trim_end_matches('/');
    let nested = |inner: &str, outer: &str| inner.strip_prefix(outer).is_some_and(|rest| rest.starts_with('/'));

    a == b || nested(a, b) || nested(b, a)
}
