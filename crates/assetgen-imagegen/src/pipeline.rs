use assetgen_config::{Config, ProviderConfig, ProviderType};
use reqwest::Url;
use secrecy::SecretString;

use crate::{
    error::{GenerateError, Result},
    http_client::http_client,
    naming::generate_name,
    provider::{ImageProvider, openai::OpenAiImageProvider},
    store::ArtifactStore,
    types::{GenerationRequest, GenerationResponse, RequestOrigin},
};

/// Request-to-artifact pipeline
///
/// Holds only immutable collaborators, so one instance serves every request
/// concurrently.
pub struct Pipeline {
    provider: Box<dyn ImageProvider>,
    /// `None` in passthrough mode
    store: Option<ArtifactStore>,
    require_type: bool,
    public_base_url: Option<Url>,
    trust_forwarded_headers: bool,
}

/// Prompt and type after validation
struct ValidRequest<'a> {
    prompt: &'a str,
    asset_type: Option<&'a str>,
}

impl Pipeline {
    pub fn new(provider: Box<dyn ImageProvider>, store: Option<ArtifactStore>, require_type: bool) -> Self {
        Self {
            provider,
            store,
            require_type,
            public_base_url: None,
            trust_forwarded_headers: true,
        }
    }

    /// Use a fixed origin for artifact links instead of the inbound one
    #[must_use]
    pub fn with_public_base_url(mut self, url: Option<Url>) -> Self {
        self.public_base_url = url;
        self
    }

    /// Whether `X-Forwarded-*` headers may decide the origin of artifact links
    #[must_use]
    pub fn with_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    pub fn trusts_forwarded_headers(&self) -> bool {
        self.trust_forwarded_headers
    }

    pub fn store(&self) -> Option<&ArtifactStore> {
        self.store.as_ref()
    }

    /// Run one generation request end to end
    ///
    /// Validate, generate, fetch, persist, respond. Each step runs only after
    /// the previous one succeeded; the first failure ends the run.
    pub async fn run(&self, request: &GenerationRequest, origin: &RequestOrigin) -> Result<GenerationResponse> {
        let valid = self.validate(request).inspect_err(|e| {
            tracing::info!(error = %e, "rejected generation request");
        })?;

        tracing::info!(
            provider = self.provider.name(),
            prompt_chars = valid.prompt.chars().count(),
            asset_type = valid.asset_type.unwrap_or("-"),
            "generation request received"
        );

        let locator = self.provider.request_generation(valid.prompt).await.map_err(|e| {
            tracing::error!(stage = %e.stage(), error = %e, "upstream call failed");
            GenerateError::from(e)
        })?;

        let Some(store) = &self.store else {
            tracing::info!("returning provider locator without persisting");
            return Ok(GenerationResponse::single(locator));
        };

        let bytes = self.provider.fetch_bytes(&locator).await.map_err(|e| {
            tracing::error!(stage = %e.stage(), error = %e, "upstream call failed");
            GenerateError::from(e)
        })?;

        let name = generate_name();
        let artifact = store.persist(&name, bytes).await.map_err(|e| {
            tracing::error!(error = %e, "failed to persist artifact");
            GenerateError::from(e)
        })?;

        let url = format!("{}{}", self.origin_base(origin), artifact.public_path);

        tracing::info!(filename = %artifact.filename, "artifact stored");

        Ok(GenerationResponse::single(url))
    }

    fn validate<'a>(&self, request: &'a GenerationRequest) -> Result<ValidRequest<'a>> {
        // Blank means missing, but the text is forwarded as the caller sent it
        let present = |field: &'a Option<String>| field.as_deref().filter(|v| !v.trim().is_empty());

        let prompt = present(&request.prompt);
        let asset_type = present(&request.asset_type);

        if self.require_type {
            match (prompt, asset_type) {
                (Some(prompt), Some(asset_type)) => Ok(ValidRequest {
                    prompt,
                    asset_type: Some(asset_type),
                }),
                _ => Err(GenerateError::Validation("Prompt and type are required")),
            }
        } else {
            prompt
                .map(|prompt| ValidRequest { prompt, asset_type })
                .ok_or(GenerateError::Validation("Prompt is required"))
        }
    }

    fn origin_base(&self, origin: &RequestOrigin) -> String {
        self.public_base_url.as_ref().map_or_else(
            || origin.base_url(),
            |url| url.as_str().trim_end_matches('/').to_string(),
        )
    }
}

/// Builder for constructing the pipeline from configuration
pub struct PipelineBuilder<'a> {
    config: &'a Config,
}

impl<'a> PipelineBuilder<'a> {
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Pipeline> {
        let provider_config = &self.config.provider;

        let provider: Box<dyn ImageProvider> = match provider_config.provider_type {
            ProviderType::Openai => {
                let api_key = resolve_api_key(provider_config)?;
                let client = http_client(provider_config.timeout_duration()?)
                    .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

                Box::new(OpenAiImageProvider::new(
                    "openai".to_string(),
                    client,
                    api_key,
                    provider_config.base_url.clone(),
                    provider_config.size.clone(),
                ))
            }
        };

        let storage = &self.config.storage;
        let store = if storage.enabled {
            let store = ArtifactStore::new(&storage.base_path, &storage.public_prefix).map_err(|e| {
                anyhow::anyhow!("invalid storage path {}: {e}", storage.base_path.display())
            })?;
            tracing::debug!(base_path = %store.base_path().display(), "artifact persistence enabled");
            Some(store)
        } else {
            tracing::debug!("artifact persistence disabled, returning provider URLs");
            None
        };

        Ok(Pipeline::new(provider, store, self.config.pipeline.require_type)
            .with_public_base_url(storage.public_base_url.clone())
            .with_forwarded_headers(self.config.server.trust_forwarded_headers))
    }
}

fn resolve_api_key(config: &ProviderConfig) -> anyhow::Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("API key required for the image provider"))
}
