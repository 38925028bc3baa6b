use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::ImageProvider;
use crate::error::{UpstreamError, UpstreamStage};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` images API provider
pub(crate) struct OpenAiImageProvider {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    size: String,
}

impl OpenAiImageProvider {
    pub fn new(name: String, client: Client, api_key: SecretString, base_url: Option<Url>, size: String) -> Self {
        let base_url = base_url.map_or_else(|| DEFAULT_BASE_URL.to_string(), String::from);

        Self {
            name,
            client,
            api_key,
            base_url,
            size,
        }
    }
}

/// Wire format for the generation request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

/// Wire format for the generation response
#[derive(Deserialize)]
struct OpenAiImageResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn request_generation(&self, prompt: &str) -> Result<String, UpstreamError> {
        const STAGE: UpstreamStage = UpstreamStage::Generation;

        let url = format!("{}/images/generations", self.base_url.trim_end_matches('/'));

        let wire_request = OpenAiImageRequest {
            prompt,
            n: 1,
            size: &self.size,
            response_format: "url",
        };

        tracing::debug!(provider = %self.name, size = %self.size, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.name, error = %e, "image generation request failed");
                UpstreamError::from_reqwest(STAGE, &e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(
                provider = %self.name,
                status = %status,
                body = %error_text,
                "image generation API error"
            );

            return Err(UpstreamError::Status {
                stage: STAGE,
                status: status.as_u16(),
                message: error_text,
            });
        }

        let wire_response: OpenAiImageResponse = response.json().await.map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "failed to parse image generation response");
            if e.is_timeout() {
                UpstreamError::Timeout { stage: STAGE }
            } else {
                UpstreamError::Malformed {
                    stage: STAGE,
                    message: e.to_string(),
                }
            }
        })?;

        let locator = wire_response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| UpstreamError::Malformed {
                stage: STAGE,
                message: "response has no data[0].url".to_string(),
            })?;

        tracing::debug!(provider = %self.name, "image generation request complete");

        Ok(locator)
    }

    async fn fetch_bytes(&self, locator: &str) -> Result<Bytes, UpstreamError> {
        const STAGE: UpstreamStage = UpstreamStage::Fetch;

        let url = Url::parse(locator)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| UpstreamError::Malformed {
                stage: STAGE,
                message: "image locator is not an http(s) URL".to_string(),
            })?;

        tracing::debug!(provider = %self.name, "fetching generated image");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "image fetch failed");
            UpstreamError::from_reqwest(STAGE, &e)
        })?;

        let status = response.status();

        if !status.is_success() {
            tracing::error!(provider = %self.name, status = %status, "image fetch returned an error status");

            return Err(UpstreamError::Status {
                stage: STAGE,
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(provider = %self.name, error = %e, "image body transfer failed");
            UpstreamError::from_reqwest(STAGE, &e)
        })?;

        if bytes.is_empty() {
            return Err(UpstreamError::Malformed {
                stage: STAGE,
                message: "image body is empty".to_string(),
            });
        }

        tracing::debug!(provider = %self.name, bytes = bytes.len(), "image fetched");

        Ok(bytes)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
