use std::path::PathBuf;

use axum::http::{HeaderMap, Uri, header, uri::Authority};
use serde::{Deserialize, Serialize};

/// Inbound `POST /generate` body
///
/// Fields are optional at the wire level so that absence is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationRequest {
    /// Text description of the desired image
    #[serde(default)]
    pub prompt: Option<String>,
    /// Asset kind tag (e.g. "2d", "3d")
    #[serde(default, rename = "type")]
    pub asset_type: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            asset_type: Some(asset_type.into()),
        }
    }
}

/// Links returned for a generated asset
///
/// Identical while artifacts are served from one location; kept separate so
/// a thumbnail link can diverge from the full-resolution one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationResponse {
    pub preview: String,
    pub download: String,
}

impl GenerationResponse {
    pub(crate) fn single(url: String) -> Self {
        Self {
            preview: url.clone(),
            download: url,
        }
    }
}

/// An image written to local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Generated unique name
    pub filename: String,
    /// Absolute location on disk
    pub storage_path: PathBuf,
    /// Public prefix joined with the filename
    pub public_path: String,
}

/// Scheme and host the caller used to reach this server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Derive the origin from an inbound request
    ///
    /// With `trust_forwarded` set, `X-Forwarded-Proto` and `X-Forwarded-Host`
    /// from a fronting proxy win. Otherwise, or when they are unusable, the
    /// `Host` header, then the request URI authority, then `localhost` are
    /// used. The scheme is always `http` or `https`.
    pub fn from_request(headers: &HeaderMap, uri: &Uri, trust_forwarded: bool) -> Self {
        let first_value = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded = |name: &str| if trust_forwarded { first_value(name) } else { None };

        let scheme = forwarded("x-forwarded-proto")
            .and_then(web_scheme)
            .or_else(|| uri.scheme_str().and_then(web_scheme))
            .unwrap_or("http");

        let host = forwarded("x-forwarded-host")
            .and_then(plain_authority)
            .or_else(|| first_value(header::HOST.as_str()).and_then(plain_authority))
            .or_else(|| uri.authority().map(Authority::as_str).and_then(plain_authority))
            .unwrap_or("localhost");

        Self::new(scheme, host)
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

fn web_scheme(value: &str) -> Option<&'static str> {
    if value.eq_ignore_ascii_case("https") {
        Some("https")
    } else if value.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

/// Host and optional port, without credentials or path
fn plain_authority(value: &str) -> Option<&str> {
    (!value.contains('@') && value.parse::<Authority>().is_ok()).then_some(value)
}
