#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod http_client;
mod naming;
mod pipeline;
mod provider;
mod store;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, Uri},
    routing::post,
};

pub use error::{GenerateError, Result, StorageError, UpstreamError, UpstreamStage};
pub use naming::generate_name;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use provider::ImageProvider;
pub use store::ArtifactStore;
pub use types::{GenerationRequest, GenerationResponse, RequestOrigin, StoredArtifact};

/// Build the generation pipeline from configuration
///
/// # Errors
///
/// Returns an error if the provider or store cannot be initialized
pub fn build_pipeline(config: &assetgen_config::Config) -> anyhow::Result<Arc<Pipeline>> {
    let pipeline = PipelineBuilder::new(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize generation pipeline: {e}"))?;

    Ok(Arc::new(pipeline))
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Pipeline>> {
    Router::new().route("/generate", post(generate))
}

/// Handle image generation requests
///
/// An unreadable body is treated like an empty one, so it fails validation
/// with the same 400 response as a missing prompt.
async fn generate(
    State(pipeline): State<Arc<Pipeline>>,
    headers: HeaderMap,
    uri: Uri,
    payload: std::result::Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>> {
    let request = payload.map(|Json(request)| request).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "unreadable generation request body");
        GenerationRequest::default()
    });

    let origin = RequestOrigin::from_request(&headers, &uri, pipeline.trusts_forwarded_headers());
    let response = pipeline.run(&request, &origin).await?;

    tracing::debug!("generation request complete");

    Ok(Json(response))
}
