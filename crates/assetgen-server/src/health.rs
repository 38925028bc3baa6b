use axum::response::IntoResponse;
use http::StatusCode;

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Liveness text for `GET /`
pub fn root_handler(message: String) -> impl Fn() -> std::future::Ready<String> + Clone + Send + Sync + 'static {
    move || std::future::ready(message.clone())
}
