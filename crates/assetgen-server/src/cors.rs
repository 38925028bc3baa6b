use assetgen_config::{AnyOrList, CorsConfig};
use http::{HeaderName, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Entries that do not parse as origins, methods, or header names are
/// skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_origin(match &config.origins {
            AnyOrList::Any => AllowOrigin::any(),
            AnyOrList::List(origins) => AllowOrigin::list(parse_all(origins, "origin")),
        })
        .allow_methods(match &config.methods {
            AnyOrList::Any => AllowMethods::any(),
            AnyOrList::List(methods) => AllowMethods::list(parse_all::<Method>(methods, "method")),
        })
        .allow_headers(match &config.headers {
            AnyOrList::Any => AllowHeaders::any(),
            AnyOrList::List(headers) => AllowHeaders::list(parse_all::<HeaderName>(headers, "header")),
        });

    if !config.expose_headers.is_empty() {
        layer = layer.expose_headers(parse_all::<HeaderName>(&config.expose_headers, "expose header"));
    }

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

fn parse_all<T: std::str::FromStr>(values: &[String], kind: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(value = %value, "ignoring invalid CORS {kind}");
            }
            parsed
        })
        .collect()
}
