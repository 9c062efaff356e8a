use figurine_config::{AnyOrArray, CorsConfig};
use http::header::HeaderName;
use http::{Method, header};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer for browser clients
///
/// Methods are fixed to what the routes serve; origins and headers come
/// from configuration.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    layer = match &config.origins {
        AnyOrArray::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrArray::List(origins) => {
            let origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    };

    layer = match &config.headers {
        AnyOrArray::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrArray::List(headers) => {
            let mut names: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
            if !names.contains(&header::CONTENT_TYPE) {
                names.push(header::CONTENT_TYPE);
            }
            layer.allow_headers(names)
        }
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
