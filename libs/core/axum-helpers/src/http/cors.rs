use axum::http::{HeaderValue, Method};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer for the storefront front-ends.
///
/// Allows GET/POST/OPTIONS with JSON bodies from the given origins; the
/// pricing API is read-only plus the quote calculation.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from the comma-separated `CORS_ALLOWED_ORIGIN` variable.
///
/// Fails when the variable is unset, empty, or holds an invalid header value.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;

    let allowed = parse_origins(&origins)?;
    tracing::info!("CORS configured with allowed origins: {}", origins);
    Ok(create_cors_layer(allowed))
}

fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let allowed = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<HeaderValue>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(allowed)
}
