//! # Axum Helpers
//!
//! Shared HTTP plumbing for the storefront APIs.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Validated JSON extractor
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new();
//!     let router = create_router::<ApiDoc>(api_routes)?;
//!
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{ErrorCode, ErrorResponse};

pub use extractors::{ValidatedJson, ValidationRejection};
