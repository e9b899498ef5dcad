use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse),
        responses(axum_helpers::errors::responses::NotFoundResponse)
    ),
    info(
        title = "Print Shop Quote API",
        version = "0.1.0",
        description = "Quote calculator and price tables for the print shop storefront"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/pricing", api = domain_pricing::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
