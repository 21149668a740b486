//! OpenAPI document and interactive documentation pages.

use axum::Router;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    self, ApiStatus, EchoPayload, EchoResponse, HealthStatus, Message, ProtectedMessage, RootInfo,
};
use crate::error::ErrorBody;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Generic Rust Backend",
        description = "A clean, production-ready Rust backend template",
        version = "1.0.0"
    ),
    paths(
        handlers::root,
        handlers::health,
        handlers::hello,
        handlers::api_status,
        handlers::protected,
        handlers::echo,
    ),
    components(schemas(
        RootInfo,
        HealthStatus,
        Message,
        ApiStatus,
        ProtectedMessage,
        EchoPayload,
        EchoResponse,
        ErrorBody,
    )),
    tags(
        (name = "info", description = "Service information and health"),
        (name = "api", description = "Example API endpoints")
    )
)]
pub struct ApiDoc;

/// Router serving `/docs`, `/redoc` and the OpenAPI document.
pub fn docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let openapi = ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/docs").url(OPENAPI_PATH, openapi.clone()))
        .merge(Redoc::with_url("/redoc", openapi))
}
