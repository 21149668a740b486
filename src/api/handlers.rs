//! HTTP API handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::Result;

/// API version reported by every informational endpoint.
pub const API_VERSION: &str = "1.0.0";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Environment name resolved at startup.
    pub environment: Arc<str>,
    /// Address the listener is bound to, once known.
    pub local_addr: Option<SocketAddr>,
}

impl AppState {
    /// Create new app state for the given environment name.
    pub fn new(environment: impl Into<Arc<str>>) -> Self {
        Self {
            environment: environment.into(),
            local_addr: None,
        }
    }

    /// Record the bound listener address.
    pub fn with_local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }

    /// Build state from a loaded config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.environment.as_str())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Root info response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootInfo {
    /// Banner confirming the service is up.
    pub message: String,
    /// API version.
    pub version: String,
    /// Environment name.
    pub environment: String,
    /// Path of the Swagger UI.
    pub docs: String,
    /// Path of the ReDoc page.
    pub redoc: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Always "healthy" while the process serves requests.
    pub status: String,
    /// Environment name.
    pub environment: String,
    /// API version.
    pub version: String,
}

/// Timestamped message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// Greeting text.
    pub message: String,
    /// ISO-8601 instant at which the response was produced.
    pub timestamp: String,
}

/// Runtime status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiStatus {
    /// Always "operational".
    pub api_status: String,
    /// Compiler the binary was built with.
    pub runtime_version: String,
    /// Operating system, CPU architecture and OS family.
    pub platform: String,
    /// Environment name.
    pub environment: String,
}

/// Placeholder response for the protected route.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProtectedMessage {
    /// Placeholder text.
    pub message: String,
}

/// Arbitrary JSON object accepted by the echo endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct EchoPayload(pub Map<String, Value>);

/// Echo response carrying the request body unchanged.
#[derive(Debug, Serialize, ToSchema)]
pub struct EchoResponse {
    /// Request body, keys and numbers as sent.
    pub received: EchoPayload,
    /// Acknowledgement text.
    pub message: String,
}

/// Root endpoint with basic API information.
#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses((status = 200, description = "API information", body = RootInfo))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootInfo> {
    Json(RootInfo {
        message: "Generic Rust Backend is running! 🚀".to_string(),
        version: API_VERSION.to_string(),
        environment: state.environment.to_string(),
        docs: "/docs".to_string(),
        redoc: "/redoc".to_string(),
    })
}

/// Health check for monitoring and load balancers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "info",
    responses((status = 200, description = "Service is healthy", body = HealthStatus))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        environment: state.environment.to_string(),
        version: API_VERSION.to_string(),
    })
}

/// Example endpoint returning a greeting with the current time.
#[utoipa::path(
    get,
    path = "/api/hello",
    tag = "api",
    responses((status = 200, description = "Greeting", body = Message))
)]
pub async fn hello() -> Json<Message> {
    Json(Message {
        message: "Hello from Rust! 👋".to_string(),
        timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
    })
}

/// API status with host runtime information.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "api",
    responses((status = 200, description = "Runtime status", body = ApiStatus))
)]
pub async fn api_status(State(state): State<AppState>) -> Json<ApiStatus> {
    Json(ApiStatus {
        api_status: "operational".to_string(),
        runtime_version: runtime_version().to_string(),
        platform: platform(),
        environment: state.environment.to_string(),
    })
}

/// Example protected endpoint.
#[utoipa::path(
    get,
    path = "/api/protected",
    tag = "api",
    responses((status = 200, description = "Placeholder payload", body = ProtectedMessage))
)]
pub async fn protected() -> Json<ProtectedMessage> {
    // TODO: reject with 401 once an authentication layer is added to the router.
    Json(ProtectedMessage {
        message: "This is a protected route! 🔒".to_string(),
    })
}

/// Echo endpoint that returns the posted object.
#[utoipa::path(
    post,
    path = "/api/echo",
    tag = "api",
    request_body = EchoPayload,
    responses(
        (status = 200, description = "Body echoed back", body = EchoResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
        (status = 422, description = "Body is not a JSON object", body = crate::error::ErrorBody)
    )
)]
pub async fn echo(payload: std::result::Result<Json<EchoPayload>, JsonRejection>) -> Result<Json<EchoResponse>> {
    let Json(received) = payload?;

    Ok(Json(EchoResponse {
        received,
        message: "Data received successfully! 📡".to_string(),
    }))
}

fn runtime_version() -> &'static str {
    option_env!("BUILD_RUSTC_VERSION")
        .unwrap_or(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")))
}

fn platform() -> String {
    format!(
        "{}-{}-{}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        std::env::consts::FAMILY
    )
}
