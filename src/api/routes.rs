//! HTTP API route definitions.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::docs::docs_router;
use super::handlers::{api_status, echo, health, hello, protected, root, AppState};
use crate::error::AppError;
use crate::metrics::track_requests;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let app = Router::new()
        // Info endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // Example API endpoints
        .route("/api/hello", get(hello))
        .route("/api/status", get(api_status))
        .route("/api/protected", get(protected))
        .route("/api/echo", post(echo))
        // Additional routers (users, items, auth...) are merged here.
        .merge(
            docs_router().layer(middleware::from_fn_with_state(state.clone(), json_not_found)),
        )
        .fallback(not_found)
        .with_state(state);

    with_middleware(app)
}

/// Wrap a router in the shared middleware stack.
///
/// Innermost first: panic recovery, request metrics, CORS, request tracing.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(track_requests))
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
}

/// Allow every origin, method and header, with credentials.
///
/// Mirroring is used because `*` cannot be combined with credentials.
/// Narrow this to known origins before deploying to production.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Fallback for unmatched routes.
pub async fn not_found(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> AppError {
    AppError::NotFound {
        path: requested_url(&headers, &uri, state.local_addr),
    }
}

/// Give 404s from mounted routers (e.g. unknown `/docs/*` assets) the JSON envelope.
async fn json_not_found(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = requested_url(request.headers(), request.uri(), state.local_addr);

    let response = next.run(request).await;
    if response.status() == StatusCode::NOT_FOUND {
        return AppError::NotFound { path }.into_response();
    }

    response
}

/// Reconstruct the full URL the client asked for.
///
/// Uses the Host header, falling back to the bound address, then to the bare path.
fn requested_url(headers: &HeaderMap, uri: &Uri, local_addr: Option<SocketAddr>) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => match local_addr {
            Some(addr) => format!("http://{}{}", addr, path),
            None => path.to_string(),
        },
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn root_returns_info() {
        let app = create_router(AppState::new("development"));

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Generic Rust Backend is running! 🚀",
                "version": "1.0.0",
                "environment": "development",
                "docs": "/docs",
                "redoc": "/redoc"
            })
        );
    }

    #[tokio::test]
    async fn health_endpoint_returns_healthy() {
        let app = create_router(AppState::new("production"));

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "healthy", "environment": "production", "version": "1.0.0"})
        );
    }

    #[tokio::test]
    async fn hello_timestamp_is_not_before_request() {
        let started = chrono::Utc::now();
        let app = create_router(AppState::default());

        let response = app.oneshot(get_request("/api/hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Hello from Rust! 👋");
        let timestamp = chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap())
            .unwrap();
        // Micros precision truncates; compare at that granularity.
        assert!(timestamp.timestamp_micros() >= started.timestamp_micros());
    }

    #[tokio::test]
    async fn status_reports_runtime() {
        let app = create_router(AppState::new("staging"));

        let response = app.oneshot(get_request("/api/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["api_status"], "operational");
        assert_eq!(body["environment"], "staging");
        assert!(body["runtime_version"].is_string());
        assert!(body["platform"].is_string());
    }

    #[tokio::test]
    async fn protected_is_open_placeholder() {
        let app = create_router(AppState::default());

        let response = app.oneshot(get_request("/api/protected")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "This is a protected route! 🔒"})
        );
    }

    #[tokio::test]
    async fn echo_returns_body_unchanged() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"a": 1, "b": "x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "received": {"a": 1, "b": "x"},
                "message": "Data received successfully! 📡"
            })
        );
    }

    #[tokio::test]
    async fn echo_preserves_key_order_and_big_integers() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"b":1,"a":12345678901234567890123,"c":0.1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"received":{"b":1,"a":12345678901234567890123,"c":0.1},"message":"Data received successfully! 📡"}"#
        );
    }

    #[tokio::test]
    async fn echo_rejects_non_object_body() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("[1, 2, 3]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn echo_rejects_malformed_json() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_path_returns_404_with_full_url() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/does/not/exist?x=1")
                    .header(header::HOST, "localhost:8000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Endpoint not found",
                "path": "http://localhost:8000/does/not/exist?x=1"
            })
        );
    }

    #[tokio::test]
    async fn unknown_path_without_host_reports_path() {
        let app = create_router(AppState::default());

        let response = app.oneshot(get_request("/does/not/exist")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["path"], "/does/not/exist");
    }

    #[tokio::test]
    async fn unknown_path_without_host_uses_bound_address() {
        let addr: SocketAddr = "127.0.0.1:8000".parse().unwrap();
        let app = create_router(AppState::default().with_local_addr(addr));

        let response = app.oneshot(get_request("/does/not/exist")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["path"],
            "http://127.0.0.1:8000/does/not/exist"
        );
    }

    #[tokio::test]
    async fn unknown_docs_asset_returns_json_404() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/docs/does-not-exist")
                    .header(header::HOST, "localhost:8000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Endpoint not found",
                "path": "http://localhost:8000/docs/does-not-exist"
            })
        );
    }

    async fn explode() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn panicking_handler_returns_500() {
        let app = with_middleware(Router::new().route("/boom", get(explode)));

        let response = app.oneshot(get_request("/boom")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Internal server error", "detail": "handler exploded"})
        );
    }

    #[tokio::test]
    async fn cors_preflight_mirrors_origin_with_credentials() {
        let app = create_router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/echo")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://example.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
    }

    #[tokio::test]
    async fn docs_and_openapi_are_served() {
        let app = create_router(AppState::default());

        let response = app.clone().oneshot(get_request("/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert_eq!(doc["info"]["version"], "1.0.0");

        let response = app.oneshot(get_request("/redoc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn requested_url_keeps_absolute_uri() {
        let uri: Uri = "http://example.com/a?b=c".parse().unwrap();
        assert_eq!(
            requested_url(&HeaderMap::new(), &uri, None),
            "http://example.com/a?b=c"
        );
    }
}
