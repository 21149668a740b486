//! HTTP API module: routes, handlers and OpenAPI documentation.

pub mod docs;
pub mod handlers;
pub mod routes;

use std::future::Future;

use tokio::net::TcpListener;

pub use handlers::AppState;
pub use routes::create_router;

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = state.with_local_addr(listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
