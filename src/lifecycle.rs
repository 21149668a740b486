//! Startup and shutdown hooks.
//!
//! Both hooks only log. Resource setup (database pools, caches, background
//! jobs) belongs in [`on_startup`]; matching teardown belongs in
//! [`on_shutdown`].

use tracing::info;

use crate::config::Config;

/// Run once before the listener starts accepting connections.
pub fn on_startup(config: &Config) {
    info!("🚀 Starting backend application...");
    info!(environment = %config.environment, "📝 Environment: {}", config.environment);
    if config.is_development() {
        info!("Development mode: reload on change is left to an external watcher (cargo watch -x run)");
    }
    info!("🔧 Add your startup logic here (database connections, etc.)");
}

/// Run once after the server has drained.
pub fn on_shutdown() {
    info!("🛑 Shutting down backend application...");
    info!("🔧 Add your cleanup logic here (close database connections, etc.)");
}
