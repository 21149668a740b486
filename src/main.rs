//! Generic Rust backend entry point.

use clap::{Parser, Subcommand};
use tokio::net::{lookup_host, TcpListener};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use backend_template::api::{self, AppState};
use backend_template::config::{Config, VERBOSE_LOG_FILTER};
use backend_template::error::StartupError;
use backend_template::lifecycle;
use backend_template::metrics;
use backend_template::utils::shutdown_signal;

/// Generic Rust backend.
#[derive(Parser, Debug)]
#[command(name = "backend")]
#[command(about = "Generic Rust backend template with health, echo and placeholder endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bind host (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Run,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let mut config = Config::load().map_err(StartupError::from)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Run) | None => cmd_run(config).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BACKEND - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(StartupError::InvalidConfig(e).into());
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.environment);
    println!("  Listen Address: {}", config.bind_address());
    println!(
        "  Metrics: {}",
        config.metrics_address().unwrap_or_else(|| "Disabled".to_string())
    );
    println!("  Log Filter: {}", config.log_filter());
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
async fn cmd_run(config: Config) -> anyhow::Result<()> {
    config.validate().map_err(StartupError::InvalidConfig)?;

    metrics::init_metrics();
    if let Some(addr) = config.metrics_address() {
        let addr = lookup_host(&addr)
            .await
            .map_err(StartupError::from)?
            .next()
            .ok_or_else(|| StartupError::InvalidConfig(format!("cannot resolve {}", addr)))?;
        metrics::install_exporter(addr)?;
    }

    lifecycle::on_startup(&config);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(StartupError::from)?;
    info!("Starting server on {}", listener.local_addr()?);

    let result = api::serve(listener, AppState::from_config(&config), shutdown_signal()).await;

    lifecycle::on_shutdown();
    result.map_err(StartupError::from)?;

    Ok(())
}
