//! Dark Search status page entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dark_search_status::api::{serve, AppState};
use dark_search_status::config::Config;
use dark_search_status::metrics;
use dark_search_status::status::{StatusClient, StatusPage};

/// Dark Search crawl status page.
#[derive(Parser, Debug)]
#[command(name = "dark-search-status")]
#[command(about = "Server-rendered crawl status page for the Dark Search backend")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the status page (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch the status once and print the rendered page.
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("dark_search_status=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Fetch) => cmd_fetch().await,
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load configuration, apply CLI overrides, then validate, logging failures.
fn load_config(port_override: Option<u16>) -> anyhow::Result<Config> {
    let config = Config::load()
        .map_err(|e| {
            error!("Failed to load configuration: {}", e);
            e
        })?
        .with_port_override(port_override);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DARK SEARCH STATUS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  API Base URL: {}", config.api_base_url.as_deref().unwrap_or_default());
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Page Title: {}", config.page_title);
    println!("  Port: {}", config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("Enabled (port {})", config.metrics_port)
        } else {
            "Disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch the status once and print the rendered page.
async fn cmd_fetch() -> anyhow::Result<()> {
    let config = load_config(None)?;
    let client = StatusClient::from_config(&config)?;
    let page = StatusPage::new(client, config.page_title.clone());

    let rendered = page.render().await;
    println!("{}", rendered.html);

    if rendered.is_fallback() {
        return Err(anyhow::anyhow!("Status unavailable (HTTP {})", rendered.status));
    }

    Ok(())
}

/// Serve the status page.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let config = load_config(port_override)?;

    info!("Configuration loaded successfully");
    info!("Status endpoint: {}", config.api_base_url.as_deref().unwrap_or_default());

    metrics::init_metrics();
    if config.metrics_enabled {
        metrics::install_exporter(SocketAddr::from(([0, 0, 0, 0], config.metrics_port)))?;
    }

    let client = StatusClient::from_config(&config)?;
    let state = AppState::new(StatusPage::new(client, config.page_title.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    serve(listener, state).await?;

    Ok(())
}
