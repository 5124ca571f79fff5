//! CLI command implementations

use std::time::Duration;

use clap::Subcommand;
use corpline_core::CorplineConfig;
use corpline_web::run_server;
use url::Url;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the lookup proxy server
    Serve {
        /// Host to bind to (overrides CORPLINE_HOST, default 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides CORPLINE_PORT, default 3000)
        #[arg(short, long)]
        port: Option<u16>,
        /// Upstream outline service URL (overrides CORPLINE_UPSTREAM_URL)
        #[arg(long)]
        upstream_url: Option<String>,
        /// Upstream request timeout in seconds (overrides CORPLINE_UPSTREAM_TIMEOUT)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            upstream_url,
            timeout_secs,
        } => serve(host, port, upstream_url, timeout_secs).await,
    }
}

/// Start the lookup proxy server
///
/// Configuration precedence: CLI flags over environment variables over
/// built-in defaults.
///
/// # Errors
/// - Invalid `--upstream-url`
/// - Failed to bind the listener or serve connections
pub async fn serve(
    host: Option<String>,
    port: Option<u16>,
    upstream_url: Option<String>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = CorplineConfig::from_env();

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(upstream_url) = upstream_url {
        let parsed = Url::parse(&upstream_url)?;
        config.upstream.base_url = parsed.into();
    }
    if let Some(seconds) = timeout_secs {
        config.upstream.request_timeout = Some(Duration::from_secs(seconds));
    }

    println!("Starting Corpline lookup proxy...");
    println!("Host: {}", config.server.host);
    println!("Port: {}", config.server.port);
    println!(
        "Endpoint: http://{}:{}/corp",
        config.server.host, config.server.port
    );
    println!("Upstream: {}", config.upstream.base_url);
    println!("{:-<50}", "");
    println!("Press Ctrl+C to stop the server");

    tracing::debug!("Resolved configuration: {config:?}");

    run_server(config).await?;

    Ok(())
}
