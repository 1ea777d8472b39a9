use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Arithmetic and math-fact tools for Model Context Protocol clients
///
/// Speaks newline-delimited JSON-RPC on stdin/stdout. Diagnostics go to
/// stderr or the configured log file.
#[derive(Parser, Debug)]
#[command(name = "mathmcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to $MATHMCP_CONFIG, ./.mathmcp.toml, then the
    /// user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log to file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn setup_logging(log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
        subscriber.with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match mathmcp::ConfigLoader::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log_level())
        .to_string();
    let log_file = args.log_file.or_else(|| config.logging.file.clone());
    setup_logging(&log_level, log_file)?;

    debug!("Starting mathmcp v{}", env!("CARGO_PKG_VERSION"));

    let server = mathmcp::McpServer::new(&config);

    // Written directly so it reaches stderr whatever the log level or log file
    eprintln!(
        "{} running on stdio with {} tools",
        config.server_name(),
        server.registry().list_tools().len()
    );

    // Blocks until the client closes stdin
    server.run().await?;

    debug!("mathmcp shut down");

    Ok(())
}
