//! storefront: command-line client for the phone storefront API
//!
//! Every command goes through the authenticated gateway, so an expired
//! access token is refreshed transparently. The access token is kept in a
//! session file between invocations.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use storefront_client::{FileSession, Gateway, LoginRedirect, Navigator, StorefrontClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::Commands;
use config::Config;

/// Route the CLI reports to the login redirect; never public
const CLI_ROUTE: &str = "/cli";

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Command-line client for the phone storefront API")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "STOREFRONT_CONFIG", default_value = "storefront.toml")]
    config: PathBuf,

    /// Backend base URL (overrides config file)
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    /// Session file (overrides config file)
    #[arg(long, env = "STOREFRONT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Turns a forced login redirect into a hint on stderr
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        CLI_ROUTE.to_string()
    }

    fn redirect(&self, path: &str) {
        eprintln!(
            "Session expired. Sign in again with `storefront login` (redirect: {}).",
            path
        );
    }
}

/// `RUST_LOG` plus warnings from the binary and the client library
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("storefront=warn".parse()?)
        .add_directive("storefront_client=warn".parse()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter()?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(backend_url) = cli.backend_url {
        config.gateway.base_url = backend_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session.file = session_file;
    }

    info!(
        backend = %config.gateway.base_url,
        session = %config.session.file.display(),
        "Starting storefront"
    );

    let session = Arc::new(FileSession::open(&config.session.file)?);
    let gateway = Gateway::builder(config.gateway.clone())
        .session(session)
        .on_auth_event(Arc::new(LoginRedirect::with_guard(
            config.routes.clone(),
            TerminalNavigator,
        )))
        .build()?;
    let client = StorefrontClient::new(Arc::new(gateway));

    let output = commands::execute(&client, cli.command).await?;
    println!("{}", output.json);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_covers_client_library() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("storefront_client=warn"));
        assert!(filter.contains("storefront=warn"));
    }
}
