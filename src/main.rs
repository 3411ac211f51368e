use clap::Parser;

mod chat;
mod cli;
mod config;
mod core;
mod logging;
mod providers;
mod server;

use crate::chat::SessionStore;
use crate::cli::Args;
use crate::config::Config;
use crate::core::error::RelayError;
use crate::providers::gateway::ProviderGateway;
use crate::server::AppState;

#[tokio::main]
async fn main() {
    // .env may carry RUST_LOG, so load it before the subscriber.
    let dotenv = dotenvy::dotenv();
    logging::init();
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), RelayError> {
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_args(&args);

    let gateway = ProviderGateway::from_config(&config)?;
    let state = AppState::new(gateway, SessionStore::with_limit(config.max_sessions));

    server::start_server(&config, state).await
}
