use anyhow::Context;
use clap::Parser;
use flatstore::{Cli, Config, Server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli).context("invalid configuration")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting flatstore - JSON record store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let server = Server::start(&config).await?;
    info!("Server listening on: {}", server.local_addr());

    // Serve until Ctrl-C
    server.run().await?;

    Ok(())
}
