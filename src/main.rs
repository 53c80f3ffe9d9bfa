use clap::Parser;

use lightning::config::Cli;
use lightning::lifecycle;
use lightning::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.log)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        project = %config.project,
        address = %config.address,
        store = %config.store.address,
        backends = config.backends.len(),
        "Configuration loaded"
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    Ok(())
}
