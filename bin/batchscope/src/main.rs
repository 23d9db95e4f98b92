//! Entrypoint.

use driver::Driver;

use clap::Parser;
use config::Opts;
use eyre::Context;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let env_file = std::env::var("ENV_FILE").unwrap_or_else(|_| ".env".to_owned());
    dotenvy::from_filename(&env_file)
        .wrap_err_with(|| format!("Failed to load environment file {env_file}"))?;

    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("🔭 Batchscope starting...");

    Driver::new(opts).await?.start().await
}
