use anyhow::Result;
use busbridge::module::gateway::{self, Gateway};
use structopt::StructOpt;
use tracing::info;

#[derive(Debug, StructOpt)]
#[structopt(about = "HTTP gateway translating synchronous requests into message bus exchanges")]
struct MainOptions {
    /// Log level filter
    #[structopt(long, env = "RUST_LOG", default_value = "info")]
    log: String,

    #[structopt(flatten)]
    gateway: gateway::Options,
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = MainOptions::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(options.log.as_str())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting busbridge");

    Gateway::new(options.gateway)
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
