//! HTTP ingress translating synchronous requests into bus exchanges
//!
//! Each inbound HTTP request is served on its own task which blocks on the
//! correlated request/reply exchange until a reply arrives or the timeout
//! expires. The requestor is constructed once at startup and handed to the
//! route tree explicitly, there is no process-global client state.

use crate::library::communication::implementation::redis::RedisBus;
use crate::library::communication::request::BusRequestor;
use crate::library::EmptyResult;
use std::net::SocketAddr;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, warn};

mod options;
mod server;

pub use options::Options;

/// Module implementation
pub struct Gateway {
    options: Options,
}

impl Gateway {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Runs the gateway until a termination signal arrives
    ///
    /// An unreachable bus aborts startup. Once SIGINT or SIGTERM is received
    /// the server stops accepting connections and in-flight requests are
    /// drained for at most the configured grace period, after which the
    /// process (and with it the bus connection) is torn down.
    pub async fn run(self) -> EmptyResult {
        let bus = RedisBus::connect(&self.options.bus.url).await?;
        info!(url = %self.options.bus.url, "Connected to message bus");

        let requestor = BusRequestor::with_timeout(bus, self.options.request_timeout);
        let routes = server::routes(requestor);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let address = SocketAddr::from(([0, 0, 0, 0], self.options.port));
        let (address, serve) =
            warp::serve(routes).try_bind_with_graceful_shutdown(address, async {
                shutdown_rx.await.ok();
            })?;

        let server = tokio::spawn(serve);
        info!(%address, "Serving gateway");

        wait_for_termination_signal().await?;
        info!("Termination signal received, draining in-flight requests");

        let _ = shutdown_tx.send(());
        if timeout(self.options.termination_grace_period, server)
            .await
            .is_err()
        {
            warn!("Grace period expired before all requests finished");
        }

        Ok(())
    }
}

async fn wait_for_termination_signal() -> EmptyResult {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {},
        _ = sigint.recv() => {},
    }

    Ok(())
}
