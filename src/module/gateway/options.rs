use crate::library::helpers::parse_seconds;
use crate::module::options::BusOptions;
use std::time::Duration;
use structopt::StructOpt;

/// Options for the gateway module
#[derive(Debug, StructOpt)]
pub struct Options {
    /// Port on which the HTTP server listens
    #[structopt(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Seconds to wait for a correlated reply before failing a request
    #[structopt(long, env = "REQUEST_TIMEOUT", default_value = "5", parse(try_from_str = parse_seconds))]
    pub request_timeout: Duration,

    /// Seconds granted to in-flight requests after a termination signal
    #[structopt(long, env = "TERMINATION_GRACE_PERIOD", default_value = "5", parse(try_from_str = parse_seconds))]
    pub termination_grace_period: Duration,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub bus: BusOptions,
}
