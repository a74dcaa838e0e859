//! Various options usable by modules
//!
//! The structs in this module allow other modules to flatten them into
//! their own options struct. This allows for a unified yet non-cluttered
//! option set.

use structopt::StructOpt;

/// Options for connecting to the message bus
#[derive(Debug, StructOpt)]
pub struct BusOptions {
    /// Message bus server URL
    #[structopt(
        short = "b",
        long = "bus",
        env = "BUS",
        default_value = "redis://localhost:6379/",
        value_name = "url"
    )]
    pub url: String,
}
