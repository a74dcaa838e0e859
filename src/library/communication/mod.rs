//! Structures to exchange messages with other services over a publish/subscribe bus
//!
//! Communication is split into two layers:
//!
//! 1. A raw transport seam, the [`MessageBus`](bus::MessageBus) trait, which only knows
//!    how to publish opaque payloads on named channels and how to open exclusive
//!    subscriptions on them.
//! 2. A request/reply correlation layer on top, centered around the
//!    [`Requestor`](request::Requestor) trait. It binds each published
//!    [`Command`](request::Command) to its eventual reply through an ephemeral,
//!    per-request reply channel derived from a freshly generated identifier.
//!
//! Concrete transports live in the [`implementation`] module. The production
//! implementation uses Redis Pub/Sub, an in-memory mock is provided for tests.

mod error;

pub mod bus;
pub mod implementation;
pub mod request;

pub use error::CauseChain;
