//! Structures to realise a request-reply pattern
//!
//! This module provides the types for a correlated request/reply exchange on
//! top of a raw [`MessageBus`](super::bus::MessageBus). A [`Command`] is
//! wrapped into a [`RequestEnvelope`] under a freshly generated identifier
//! and published on the command's subject. The single correlated reply is
//! routed back through an ephemeral reply channel whose name is derived from
//! that identifier by convention, so any number of exchanges may be in flight
//! on one shared bus connection as long as identifiers are unique.
//!
//! The [`Requestor`] trait is the seam handed to callers; [`BusRequestor`] is
//! its implementation over a [`MessageBus`]. Every exchange performs exactly
//! one subscribe, one publish and one bounded wait. Nothing is retried, every
//! failure surfaces as a distinct [`RequestError`] variant.

mod command;
mod envelope;
mod requestor;

pub use command::*;
pub use envelope::*;
pub use requestor::*;
