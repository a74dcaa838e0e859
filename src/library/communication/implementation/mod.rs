//! Trait implementations for concrete transports

pub mod mock;
pub mod redis;
