//! Independent and project agnostic infrastructure
//!
//! Submodules in here are not bound to the gateway domain and could be lifted
//! into their own crate at any given time. Everything domain specific lives in
//! the [`domain`](super::domain) module.

pub mod communication;
pub mod helpers;

/// Generic error type
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result with no value and a [`BoxedError`]
pub type EmptyResult = Result<(), BoxedError>;
