//! Raw transport seam over a publish/subscribe messaging system

use super::super::{BoxedError, EmptyResult};
use async_trait::async_trait;

/// Exclusive handle on one subscribed channel
///
/// Dropping the handle releases the subscription. Implementations must make
/// sure this holds on every path, including cancellation of a future that
/// currently waits in [`next_message`](Subscription::next_message).
#[async_trait]
pub trait Subscription: Send {
    /// Waits for the next message published on the channel
    async fn next_message(&mut self) -> Result<Vec<u8>, BoxedError>;
}

/// Connection to a publish/subscribe message bus
///
/// A single instance is shared by arbitrarily many concurrent callers, so
/// implementations have to be safe for concurrent publishing and subscribing
/// without external locking.
#[async_trait]
pub trait MessageBus {
    /// Handle type returned for new subscriptions
    type Subscription: Subscription;

    /// Opens an exclusive subscription on the given channel
    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, BoxedError>;

    /// Publishes an opaque payload on the given channel
    ///
    /// Delivery is fire-and-forget. Whether anybody is subscribed to the
    /// channel is not observable from the publishing side.
    async fn publish(&self, channel: &str, payload: &[u8]) -> EmptyResult;
}
