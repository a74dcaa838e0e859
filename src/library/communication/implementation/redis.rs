//! [`MessageBus`] implementation using [Redis Pub/Sub](https://redis.io/docs/interact/pubsub/)

use super::super::bus::{MessageBus, Subscription};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::{MultiplexedConnection, PubSub};
use redis::{AsyncCommands, Client};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
enum RedisBusError {
    #[error("pub/sub connection closed by the server")]
    ConnectionClosed,
}

/// Connection to a Redis server acting as the message bus
///
/// All publishing goes through one multiplexed connection which is shared by
/// every concurrent caller. Redis requires a connection in subscriber mode to
/// do nothing else, so each subscription receives its own dedicated
/// connection. That connection is closed, and the channel unsubscribed, when
/// the [`RedisSubscription`] handle is dropped.
#[derive(Clone)]
pub struct RedisBus {
    client: Client,
    publisher: MultiplexedConnection,
}

impl RedisBus {
    /// Connects to the Redis server at the given URL
    ///
    /// The publishing connection is established eagerly so that an
    /// unreachable server fails the call instead of the first request.
    pub async fn connect(url: &str) -> Result<Self, BoxedError> {
        let client = Client::open(url)?;
        let publisher = client.get_multiplexed_async_connection().await?;

        Ok(Self { client, publisher })
    }
}

#[async_trait]
impl MessageBus for RedisBus {
    type Subscription = RedisSubscription;

    async fn subscribe(&self, channel: &str) -> Result<RedisSubscription, BoxedError> {
        let mut pubsub = self.client.get_async_connection().await?.into_pubsub();
        pubsub.subscribe(channel).await?;
        trace!(channel, "Subscribed");

        Ok(RedisSubscription { pubsub })
    }

    async fn publish(&self, channel: &str, payload: &[u8]) -> EmptyResult {
        let mut connection = self.publisher.clone();
        connection.publish::<_, _, ()>(channel, payload).await?;

        Ok(())
    }
}

/// Exclusive handle on one subscribed Redis Pub/Sub channel
pub struct RedisSubscription {
    pubsub: PubSub,
}

#[async_trait]
impl Subscription for RedisSubscription {
    async fn next_message(&mut self) -> Result<Vec<u8>, BoxedError> {
        match self.pubsub.on_message().next().await {
            Some(message) => Ok(message.get_payload_bytes().to_vec()),
            None => Err(RedisBusError::ConnectionClosed.into()),
        }
    }
}
