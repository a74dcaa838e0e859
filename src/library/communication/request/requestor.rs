use super::super::bus::{MessageBus, Subscription};
use super::{reply_channel, Command, RequestEnvelope, ResponseEnvelope};
use crate::library::BoxedError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

/// Reply wait window applied when none is configured explicitly
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for request/reply exchanges
///
/// Every failure mode surfaces as its own variant so callers can tell a
/// timeout apart from a reply that arrived but could not be decoded. None of
/// them is retried internally.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request envelope could not be serialized
    #[error("unable to serialize request envelope")]
    SerializationFailed(#[source] serde_json::Error),
    /// Reply subscription could not be opened
    #[error("unable to subscribe to reply channel")]
    SubscriptionFailed(#[source] BoxedError),
    /// Request could not be published
    #[error("unable to publish request")]
    PublishingFailed(#[source] BoxedError),
    /// Reply subscription broke down while waiting
    #[error("reply channel closed prematurely")]
    ReceptionFailed(#[source] BoxedError),
    /// No reply arrived within the wait window
    #[error("no reply received within {0:?}")]
    Timeout(Duration),
    /// Reply bytes did not decode into a response envelope
    #[error("unable to decode reply envelope")]
    MalformedReply(#[source] serde_json::Error),
    /// Reply echoed an identifier belonging to a different request
    #[error("reply correlation identifier mismatch (sent {sent}, received {received})")]
    CorrelationMismatch {
        /// Identifier the request was dispatched under
        sent: String,
        /// Identifier the reply carried instead
        received: String,
    },
    /// Reply payload did not match the shape expected by the command
    #[error("invalid reply payload for command '{0}'")]
    InvalidPayload(&'static str, #[source] serde_json::Error),
}

/// Client able to perform correlated request/reply exchanges
#[async_trait]
pub trait Requestor {
    /// Publishes a command and waits for its single correlated reply
    async fn request<C: Command + 'static>(&self, command: &C) -> Result<C::Reply, RequestError>;
}

/// [`Requestor`] implementation on top of a shared [`MessageBus`] connection
///
/// Every call opens its own ephemeral reply subscription keyed by a freshly
/// generated identifier, so concurrent exchanges on the same connection do
/// not interfere. The subscription is held by value and therefore released
/// on every exit path: success, decode failure, timeout, or cancellation of
/// the calling future (e.g. when the HTTP client disconnects).
#[derive(Clone)]
pub struct BusRequestor<B: MessageBus> {
    bus: B,
    timeout: Duration,
}

impl<B: MessageBus> BusRequestor<B> {
    /// Creates a new instance with the [`DEFAULT_REQUEST_TIMEOUT`]
    pub fn new(bus: B) -> Self {
        Self::with_timeout(bus, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a new instance waiting at most `timeout` for each reply
    pub fn with_timeout(bus: B, timeout: Duration) -> Self {
        Self { bus, timeout }
    }
}

#[async_trait]
impl<B> Requestor for BusRequestor<B>
where
    B: MessageBus + Send + Sync,
    B::Subscription: Send,
{
    async fn request<C: Command + 'static>(&self, command: &C) -> Result<C::Reply, RequestError> {
        let envelope = RequestEnvelope::new(command);
        let data = serde_json::to_vec(&envelope).map_err(RequestError::SerializationFailed)?;
        let channel = reply_channel(&envelope.requestid);

        // The subscription has to exist before the request becomes visible
        // to responders, else a fast reply could be lost.
        let mut subscription = self
            .bus
            .subscribe(&channel)
            .await
            .map_err(RequestError::SubscriptionFailed)?;

        self.bus
            .publish(C::subject(), &data)
            .await
            .map_err(RequestError::PublishingFailed)?;

        debug!(
            command = C::NAME,
            request_id = %envelope.requestid,
            "Awaiting correlated reply"
        );

        let raw = timeout(self.timeout, subscription.next_message())
            .await
            .map_err(|_| RequestError::Timeout(self.timeout))?
            .map_err(RequestError::ReceptionFailed)?;

        let reply: ResponseEnvelope =
            serde_json::from_slice(&raw).map_err(RequestError::MalformedReply)?;

        let sent = envelope.requestid.to_string();
        if reply.requestid != sent {
            return Err(RequestError::CorrelationMismatch {
                sent,
                received: reply.requestid,
            });
        }

        serde_json::from_value(reply.payload)
            .map_err(|e| RequestError::InvalidPayload(C::NAME, e))
    }
}

#[cfg(test)]
mod does {
    use super::super::super::implementation::mock::MockBus;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    const TEST_SUBJECT: &str = "test.ingress";

    #[derive(Debug, Serialize)]
    struct Ping {
        value: String,
    }

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Pong {
        echo: String,
    }

    impl Command for Ping {
        type Reply = Pong;
        const NAME: &'static str = "ping";

        fn subject() -> &'static str {
            TEST_SUBJECT
        }
    }

    /// Spawns a task answering every request on the test subject
    ///
    /// The ingress subscription is opened before the task is spawned so that
    /// no request issued afterwards can race past it. The reply body is
    /// produced by the given function from the incoming request envelope;
    /// returning the correct `requestid` is up to the function so tests can
    /// deliberately break correlation.
    async fn spawn_responder<F>(bus: &MockBus, reply: F)
    where
        F: Fn(&Value) -> Vec<u8> + Send + 'static,
    {
        let mut subscription = bus.subscribe(TEST_SUBJECT).await.unwrap();
        let bus = bus.clone();

        tokio::spawn(async move {
            while let Ok(raw) = subscription.next_message().await {
                let envelope: Value = serde_json::from_slice(&raw).unwrap();
                let channel = format!("reply.{}", envelope["requestid"].as_str().unwrap());
                bus.publish(&channel, &reply(&envelope)).await.unwrap();
            }
        });
    }

    fn echo_reply(envelope: &Value) -> Vec<u8> {
        json!({
            "requestid": envelope["requestid"],
            "meta": {},
            "payload": { "echo": format!("pong {}", envelope["payload"]["value"].as_str().unwrap()) }
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn deliver_correlated_reply() {
        let bus = MockBus::default();
        spawn_responder(&bus, echo_reply).await;

        let requestor = BusRequestor::new(bus);
        let reply = requestor
            .request(&Ping {
                value: "hello".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            reply,
            Pong {
                echo: "pong hello".into()
            }
        );
    }

    #[tokio::test]
    async fn release_subscription_after_success() {
        let bus = MockBus::default();
        spawn_responder(&bus, echo_reply).await;

        let requestor = BusRequestor::new(bus.clone());
        requestor
            .request(&Ping { value: "x".into() })
            .await
            .unwrap();

        // Only the responder's ingress subscription may remain
        assert_eq!(bus.active_subscriptions(), 1);
        assert_eq!(bus.subscriber_count(TEST_SUBJECT), 1);
    }

    #[tokio::test]
    async fn report_timeout_and_release_subscription() {
        let bus = MockBus::default();
        let requestor = BusRequestor::with_timeout(bus.clone(), Duration::from_millis(20));

        let result = requestor.request(&Ping { value: "x".into() }).await;

        assert!(matches!(result, Err(RequestError::Timeout(_))));
        assert_eq!(bus.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn release_subscription_when_the_caller_gives_up() {
        let bus = MockBus::default();
        let requestor = BusRequestor::with_timeout(bus.clone(), Duration::from_secs(60));
        let command = Ping { value: "x".into() };

        {
            let request = requestor.request(&command);
            futures::pin_mut!(request);

            // Drive the exchange up to the reply wait, then abandon it
            assert!(futures::poll!(request.as_mut()).is_pending());
            assert_eq!(bus.active_subscriptions(), 1);
        }

        assert_eq!(bus.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn distinguish_malformed_reply_from_timeout() {
        let bus = MockBus::default();
        spawn_responder(&bus, |_| b"not json".to_vec()).await;

        let requestor = BusRequestor::new(bus);
        let result = requestor.request(&Ping { value: "x".into() }).await;

        assert!(matches!(result, Err(RequestError::MalformedReply(_))));
    }

    #[tokio::test]
    async fn reject_foreign_correlation_identifier() {
        let bus = MockBus::default();
        spawn_responder(&bus, |envelope| {
            let mut reply: Value = serde_json::from_slice(&echo_reply(envelope)).unwrap();
            reply["requestid"] = json!("somebody-else");
            reply.to_string().into_bytes()
        })
        .await;

        let requestor = BusRequestor::new(bus);
        let result = requestor.request(&Ping { value: "x".into() }).await;

        assert!(matches!(
            result,
            Err(RequestError::CorrelationMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn reject_mistyped_reply_payload() {
        let bus = MockBus::default();
        spawn_responder(&bus, |envelope| {
            json!({
                "requestid": envelope["requestid"],
                "meta": {},
                "payload": { "echo": 42 }
            })
            .to_string()
            .into_bytes()
        })
        .await;

        let requestor = BusRequestor::new(bus);
        let result = requestor.request(&Ping { value: "x".into() }).await;

        assert!(matches!(result, Err(RequestError::InvalidPayload(_, _))));
    }

    #[tokio::test]
    async fn isolate_concurrent_exchanges() {
        let bus = MockBus::default();
        spawn_responder(&bus, echo_reply).await;

        let requestor = BusRequestor::new(bus);
        let exchanges = (0..16).map(|i| {
            let requestor = requestor.clone();

            async move {
                let reply = requestor
                    .request(&Ping {
                        value: format!("#{}", i),
                    })
                    .await
                    .unwrap();

                assert_eq!(reply.echo, format!("pong #{}", i));
            }
        });

        futures::future::join_all(exchanges).await;
    }
}
