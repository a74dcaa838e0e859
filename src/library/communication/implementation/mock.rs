//! In-memory [`MessageBus`] double for exercising correlation logic in tests

use super::super::bus::{MessageBus, Subscription};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
enum MockBusError {
    #[error("mock channel closed")]
    ChannelClosed,
}

type Subscribers = HashMap<String, Vec<(usize, mpsc::UnboundedSender<Vec<u8>>)>>;

/// Process-local bus fanning published payloads out to all current
/// subscribers of a channel
///
/// Cloning yields another handle onto the same bus. Subscriber and publish
/// bookkeeping is exposed so tests can assert that an exchange released its
/// subscription and that no message was published at all.
#[derive(Clone, Default)]
pub struct MockBus {
    subscribers: Arc<Mutex<Subscribers>>,
    published: Arc<Mutex<HashMap<String, usize>>>,
    next_id: Arc<AtomicUsize>,
}

impl MockBus {
    /// Number of currently open subscriptions across all channels
    pub fn active_subscriptions(&self) -> usize {
        self.subscribers.lock().unwrap().values().map(|s| s.len()).sum()
    }

    /// Number of currently open subscriptions on one channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .get(channel)
            .map(|s| s.len())
            .unwrap_or(0)
    }

    /// Number of payloads published on one channel so far
    pub fn published_count(&self, channel: &str) -> usize {
        *self.published.lock().unwrap().get(channel).unwrap_or(&0)
    }
}

#[async_trait]
impl MessageBus for MockBus {
    type Subscription = MockSubscription;

    async fn subscribe(&self, channel: &str) -> Result<MockSubscription, BoxedError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        self.subscribers
            .lock()
            .unwrap()
            .entry(channel.to_owned())
            .or_default()
            .push((id, sender));

        Ok(MockSubscription {
            channel: channel.to_owned(),
            id,
            receiver,
            subscribers: Arc::clone(&self.subscribers),
        })
    }

    async fn publish(&self, channel: &str, payload: &[u8]) -> EmptyResult {
        *self
            .published
            .lock()
            .unwrap()
            .entry(channel.to_owned())
            .or_default() += 1;

        if let Some(subscribers) = self.subscribers.lock().unwrap().get(channel) {
            for (_, sender) in subscribers {
                // A subscriber dropped mid-send deregisters itself later
                let _ = sender.send(payload.to_vec());
            }
        }

        Ok(())
    }
}

/// Handle on one mock channel which deregisters itself on drop
pub struct MockSubscription {
    channel: String,
    id: usize,
    receiver: mpsc::UnboundedReceiver<Vec<u8>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

#[async_trait]
impl Subscription for MockSubscription {
    async fn next_message(&mut self) -> Result<Vec<u8>, BoxedError> {
        match self.receiver.recv().await {
            Some(payload) => Ok(payload),
            None => Err(MockBusError::ChannelClosed.into()),
        }
    }
}

impl Drop for MockSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.lock().unwrap();

        if let Some(list) = subscribers.get_mut(&self.channel) {
            list.retain(|(id, _)| *id != self.id);

            if list.is_empty() {
                subscribers.remove(&self.channel);
            }
        }
    }
}
