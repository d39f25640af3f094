use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::story_session::StoryUpdate;
use crate::model::StoryId;

/// Fan-out of story updates to in-process subscribers, one channel per story group.
///
/// Channels are created on first use and dropped by [`cleanup_idle`] once
/// every receiver is gone. Delivery to remote clients is handled elsewhere;
/// this only hands out the payload.
///
/// [`cleanup_idle`]: SessionNotifier::cleanup_idle
#[derive(Clone)]
pub struct SessionNotifier {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<StoryUpdate>>>>,
    buffer_size: usize,
}

impl SessionNotifier {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size: buffer_size.max(1),
        }
    }

    pub async fn subscribe(&self, story_id: &StoryId) -> broadcast::Receiver<StoryUpdate> {
        self.sender(story_id.group_name()).await.subscribe()
    }

    /// Publishes an update to its story group.
    ///
    /// Returns the number of subscribers reached; zero when nobody listens.
    pub async fn publish(&self, update: StoryUpdate) -> usize {
        let group = update.group.clone();
        let sender = self.sender(group.clone()).await;
        // send only fails when there are no receivers
        let delivered = sender.send(update).unwrap_or(0);
        debug!("Published story update to {} ({} receivers)", group, delivered);
        delivered
    }

    pub async fn receiver_count(&self, story_id: &StoryId) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(&story_id.group_name())
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Removes channels without receivers and returns how many were dropped.
    pub async fn cleanup_idle(&self) -> usize {
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        before - channels.len()
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    async fn sender(&self, group: String) -> broadcast::Sender<StoryUpdate> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&group) {
                return sender.clone();
            }
        }

        // Re-check under the write lock, another task may have won the race
        let mut channels = self.channels.write().await;
        channels
            .entry(group)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .clone()
    }
}
