use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::story_session::StorySession;
use crate::model::StoryId;

/// Registry of in-memory story sessions (memory-only).
///
/// Construct one per process and hand it to whatever needs it; nothing here is
/// global. Sessions are created lazily and only disappear through [`clear`].
///
/// [`clear`]: SessionStore::clear
#[derive(Debug, Default)]
pub struct SessionStore {
    stories: DashMap<StoryId, Arc<StorySession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            stories: DashMap::new(),
        }
    }

    /// Returns the session for `story_id`, creating an empty one on first access.
    ///
    /// Concurrent callers for the same id all observe the same session.
    pub fn get_or_create(&self, story_id: impl Into<StoryId>) -> Arc<StorySession> {
        let story_id = story_id.into();
        // The entry guard holds the shard lock only until the Arc is cloned
        let entry = self.stories.entry(story_id.clone()).or_insert_with(|| {
            debug!("Creating session for story {}", story_id);
            Arc::new(StorySession::new(story_id.clone()))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, story_id: &StoryId) -> Option<Arc<StorySession>> {
        self.stories
            .get(story_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, story_id: &StoryId) -> bool {
        self.stories.contains_key(story_id)
    }

    /// Drops the session for `story_id`. Clearing an unknown story is a no-op.
    ///
    /// Returns whether a session was removed. Handles obtained earlier keep
    /// working but are detached from the store.
    pub fn clear(&self, story_id: &StoryId) -> bool {
        let removed = self.stories.remove(story_id).is_some();
        if removed {
            info!("Cleared session for story {}", story_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn story_ids(&self) -> Vec<StoryId> {
        let mut ids: Vec<StoryId> = self.stories.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}
