//! Server-side story sessions.
//!
//! A [`SessionStore`] keeps the editable sub-entities of every story that is
//! currently being edited, ahead of durable persistence. [`SessionNotifier`]
//! carries "story updated" payloads to subscribers of a story group.

pub mod notifier;
pub mod store;
pub mod story_session;
pub mod types;

pub use notifier::SessionNotifier;
pub use store::SessionStore;
pub use story_session::{StorySession, StorySessionData, StoryUpdate, STORY_UPDATED_EVENT};
pub use types::*;
