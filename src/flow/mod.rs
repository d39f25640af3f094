//! Client-side flow graph of a story.
//!
//! [`FlowGraph`] owns typed [`Block`]s and directed [`Connection`]s and keeps
//! them consistent under direct manipulation: removing a block removes its
//! connections, moving or resizing a block refreshes the cached connection
//! endpoints, and rejected edits leave the graph untouched. [`StoryFlowDto`]
//! is the JSON shape saved to and loaded from the server.

pub mod block;
pub mod connection;
pub mod dto;
pub mod edit;
pub mod geometry;
pub mod gesture;
pub mod graph;
pub mod layout;
pub mod link;

pub use block::{Block, BlockKind, BlockStatus, LinkedStoryName, StoryLink, UserInputSubType};
pub use connection::Connection;
pub use dto::{BlockDto, ConnectionDto, StoryFlowDto};
pub use edit::{EditOutcome, FlowEdit};
pub use geometry::{Bounds, Point, Size};
pub use gesture::{BlockDrag, ConnectionDraft};
pub use graph::{FlowGraph, RemovedBlock};
pub use link::{resolve_linked_story_name, AvailableStory};
