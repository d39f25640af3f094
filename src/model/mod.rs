pub mod ids;

pub use ids::{BlockId, ConnectionId, StoryId};
