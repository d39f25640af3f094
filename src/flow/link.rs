use serde::{Deserialize, Serialize};

use super::block::{Block, LinkedStoryName};
use crate::model::StoryId;

/// A story a link-story block may point at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableStory {
    pub id: StoryId,
    pub name: String,
}

impl AvailableStory {
    pub fn new(id: impl Into<StoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    fn matches(&self, story_id: &str) -> bool {
        match &self.id {
            StoryId::Name(name) => name == story_id,
            StoryId::Number(n) => story_id.trim().parse::<i64>().is_ok_and(|parsed| parsed == *n),
        }
    }
}

/// Recomputes the cached display name of a link-story block.
///
/// Blocks without a link are left alone and yield `None`. A link whose story
/// is not in `stories` resolves to [`LinkedStoryName::Unavailable`].
pub fn resolve_linked_story_name<'a>(
    block: &'a mut Block,
    stories: &[AvailableStory],
) -> Option<&'a LinkedStoryName> {
    let link = block.link.as_mut()?;
    link.name = stories
        .iter()
        .find(|story| story.matches(&link.story_id))
        .map(|story| LinkedStoryName::Resolved(story.name.clone()))
        .unwrap_or(LinkedStoryName::Unavailable);
    Some(&link.name)
}
