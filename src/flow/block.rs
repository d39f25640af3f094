use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geometry::{Bounds, Point, Size};
use crate::model::BlockId;

/// Behavioural variant of a block (matching frontend type names).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    UserInput,
    TextResponse,
    TypingDelay,
    MediaBlock,
    LinkStory,
    NotifyAgent,
    ConversationalForm,
    ConditionalRedirect,
    RssFeed,
    JsonApi,
    Shopify,
    NoQuickReply,
    QuickRepliesMain,
    QuickReplyItem,
    QuickReply,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::UserInput => "userInput",
            BlockKind::TextResponse => "textResponse",
            BlockKind::TypingDelay => "typingDelay",
            BlockKind::MediaBlock => "mediaBlock",
            BlockKind::LinkStory => "linkStory",
            BlockKind::NotifyAgent => "notifyAgent",
            BlockKind::ConversationalForm => "conversationalForm",
            BlockKind::ConditionalRedirect => "conditionalRedirect",
            BlockKind::RssFeed => "rssFeed",
            BlockKind::JsonApi => "jsonApi",
            BlockKind::Shopify => "shopify",
            BlockKind::NoQuickReply => "noQuickReply",
            BlockKind::QuickRepliesMain => "quickRepliesMain",
            BlockKind::QuickReplyItem => "quickReplyItem",
            BlockKind::QuickReply => "quickReply",
        }
    }
}

/// Sub-variant of user-input blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserInputSubType {
    Phrase,
    KeywordGroup,
    Anything,
}

/// Presentation status; never affects topology.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockStatus {
    Active,
    Error,
    New,
    Disabled,
    #[default]
    Normal,
}

/// Cached display name of a linked story.
///
/// Derived from the list of available stories; stale until the next resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkedStoryName {
    #[default]
    Unresolved,
    Resolved(String),
    /// The linked story id matched no available story.
    Unavailable,
}

impl LinkedStoryName {
    /// Name to show for this link, using `unavailable_label` for dangling links.
    pub fn display<'a>(&'a self, unavailable_label: &'a str) -> Option<&'a str> {
        match self {
            LinkedStoryName::Unresolved => None,
            LinkedStoryName::Resolved(name) => Some(name),
            LinkedStoryName::Unavailable => Some(unavailable_label),
        }
    }
}

/// Payload of a link-story block: a lookup key, not an owning reference.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryLink {
    pub story_id: String,
    pub name: LinkedStoryName,
}

impl StoryLink {
    pub fn new(story_id: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            name: LinkedStoryName::Unresolved,
        }
    }
}

/// Node of the flow graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub sub_type: Option<UserInputSubType>,
    pub name: String,
    pub content: Option<String>,
    pub position: Point,
    pub size: Size,
    pub status: BlockStatus,
    pub link: Option<StoryLink>,
    /// Variant fields this crate does not interpret, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::generate(kind.as_str()),
            kind,
            sub_type: None,
            name: String::new(),
            content: None,
            position: Point::default(),
            size: Size::default(),
            status: BlockStatus::Normal,
            link: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sub_type(mut self, sub_type: UserInputSubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn linking_story(mut self, story_id: impl Into<String>) -> Self {
        self.link = Some(StoryLink::new(story_id));
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    pub fn linked_story_id(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.story_id.as_str())
    }

    pub fn linked_story_name(&self) -> Option<&LinkedStoryName> {
        self.link.as_ref().map(|link| &link.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_gets_typed_id() {
        let block = Block::new(BlockKind::TypingDelay);
        assert!(block.id.as_str().starts_with("typingDelay-"));
        assert_eq!(block.status, BlockStatus::Normal);
    }

    #[test]
    fn test_linked_story_display() {
        assert_eq!(LinkedStoryName::Unresolved.display("N/A"), None);
        assert_eq!(LinkedStoryName::Unavailable.display("N/A"), Some("N/A"));
        assert_eq!(
            LinkedStoryName::Resolved("Report Incident".into()).display("N/A"),
            Some("Report Incident")
        );
    }

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&BlockKind::JsonApi).unwrap();
        assert_eq!(json, "\"jsonApi\"");
        let kind: BlockKind = serde_json::from_str("\"quickRepliesMain\"").unwrap();
        assert_eq!(kind, BlockKind::QuickRepliesMain);
        assert_eq!(kind.as_str(), "quickRepliesMain");
    }
}
