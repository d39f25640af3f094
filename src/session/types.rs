use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::StoryId;

/// Component type names as exchanged with the persistence layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "UserInputPhrase")]
    Phrase,
    #[serde(rename = "UserInputKeyword")]
    Keyword,
    #[serde(rename = "UserInputTypeAnything")]
    Anything,
    #[serde(rename = "typingDelay")]
    TypingDelay,
    #[serde(rename = "textResponse")]
    TextResponse,
    #[serde(rename = "linkStory")]
    LinkStory,
    #[serde(rename = "conversationalForm")]
    ConversationalForm,
    #[serde(rename = "jsonAPI")]
    JsonApi,
    #[serde(rename = "Media")]
    Media,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Phrase => "UserInputPhrase",
            ComponentKind::Keyword => "UserInputKeyword",
            ComponentKind::Anything => "UserInputTypeAnything",
            ComponentKind::TypingDelay => "typingDelay",
            ComponentKind::TextResponse => "textResponse",
            ComponentKind::LinkStory => "linkStory",
            ComponentKind::ConversationalForm => "conversationalForm",
            ComponentKind::JsonApi => "jsonAPI",
            ComponentKind::Media => "Media",
        }
    }
}

/// Fields shared by every chainable story component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHeader {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub to_component_type: Option<ComponentKind>,
    #[serde(default)]
    pub to_component_id: Option<Uuid>,
}

impl ComponentHeader {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_date: Utc::now(),
            to_component_type: None,
            to_component_id: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.to_component_id.is_some()
    }

    pub fn link_to(&mut self, kind: ComponentKind, id: Uuid) {
        self.to_component_type = Some(kind);
        self.to_component_id = Some(id);
    }
}

impl Default for ComponentHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    #[serde(default)]
    pub phrase: Option<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub keyword_groups: Vec<Vec<String>>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// "Type anything" input catcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnythingCatcher {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    #[serde(default)]
    pub anything: Option<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// Entry point of a story's component chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryConnection {
    pub id: Uuid,
    pub story_id: StoryId,
    pub from_component_type: ComponentKind,
    pub from_component_id: Uuid,
    pub created_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub prompt_phrase: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalForm {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    pub form_id: String,
    pub form_name: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub send_email_notification: bool,
    #[serde(default)]
    pub notification_email: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub show_as_inline_form: bool,
    #[serde(default)]
    pub success_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingDelay {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    pub delay_seconds: f64,
}

/// Reference from one story to another, with the linked story's name as last seen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedStoryRef {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    #[serde(default)]
    pub bot_id: Option<String>,
    pub link_story_id: StoryId,
    #[serde(default)]
    pub link_story_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub title: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResponse {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    pub content: String,
    #[serde(default)]
    pub alternate_responses: Vec<String>,
    #[serde(default)]
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiHeader {
    pub key: String,
    pub value: String,
}

/// JSON API integration block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBlock {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    pub api_endpoint: String,
    pub request_type: String,
    #[serde(default)]
    pub api_headers: Vec<ApiHeader>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(flatten)]
    pub header: ComponentHeader,
    pub story_id: StoryId,
    pub media_id: String,
    pub media_type: String,
    #[serde(default)]
    pub media_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMetadata {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub bot_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub root_block_connection_id: Option<Uuid>,
    pub created_date: DateTime<Utc>,
}

impl Default for StoryMetadata {
    fn default() -> Self {
        Self {
            id: None,
            bot_id: None,
            name: None,
            root_block_connection_id: None,
            created_date: Utc::now(),
        }
    }
}

/// A component that can be appended to a story through the chaining path.
#[derive(Clone, Debug, PartialEq)]
pub enum StoryComponent {
    Phrase(Phrase),
    Keyword(Keyword),
    Anything(AnythingCatcher),
    ConversationalForm(ConversationalForm),
    TypingDelay(TypingDelay),
    LinkStory(LinkedStoryRef),
    TextResponse(TextResponse),
    JsonApi(ApiBlock),
    Media(MediaItem),
}

impl StoryComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            StoryComponent::Phrase(_) => ComponentKind::Phrase,
            StoryComponent::Keyword(_) => ComponentKind::Keyword,
            StoryComponent::Anything(_) => ComponentKind::Anything,
            StoryComponent::ConversationalForm(_) => ComponentKind::ConversationalForm,
            StoryComponent::TypingDelay(_) => ComponentKind::TypingDelay,
            StoryComponent::LinkStory(_) => ComponentKind::LinkStory,
            StoryComponent::TextResponse(_) => ComponentKind::TextResponse,
            StoryComponent::JsonApi(_) => ComponentKind::JsonApi,
            StoryComponent::Media(_) => ComponentKind::Media,
        }
    }

    pub fn header_mut(&mut self) -> &mut ComponentHeader {
        match self {
            StoryComponent::Phrase(c) => &mut c.header,
            StoryComponent::Keyword(c) => &mut c.header,
            StoryComponent::Anything(c) => &mut c.header,
            StoryComponent::ConversationalForm(c) => &mut c.header,
            StoryComponent::TypingDelay(c) => &mut c.header,
            StoryComponent::LinkStory(c) => &mut c.header,
            StoryComponent::TextResponse(c) => &mut c.header,
            StoryComponent::JsonApi(c) => &mut c.header,
            StoryComponent::Media(c) => &mut c.header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_kind_wire_names() {
        let json = serde_json::to_string(&ComponentKind::Anything).unwrap();
        assert_eq!(json, "\"UserInputTypeAnything\"");
        for kind in [
            ComponentKind::Phrase,
            ComponentKind::JsonApi,
            ComponentKind::Media,
            ComponentKind::LinkStory,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_header_is_flattened() {
        let delay = TypingDelay {
            header: ComponentHeader::new(),
            story_id: StoryId::from(3),
            delay_seconds: 1.5,
        };
        let value = serde_json::to_value(&delay).unwrap();
        assert!(value.get("id").is_some());
        assert!(value.get("createdDate").is_some());
        assert_eq!(value["storyId"], 3);
        assert_eq!(value["delaySeconds"], 1.5);
    }
}
