use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{
    AnythingCatcher, ApiBlock, ComponentHeader, ComponentKind, ConversationalForm, Keyword,
    LinkedStoryRef, MediaItem, Phrase, StoryComponent, StoryConnection, StoryMetadata,
    TextResponse, TypingDelay,
};
use crate::model::StoryId;

/// Plain-data working set of one story, as handed to the persistence layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySessionData {
    pub phrases: Vec<Phrase>,
    pub keywords: Vec<Keyword>,
    pub anythings: Vec<AnythingCatcher>,
    pub connections: Vec<StoryConnection>,
    pub conversational_forms: Vec<ConversationalForm>,
    pub typing_delays: Vec<TypingDelay>,
    pub link_stories: Vec<LinkedStoryRef>,
    pub text_responses: Vec<TextResponse>,
    pub json_apis: Vec<ApiBlock>,
    pub medias: Vec<MediaItem>,
    pub story: StoryMetadata,
}

impl StorySessionData {
    /// True when no sub-entity list holds anything.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
            && self.keywords.is_empty()
            && self.anythings.is_empty()
            && self.connections.is_empty()
            && self.conversational_forms.is_empty()
            && self.typing_delays.is_empty()
            && self.link_stories.is_empty()
            && self.text_responses.is_empty()
            && self.json_apis.is_empty()
            && self.medias.is_empty()
    }

    /// Headers of every chainable component, lists in declaration order.
    fn headers_mut(&mut self) -> impl Iterator<Item = &mut ComponentHeader> {
        self.phrases
            .iter_mut()
            .map(|c| &mut c.header)
            .chain(self.keywords.iter_mut().map(|c| &mut c.header))
            .chain(self.anythings.iter_mut().map(|c| &mut c.header))
            .chain(self.conversational_forms.iter_mut().map(|c| &mut c.header))
            .chain(self.typing_delays.iter_mut().map(|c| &mut c.header))
            .chain(self.link_stories.iter_mut().map(|c| &mut c.header))
            .chain(self.text_responses.iter_mut().map(|c| &mut c.header))
            .chain(self.json_apis.iter_mut().map(|c| &mut c.header))
            .chain(self.medias.iter_mut().map(|c| &mut c.header))
    }

    fn push_component(&mut self, component: StoryComponent) {
        match component {
            StoryComponent::Phrase(c) => self.phrases.push(c),
            StoryComponent::Keyword(c) => self.keywords.push(c),
            StoryComponent::Anything(c) => self.anythings.push(c),
            StoryComponent::ConversationalForm(c) => self.conversational_forms.push(c),
            StoryComponent::TypingDelay(c) => self.typing_delays.push(c),
            StoryComponent::LinkStory(c) => self.link_stories.push(c),
            StoryComponent::TextResponse(c) => self.text_responses.push(c),
            StoryComponent::JsonApi(c) => self.json_apis.push(c),
            StoryComponent::Media(c) => self.medias.push(c),
        }
    }
}

/// Payload announcing that a story's session changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryUpdate {
    pub story_id: StoryId,
    pub group: String,
    pub event: &'static str,
    pub data: StorySessionData,
}

pub const STORY_UPDATED_EVENT: &str = "StoryUpdated";

/// In-memory editing session for one story.
///
/// Lists are guarded by a single lock; every method below is atomic on its own
/// but concurrent writers to the same story race at list granularity.
#[derive(Debug)]
pub struct StorySession {
    story_id: StoryId,
    data: RwLock<StorySessionData>,
}

macro_rules! session_list {
    ($field:ident, $item:ty, $add:ident, $replace:ident) => {
        pub fn $add(&self, item: $item) {
            self.write().$field.push(item);
        }

        pub fn $replace(&self, items: Vec<$item>) -> Vec<$item> {
            std::mem::replace(&mut self.write().$field, items)
        }

        pub fn $field(&self) -> Vec<$item> {
            self.read().$field.clone()
        }
    };
}

impl StorySession {
    pub fn new(story_id: StoryId) -> Self {
        Self {
            story_id,
            data: RwLock::new(StorySessionData::default()),
        }
    }

    pub fn story_id(&self) -> &StoryId {
        &self.story_id
    }

    fn read(&self) -> RwLockReadGuard<'_, StorySessionData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StorySessionData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    session_list!(phrases, Phrase, add_phrase, replace_phrases);
    session_list!(keywords, Keyword, add_keyword, replace_keywords);
    session_list!(anythings, AnythingCatcher, add_anything, replace_anythings);
    session_list!(connections, StoryConnection, add_connection, replace_connections);
    session_list!(
        conversational_forms,
        ConversationalForm,
        add_conversational_form,
        replace_conversational_forms
    );
    session_list!(typing_delays, TypingDelay, add_typing_delay, replace_typing_delays);
    session_list!(link_stories, LinkedStoryRef, add_link_story, replace_link_stories);
    session_list!(text_responses, TextResponse, add_text_response, replace_text_responses);
    session_list!(json_apis, ApiBlock, add_json_api, replace_json_apis);
    session_list!(medias, MediaItem, add_media, replace_medias);

    pub fn metadata(&self) -> StoryMetadata {
        self.read().story.clone()
    }

    pub fn set_metadata(&self, metadata: StoryMetadata) {
        self.write().story = metadata;
    }

    /// Runs `f` with exclusive access to the session lists.
    pub fn update<R>(&self, f: impl FnOnce(&mut StorySessionData) -> R) -> R {
        f(&mut self.write())
    }

    pub fn snapshot(&self) -> StorySessionData {
        self.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Appends a component and wires it into the story's component chain.
    ///
    /// The first component of a story gets a root connection; later ones are
    /// linked from the last component that does not point anywhere yet.
    /// Returns the id assigned to the component.
    pub fn add_component(&self, mut component: StoryComponent) -> Uuid {
        let kind = component.kind();
        let component_id = Uuid::new_v4();
        {
            let header = component.header_mut();
            header.id = component_id;
            header.created_date = Utc::now();
            header.to_component_type = None;
            header.to_component_id = None;
        }

        let mut data = self.write();
        if data.connections.is_empty() {
            let connection_id = Uuid::new_v4();
            data.connections.push(StoryConnection {
                id: connection_id,
                story_id: self.story_id.clone(),
                from_component_type: kind,
                from_component_id: component_id,
                created_date: Utc::now(),
            });
            data.story.name = Some(kind.as_str().to_string());
            data.story.id = self.story_id.as_number();
            data.story.root_block_connection_id = Some(connection_id);
            info!("Root connection created for story {}", self.story_id);
        } else if let Some(tail) = data.headers_mut().filter(|h| !h.is_linked()).last() {
            tail.link_to(kind, component_id);
            debug!(
                "Linked new {} component {} to {}",
                kind.as_str(),
                component_id,
                tail.id
            );
        }
        data.push_component(component);

        info!(
            "{} added in memory for story {}",
            kind.as_str(),
            self.story_id
        );
        component_id
    }

    pub fn update_payload(&self) -> StoryUpdate {
        StoryUpdate {
            story_id: self.story_id.clone(),
            group: self.story_id.group_name(),
            event: STORY_UPDATED_EVENT,
            data: self.snapshot(),
        }
    }
}
