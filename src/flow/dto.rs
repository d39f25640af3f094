//! Block and connection records exchanged with the server.
//!
//! Saves are bulk: a [`StoryFlowDto`] always carries a story's whole block and
//! connection set, never a diff.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::block::{Block, BlockKind, BlockStatus, LinkedStoryName, StoryLink, UserInputSubType};
use super::geometry::{Point, Size};
use super::graph::FlowGraph;
use crate::config::FlowConfig;
use crate::errors::FlowResult;
use crate::model::{BlockId, ConnectionId, StoryId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDto {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<UserInputSubType>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_story_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_story_name: Option<String>,
    /// Variant fields (delay seconds, media id, form id...) passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockDto {
    pub fn from_block(block: &Block, unavailable_label: &str) -> Self {
        Self {
            id: block.id.clone(),
            kind: block.kind,
            sub_type: block.sub_type,
            name: block.name.clone(),
            content: block.content.clone(),
            x: block.position.x,
            y: block.position.y,
            width: block.size.width,
            height: block.size.height,
            status: block.status,
            link_story_id: block.linked_story_id().map(str::to_string),
            link_story_name: block
                .linked_story_name()
                .and_then(|name| name.display(unavailable_label))
                .map(str::to_string),
            extra: block.extra.clone(),
        }
    }

    /// A stored name equal to `unavailable_label` reads back as
    /// [`LinkedStoryName::Unavailable`].
    ///
    /// A name without a `linkStoryId` has nothing to resolve against; it is
    /// kept in `extra` so it is written back unchanged.
    pub fn into_block(self, unavailable_label: &str) -> Block {
        let mut extra = self.extra;
        let link = match (self.link_story_id, self.link_story_name) {
            (Some(story_id), name) => Some(StoryLink {
                story_id,
                name: match name {
                    None => LinkedStoryName::Unresolved,
                    Some(name) if name == unavailable_label => LinkedStoryName::Unavailable,
                    Some(name) => LinkedStoryName::Resolved(name),
                },
            }),
            (None, Some(name)) => {
                debug!(
                    "Block {} has linkStoryName {:?} without linkStoryId",
                    self.id, name
                );
                extra.insert("linkStoryName".to_string(), Value::String(name));
                None
            }
            (None, None) => None,
        };
        Block {
            id: self.id,
            kind: self.kind,
            sub_type: self.sub_type,
            name: self.name,
            content: self.content,
            position: Point::new(self.x, self.y),
            size: Size::new(self.width, self.height),
            status: self.status,
            link,
            extra,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub id: ConnectionId,
    pub from_block_id: BlockId,
    pub to_block_id: BlockId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFlowDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<StoryId>,
    #[serde(default)]
    pub blocks: Vec<BlockDto>,
    #[serde(default)]
    pub connections: Vec<ConnectionDto>,
}

impl FlowGraph {
    pub fn from_dto(dto: StoryFlowDto) -> FlowResult<Self> {
        Self::from_dto_with_config(dto, FlowConfig::default())
    }

    /// Builds a graph from a saved story, keeping every id.
    ///
    /// Fails on the first duplicate id, self-loop or connection to a block
    /// the document does not contain. A second connection with the same
    /// `from -> to` pair also fails the load, with
    /// [`FlowError::ConnectionAlreadyExists`], as it would when drawn by hand.
    ///
    /// [`FlowError::ConnectionAlreadyExists`]: crate::errors::FlowError::ConnectionAlreadyExists
    pub fn from_dto_with_config(dto: StoryFlowDto, config: FlowConfig) -> FlowResult<Self> {
        let label = config.unavailable_story_label.clone();
        let mut graph = FlowGraph::with_config(config);

        for block in dto.blocks {
            graph.insert_block(block.into_block(&label))?;
        }
        for connection in dto.connections {
            graph.insert_connection(
                connection.id,
                &connection.from_block_id,
                &connection.to_block_id,
            )?;
        }
        graph.validate()?;

        debug!(
            "Loaded flow with {} block(s) and {} connection(s)",
            graph.block_count(),
            graph.connection_count()
        );
        Ok(graph)
    }

    /// Exports blocks and connections in insertion order.
    pub fn to_dto(&self, story_id: Option<StoryId>) -> StoryFlowDto {
        let label = &self.config().unavailable_story_label;
        StoryFlowDto {
            story_id,
            blocks: self
                .blocks()
                .map(|block| BlockDto::from_block(block, label))
                .collect(),
            connections: self
                .connections()
                .map(|connection| ConnectionDto {
                    id: connection.id.clone(),
                    from_block_id: connection.from_block_id.clone(),
                    to_block_id: connection.to_block_id.clone(),
                })
                .collect(),
        }
    }
}
