use serde::{Deserialize, Serialize};
use tracing::warn;

use super::dto::BlockDto;
use super::geometry::Point;
use super::graph::FlowGraph;
use crate::errors::FlowResult;
use crate::model::{BlockId, ConnectionId};

/// One user edit, as recorded by the canvas and replayed against a graph.
///
/// ```json
/// [
///   { "op": "addBlock", "block": { "id": "tmp", "type": "textResponse" }, "position": { "x": 0, "y": 0 } },
///   { "op": "connect", "from": "userInput-1", "to": "textResponse-2" },
///   { "op": "removeBlock", "id": "typingDelay-3", "bridge": true }
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FlowEdit {
    AddBlock {
        block: BlockDto,
        #[serde(default)]
        position: Option<Point>,
    },
    RemoveBlock {
        id: BlockId,
        /// Reconnect the removed block's only parent to its only child.
        #[serde(default)]
        bridge: bool,
    },
    MoveBlock {
        id: BlockId,
        x: f64,
        y: f64,
    },
    ResizeBlock {
        id: BlockId,
        width: f64,
        height: f64,
    },
    Connect {
        from: BlockId,
        to: BlockId,
    },
    Disconnect {
        id: ConnectionId,
    },
    DuplicateBlock {
        id: BlockId,
    },
    LayoutBelow {
        id: BlockId,
    },
    DropAt {
        x: f64,
        y: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    BlockAdded(BlockId),
    BlockRemoved {
        id: BlockId,
        connections_removed: usize,
        bridge: Option<ConnectionId>,
    },
    BlockMoved(BlockId),
    BlockResized(BlockId),
    Connected(ConnectionId),
    Disconnected(ConnectionId),
    Duplicated {
        source: BlockId,
        copy: BlockId,
    },
    LaidOut(Vec<BlockId>),
    DropPointSet(Point),
    /// The edit named something already gone; nothing changed.
    Unchanged,
}

impl FlowGraph {
    pub fn apply_edit(&mut self, edit: FlowEdit) -> FlowResult<EditOutcome> {
        let outcome = match edit {
            FlowEdit::AddBlock { block, position } => {
                let block = block.into_block(&self.config().unavailable_story_label);
                EditOutcome::BlockAdded(self.add_block(block, position))
            }
            FlowEdit::RemoveBlock { id, bridge } => {
                let removed = if bridge {
                    self.remove_block_bridging(&id)
                } else {
                    self.remove_block(&id)
                };
                match removed {
                    Some(removed) => EditOutcome::BlockRemoved {
                        id,
                        connections_removed: removed.connections.len(),
                        bridge: removed.bridge,
                    },
                    None => EditOutcome::Unchanged,
                }
            }
            FlowEdit::MoveBlock { id, x, y } => {
                self.move_block(&id, x, y)?;
                EditOutcome::BlockMoved(id)
            }
            FlowEdit::ResizeBlock { id, width, height } => {
                self.resize_block(&id, width, height)?;
                EditOutcome::BlockResized(id)
            }
            FlowEdit::Connect { from, to } => EditOutcome::Connected(self.connect(&from, &to)?),
            FlowEdit::Disconnect { id } => match self.disconnect(&id) {
                Some(_) => EditOutcome::Disconnected(id),
                None => EditOutcome::Unchanged,
            },
            FlowEdit::DuplicateBlock { id } => {
                let copy = self.duplicate_block(&id)?;
                EditOutcome::Duplicated { source: id, copy }
            }
            FlowEdit::LayoutBelow { id } => EditOutcome::LaidOut(self.layout_below(&id)?),
            FlowEdit::DropAt { x, y } => {
                let point = Point::new(x, y);
                self.set_drop_point(point);
                EditOutcome::DropPointSet(point)
            }
        };
        Ok(outcome)
    }

    /// Applies edits in order. A rejected edit changes nothing and does not
    /// stop the ones after it.
    pub fn apply_edits(
        &mut self,
        edits: impl IntoIterator<Item = FlowEdit>,
    ) -> Vec<FlowResult<EditOutcome>> {
        edits
            .into_iter()
            .enumerate()
            .map(|(index, edit)| {
                let result = self.apply_edit(edit);
                if let Err(err) = &result {
                    warn!("Edit #{} rejected: {}", index, err);
                }
                result
            })
            .collect()
    }
}
