use super::block::Block;
use super::geometry::Point;
use crate::model::{BlockId, ConnectionId};

/// Directed edge between two blocks.
///
/// Endpoints are weak: they name blocks by id and are resolved through the
/// owning graph. `from_point`/`to_point` cache the anchors of the connected
/// blocks and are refreshed whenever either endpoint moves or resizes.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_block_id: BlockId,
    pub to_block_id: BlockId,
    pub from_point: Point,
    pub to_point: Point,
}

impl Connection {
    pub(crate) fn between(id: ConnectionId, from: &Block, to: &Block) -> Self {
        Self {
            id,
            from_block_id: from.id.clone(),
            to_block_id: to.id.clone(),
            from_point: from.bounds().output_anchor(),
            to_point: to.bounds().input_anchor(),
        }
    }

    pub fn touches(&self, block_id: &BlockId) -> bool {
        &self.from_block_id == block_id || &self.to_block_id == block_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_block_id == self.to_block_id
    }

    pub(crate) fn refresh_points(&mut self, from: &Block, to: &Block) {
        self.from_point = from.bounds().output_anchor();
        self.to_point = to.bounds().input_anchor();
    }
}
