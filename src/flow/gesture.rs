//! Pointer gestures that span several input events.
//!
//! A gesture holds only its own pending state; the graph is touched when the
//! gesture commits, so an abandoned gesture leaves it as it was.

use super::geometry::Point;
use super::graph::FlowGraph;
use crate::errors::{FlowError, FlowResult};
use crate::model::{BlockId, ConnectionId};

/// A connection being drawn from a block's output anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionDraft {
    from: BlockId,
}

impl ConnectionDraft {
    pub fn source(&self) -> &BlockId {
        &self.from
    }

    /// Commits the draft. Releasing over empty canvas (`target == None`)
    /// abandons it and returns `Ok(None)`.
    pub fn finish(
        self,
        graph: &mut FlowGraph,
        target: Option<&BlockId>,
    ) -> FlowResult<Option<ConnectionId>> {
        match target {
            Some(to) => graph.connect(&self.from, to).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel(self) {}
}

/// A block being dragged; keeps the grab point fixed relative to the block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDrag {
    block: BlockId,
    grab_offset: Point,
}

impl BlockDrag {
    pub fn block(&self) -> &BlockId {
        &self.block
    }

    pub fn drag_to(&self, graph: &mut FlowGraph, pointer: Point) -> FlowResult<()> {
        graph.move_block(
            &self.block,
            pointer.x - self.grab_offset.x,
            pointer.y - self.grab_offset.y,
        )
    }
}

impl FlowGraph {
    pub fn begin_connection(&self, from: &BlockId) -> FlowResult<ConnectionDraft> {
        if !self.contains_block(from) {
            return Err(FlowError::BlockNotFound(from.clone()));
        }
        Ok(ConnectionDraft { from: from.clone() })
    }

    pub fn begin_drag(&self, id: &BlockId, pointer: Point) -> FlowResult<BlockDrag> {
        let block = self
            .block(id)
            .ok_or_else(|| FlowError::BlockNotFound(id.clone()))?;
        Ok(BlockDrag {
            block: id.clone(),
            grab_offset: Point::new(pointer.x - block.position.x, pointer.y - block.position.y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::block::{Block, BlockKind};

    fn two_blocks() -> FlowGraph {
        let mut graph = FlowGraph::new();
        for id in ["a", "b"] {
            graph
                .insert_block(Block::new(BlockKind::TextResponse).with_id(id).with_size(100.0, 40.0))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_draft_commits_on_target() {
        let mut graph = two_blocks();
        let draft = graph.begin_connection(&BlockId::from("a")).unwrap();
        let id = draft.finish(&mut graph, Some(&BlockId::from("b"))).unwrap();
        assert!(id.is_some());
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_draft_released_on_canvas_changes_nothing() {
        let mut graph = two_blocks();
        let draft = graph.begin_connection(&BlockId::from("a")).unwrap();
        assert_eq!(draft.finish(&mut graph, None).unwrap(), None);
        assert_eq!(graph.connection_count(), 0);

        graph.begin_connection(&BlockId::from("a")).unwrap().cancel();
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_draft_onto_itself_is_rejected() {
        let mut graph = two_blocks();
        let a = BlockId::from("a");
        let draft = graph.begin_connection(&a).unwrap();
        assert_eq!(
            draft.finish(&mut graph, Some(&a)),
            Err(FlowError::SelfLoop(a.clone()))
        );
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut graph = two_blocks();
        let a = BlockId::from("a");
        graph.move_block(&a, 10.0, 10.0).unwrap();

        let drag = graph.begin_drag(&a, Point::new(30.0, 25.0)).unwrap();
        drag.drag_to(&mut graph, Point::new(130.0, 225.0)).unwrap();
        assert_eq!(graph.block(&a).unwrap().position, Point::new(110.0, 210.0));
    }

    #[test]
    fn test_drag_of_removed_block_fails() {
        let mut graph = two_blocks();
        let a = BlockId::from("a");
        let drag = graph.begin_drag(&a, Point::default()).unwrap();
        graph.remove_block(&a);
        assert_eq!(
            drag.drag_to(&mut graph, Point::new(1.0, 1.0)),
            Err(FlowError::BlockNotFound(a))
        );
    }
}
