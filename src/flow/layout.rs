use std::collections::{HashSet, VecDeque};
use tracing::debug;

use super::graph::FlowGraph;
use crate::errors::{FlowError, FlowResult};
use crate::model::BlockId;

impl FlowGraph {
    /// Stacks the descendants of `root` vertically, breadth first.
    ///
    /// Each child is centered under its parent, `vertical_gap` below the
    /// parent's bottom edge. A block reachable through several parents is
    /// placed once, under the first parent that reaches it. Returns the ids of
    /// the blocks that were moved, each once, in placement order.
    pub fn layout_below(&mut self, root: &BlockId) -> FlowResult<Vec<BlockId>> {
        if !self.contains_block(root) {
            return Err(FlowError::BlockNotFound(root.clone()));
        }

        let gap = self.config().vertical_gap;
        let mut queue = VecDeque::from([root.clone()]);
        let mut placed = HashSet::from([root.clone()]);
        let mut moved = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(parent) = self.block(&current).map(|block| block.bounds()) else {
                continue;
            };
            let children: Vec<BlockId> = self.children(&current).into_iter().cloned().collect();

            for child in children {
                let Some(width) = self.block(&child).map(|block| block.size.width) else {
                    continue;
                };
                if !placed.insert(child.clone()) {
                    continue;
                }
                let x = parent.center_x() - width / 2.0;
                let y = parent.bottom() + gap;
                self.move_block(&child, x, y)?;
                moved.push(child.clone());
                queue.push_back(child);
            }
        }

        debug!("Laid out {} block(s) below {}", moved.len(), root);
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::block::{Block, BlockKind};
    use crate::flow::geometry::Point;

    fn block(id: &str, width: f64) -> Block {
        Block::new(BlockKind::TextResponse)
            .with_id(id)
            .with_size(width, 50.0)
    }

    #[test]
    fn test_chain_is_stacked_and_centered() {
        let mut graph = FlowGraph::new();
        graph.insert_block(block("a", 200.0).at(100.0, 0.0)).unwrap();
        graph.insert_block(block("b", 100.0).at(900.0, 900.0)).unwrap();
        graph.insert_block(block("c", 300.0)).unwrap();
        let (a, b, c) = (BlockId::from("a"), BlockId::from("b"), BlockId::from("c"));
        let ab = graph.connect(&a, &b).unwrap();
        graph.connect(&b, &c).unwrap();

        let moved = graph.layout_below(&a).unwrap();
        assert_eq!(moved, vec![b.clone(), c.clone()]);

        // a: center x 200, bottom 50
        assert_eq!(graph.block(&b).unwrap().position, Point::new(150.0, 130.0));
        // b: center x 200, bottom 180
        assert_eq!(graph.block(&c).unwrap().position, Point::new(50.0, 260.0));
        assert_eq!(graph.connection(&ab).unwrap().to_point, Point::new(150.0, 155.0));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = FlowGraph::new();
        graph.insert_block(block("a", 100.0)).unwrap();
        graph.insert_block(block("b", 100.0)).unwrap();
        let (a, b) = (BlockId::from("a"), BlockId::from("b"));
        graph.connect(&a, &b).unwrap();
        graph.connect(&b, &a).unwrap();

        let moved = graph.layout_below(&a).unwrap();
        assert_eq!(moved, vec![b]);
        assert_eq!(graph.block(&a).unwrap().position, Point::default());
    }

    #[test]
    fn test_shared_child_is_placed_once_under_first_parent() {
        let mut graph = FlowGraph::new();
        graph.insert_block(block("a", 100.0)).unwrap();
        graph.insert_block(block("b", 100.0)).unwrap();
        graph
            .insert_block(block("c", 200.0).with_size(200.0, 100.0))
            .unwrap();
        graph.insert_block(block("d", 100.0)).unwrap();
        let (a, b, c, d) = (
            BlockId::from("a"),
            BlockId::from("b"),
            BlockId::from("c"),
            BlockId::from("d"),
        );
        graph.connect(&a, &b).unwrap();
        graph.connect(&a, &c).unwrap();
        graph.connect(&b, &d).unwrap();
        graph.connect(&c, &d).unwrap();

        let moved = graph.layout_below(&a).unwrap();
        assert_eq!(moved, vec![b.clone(), c.clone(), d.clone()]);

        // under b (bottom 180), not under c (bottom 230)
        assert_eq!(graph.block(&d).unwrap().position, Point::new(0.0, 260.0));
        assert_eq!(graph.block(&c).unwrap().position, Point::new(-50.0, 130.0));
        graph.validate().unwrap();
    }

    #[test]
    fn test_unknown_root() {
        let mut graph = FlowGraph::new();
        assert!(graph.layout_below(&BlockId::from("ghost")).is_err());
    }
}
