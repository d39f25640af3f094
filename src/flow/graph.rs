use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::debug;

use super::block::{Block, BlockStatus, LinkedStoryName};
use super::connection::Connection;
use super::geometry::{Point, Size};
use super::link::{resolve_linked_story_name, AvailableStory};
use crate::config::FlowConfig;
use crate::errors::{FlowError, FlowResult};
use crate::model::{BlockId, ConnectionId};

/// A block taken out of the graph together with everything that went with it.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedBlock {
    pub block: Block,
    /// Connections that referenced the block, removed in cascade.
    pub connections: Vec<Connection>,
    /// Parent-to-child connection created by a bridging removal.
    pub bridge: Option<ConnectionId>,
}

/// Client-side flow graph of one story.
///
/// Blocks and connections live in id-indexed tables; `incident` is the
/// reverse index from a block to every connection touching it, so removing a
/// block only visits its own connections. Every public mutation leaves the
/// graph valid: each connection joins two distinct live blocks.
#[derive(Clone, Debug, Default)]
pub struct FlowGraph {
    blocks: IndexMap<BlockId, Block>,
    connections: IndexMap<ConnectionId, Connection>,
    incident: HashMap<BlockId, IndexSet<ConnectionId>>,
    drop_point: Option<Point>,
    config: FlowConfig,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlowConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Remembers where the user last dropped something on the canvas.
    pub fn set_drop_point(&mut self, point: Point) {
        self.drop_point = Some(point);
    }

    pub fn drop_point(&self) -> Option<Point> {
        self.drop_point
    }

    /// Adds a block under a freshly generated id and returns that id.
    ///
    /// Placement: `position` if given, else the last drop point, else the
    /// block's own position.
    pub fn add_block(&mut self, mut block: Block, position: Option<Point>) -> BlockId {
        block.id = self.fresh_block_id(&block);
        if let Some(point) = position.or(self.drop_point) {
            block.position = point;
        }
        let id = block.id.clone();
        self.attach_block(block);
        id
    }

    /// Adds a block keeping its id, as when loading a saved story.
    pub fn insert_block(&mut self, block: Block) -> FlowResult<()> {
        if self.blocks.contains_key(&block.id) {
            return Err(FlowError::BlockAlreadyExists(block.id));
        }
        self.attach_block(block);
        Ok(())
    }

    /// Removes a block and every connection that starts or ends at it.
    pub fn remove_block(&mut self, id: &BlockId) -> Option<RemovedBlock> {
        let block = self.blocks.shift_remove(id)?;
        let incident = self.incident.remove(id).unwrap_or_default();

        let mut connections = Vec::with_capacity(incident.len());
        for connection_id in incident {
            let Some(connection) = self.connections.shift_remove(&connection_id) else {
                continue;
            };
            let other = if &connection.from_block_id == id {
                &connection.to_block_id
            } else {
                &connection.from_block_id
            };
            if let Some(index) = self.incident.get_mut(other) {
                index.shift_remove(&connection_id);
            }
            connections.push(connection);
        }

        debug!(
            "Removed block {} and {} connection(s)",
            id,
            connections.len()
        );
        Some(RemovedBlock {
            block,
            connections,
            bridge: None,
        })
    }

    /// Removes a block like [`remove_block`], then reconnects its only parent
    /// to its only child so a linear chain stays linked.
    ///
    /// [`remove_block`]: FlowGraph::remove_block
    pub fn remove_block_bridging(&mut self, id: &BlockId) -> Option<RemovedBlock> {
        let parents: Vec<BlockId> = self.parents(id).into_iter().cloned().collect();
        let children: Vec<BlockId> = self.children(id).into_iter().cloned().collect();
        let mut removed = self.remove_block(id)?;

        if let ([parent], [child]) = (parents.as_slice(), children.as_slice()) {
            match self.connect(parent, child) {
                Ok(connection_id) => removed.bridge = Some(connection_id),
                Err(err) => debug!("Skipped bridging {} -> {}: {}", parent, child, err),
            }
        }
        Some(removed)
    }

    pub fn move_block(&mut self, id: &BlockId, x: f64, y: f64) -> FlowResult<()> {
        let block = self
            .blocks
            .get_mut(id)
            .ok_or_else(|| FlowError::BlockNotFound(id.clone()))?;
        block.position = Point::new(x, y);
        self.refresh_connections_of(id);
        Ok(())
    }

    pub fn resize_block(&mut self, id: &BlockId, width: f64, height: f64) -> FlowResult<()> {
        let block = self
            .blocks
            .get_mut(id)
            .ok_or_else(|| FlowError::BlockNotFound(id.clone()))?;
        block.size = Size::new(width, height);
        self.refresh_connections_of(id);
        Ok(())
    }

    /// Applies `edit` to a block. The block keeps its id whatever `edit` does;
    /// connection endpoints follow any geometry change.
    pub fn edit_block(&mut self, id: &BlockId, edit: impl FnOnce(&mut Block)) -> FlowResult<()> {
        let block = self
            .blocks
            .get_mut(id)
            .ok_or_else(|| FlowError::BlockNotFound(id.clone()))?;
        edit(block);
        block.id = id.clone();
        self.refresh_connections_of(id);
        Ok(())
    }

    /// Connects two blocks; endpoints are taken from their current geometry.
    pub fn connect(&mut self, from: &BlockId, to: &BlockId) -> FlowResult<ConnectionId> {
        let id = ConnectionId::generate();
        self.check_connectable(&id, from, to).inspect_err(|err| {
            debug!("Rejected connection {} -> {}: {}", from, to, err);
        })?;
        self.attach_connection(id.clone(), from, to);
        Ok(id)
    }

    /// Adds a connection keeping its id, as when loading a saved story.
    pub fn insert_connection(
        &mut self,
        id: ConnectionId,
        from: &BlockId,
        to: &BlockId,
    ) -> FlowResult<()> {
        self.check_connectable(&id, from, to)
            .map_err(|err| match err {
                FlowError::BlockNotFound(block) => FlowError::DanglingConnection {
                    connection: id.clone(),
                    block,
                },
                other => other,
            })?;
        self.attach_connection(id, from, to);
        Ok(())
    }

    /// Removes a connection; unknown ids are ignored.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Connection> {
        let connection = self.connections.shift_remove(id)?;
        for endpoint in [&connection.from_block_id, &connection.to_block_id] {
            if let Some(index) = self.incident.get_mut(endpoint) {
                index.shift_remove(id);
            }
        }
        Some(connection)
    }

    /// Copies a block under a new id, shifted by the configured offset.
    ///
    /// The copy keeps kind, content, link and extra fields. Connections of
    /// the original are never copied: the duplicate starts detached.
    pub fn duplicate_block(&mut self, id: &BlockId) -> FlowResult<BlockId> {
        let source = self
            .blocks
            .get(id)
            .ok_or_else(|| FlowError::BlockNotFound(id.clone()))?;
        let offset = self.config.duplicate_offset;
        let mut copy = source.clone();
        copy.position = source.position.offset(offset, offset);
        copy.status = BlockStatus::New;
        copy.id = self.fresh_block_id(&copy);

        let new_id = copy.id.clone();
        self.attach_block(copy);
        Ok(new_id)
    }

    /// Recomputes the linked story name of every link-story block.
    ///
    /// Returns how many links point at stories that are not available.
    pub fn resolve_linked_story_names(&mut self, stories: &[AvailableStory]) -> usize {
        self.blocks
            .values_mut()
            .filter_map(|block| resolve_linked_story_name(block, stories))
            .filter(|name| matches!(name, LinkedStoryName::Unavailable))
            .count()
    }

    pub fn connections_of(&self, id: &BlockId) -> Vec<&Connection> {
        self.incident
            .get(id)
            .map(|index| {
                index
                    .iter()
                    .filter_map(|connection_id| self.connections.get(connection_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Blocks with a connection into `id`.
    pub fn parents(&self, id: &BlockId) -> Vec<&BlockId> {
        self.connections_of(id)
            .into_iter()
            .filter(|c| &c.to_block_id == id)
            .map(|c| &c.from_block_id)
            .collect()
    }

    /// Blocks `id` has a connection to.
    pub fn children(&self, id: &BlockId) -> Vec<&BlockId> {
        self.connections_of(id)
            .into_iter()
            .filter(|c| &c.from_block_id == id)
            .map(|c| &c.to_block_id)
            .collect()
    }

    pub fn find_connection(&self, from: &BlockId, to: &BlockId) -> Option<&Connection> {
        self.connections_of(from)
            .into_iter()
            .find(|c| &c.from_block_id == from && &c.to_block_id == to)
    }

    /// Checks that every connection joins two distinct live blocks and that
    /// the reverse index matches the connection table.
    pub fn validate(&self) -> FlowResult<()> {
        for connection in self.connections.values() {
            if connection.is_self_loop() {
                return Err(FlowError::SelfLoop(connection.from_block_id.clone()));
            }
            for endpoint in [&connection.from_block_id, &connection.to_block_id] {
                if !self.blocks.contains_key(endpoint) {
                    return Err(FlowError::DanglingConnection {
                        connection: connection.id.clone(),
                        block: endpoint.clone(),
                    });
                }
                let indexed = self
                    .incident
                    .get(endpoint)
                    .is_some_and(|index| index.contains(&connection.id));
                if !indexed {
                    return Err(FlowError::IndexInconsistent(endpoint.clone()));
                }
            }
        }

        for (block_id, index) in &self.incident {
            if !self.blocks.contains_key(block_id) {
                return Err(FlowError::IndexInconsistent(block_id.clone()));
            }
            let consistent = index.iter().all(|connection_id| {
                self.connections
                    .get(connection_id)
                    .is_some_and(|c| c.touches(block_id))
            });
            if !consistent {
                return Err(FlowError::IndexInconsistent(block_id.clone()));
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn fresh_block_id(&self, block: &Block) -> BlockId {
        loop {
            let id = BlockId::generate(block.kind.as_str());
            if !self.blocks.contains_key(&id) {
                return id;
            }
        }
    }

    fn attach_block(&mut self, mut block: Block) {
        if block.size.is_empty() {
            let default = self.config.default_block_size;
            block.size = Size::new(default.width, default.height);
        }
        self.incident.entry(block.id.clone()).or_default();
        self.blocks.insert(block.id.clone(), block);
    }

    fn check_connectable(&self, id: &ConnectionId, from: &BlockId, to: &BlockId) -> FlowResult<()> {
        if from == to {
            return Err(FlowError::SelfLoop(from.clone()));
        }
        if self.connections.contains_key(id) {
            return Err(FlowError::ConnectionIdInUse(id.clone()));
        }
        for endpoint in [from, to] {
            if !self.blocks.contains_key(endpoint) {
                return Err(FlowError::BlockNotFound(endpoint.clone()));
            }
        }
        if self.find_connection(from, to).is_some() {
            return Err(FlowError::ConnectionAlreadyExists {
                from: from.clone(),
                to: to.clone(),
            });
        }
        Ok(())
    }

    /// Endpoints must have been checked by `check_connectable`.
    fn attach_connection(&mut self, id: ConnectionId, from: &BlockId, to: &BlockId) {
        let (Some(from_block), Some(to_block)) = (self.blocks.get(from), self.blocks.get(to)) else {
            return;
        };
        let connection = Connection::between(id.clone(), from_block, to_block);
        for endpoint in [from, to] {
            self.incident
                .entry(endpoint.clone())
                .or_default()
                .insert(id.clone());
        }
        self.connections.insert(id, connection);
    }

    fn refresh_connections_of(&mut self, id: &BlockId) {
        let Some(index) = self.incident.get(id) else {
            return;
        };
        for connection_id in index {
            let Some(connection) = self.connections.get_mut(connection_id) else {
                continue;
            };
            if let (Some(from), Some(to)) = (
                self.blocks.get(&connection.from_block_id),
                self.blocks.get(&connection.to_block_id),
            ) {
                connection.refresh_points(from, to);
            }
        }
    }
}
