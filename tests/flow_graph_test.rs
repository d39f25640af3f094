//! Flow graph tests
//!
//! Structural validity under edits, cascade removal, endpoint tracking,
//! duplication policy and link-story resolution

use anyhow::Result;
use serde_json::json;

use storyflow::config::FlowConfig;
use storyflow::errors::FlowError;
use storyflow::flow::{
    AvailableStory, Block, BlockKind, BlockStatus, FlowEdit, FlowGraph, LinkedStoryName, Point,
    StoryFlowDto, UserInputSubType,
};
use storyflow::model::BlockId;

fn block(id: &str) -> Block {
    Block::new(BlockKind::TextResponse)
        .with_id(id)
        .with_size(200.0, 60.0)
}

fn graph_with(ids: &[&str]) -> Result<FlowGraph> {
    let mut graph = FlowGraph::new();
    for id in ids {
        graph.insert_block(block(id))?;
    }
    Ok(graph)
}

#[test]
fn test_remove_block_cascades_connections() -> Result<()> {
    let mut graph = graph_with(&["B1", "B2"])?;
    let b1 = BlockId::from("B1");
    let b2 = BlockId::from("B2");
    graph.connect(&b1, &b2)?;

    let removed = graph.remove_block(&b1).expect("B1 is in the graph");
    assert_eq!(removed.connections.len(), 1);

    let remaining: Vec<&BlockId> = graph.blocks().map(|b| &b.id).collect();
    assert_eq!(remaining, vec![&b2]);
    assert_eq!(graph.connection_count(), 0);
    assert!(graph.connections_of(&b2).is_empty());
    graph.validate()?;
    Ok(())
}

#[test]
fn test_remove_hub_leaves_no_reference() -> Result<()> {
    let mut graph = graph_with(&["hub", "a", "b", "c", "d"])?;
    let hub = BlockId::from("hub");
    for other in ["a", "b"] {
        graph.connect(&hub, &BlockId::from(other))?;
    }
    for other in ["c", "d"] {
        graph.connect(&BlockId::from(other), &hub)?;
    }
    graph.connect(&BlockId::from("a"), &BlockId::from("c"))?;

    graph.remove_block(&hub);
    assert!(graph.connections().all(|c| !c.touches(&hub)));
    assert_eq!(graph.connection_count(), 1);
    graph.validate()?;
    Ok(())
}

#[test]
fn test_connect_on_empty_graph_is_rejected() {
    let mut graph = FlowGraph::new();
    let result = graph.connect(&BlockId::from("x"), &BlockId::from("y"));
    assert!(matches!(result, Err(FlowError::BlockNotFound(_))));
    assert_eq!(graph.connection_count(), 0);
}

#[test]
fn test_self_loop_never_created() -> Result<()> {
    let mut graph = graph_with(&["a"])?;
    let a = BlockId::from("a");
    assert_eq!(graph.connect(&a, &a), Err(FlowError::SelfLoop(a.clone())));
    assert_eq!(graph.connection_count(), 0);
    Ok(())
}

#[test]
fn test_connect_to_missing_block_never_created() -> Result<()> {
    let mut graph = graph_with(&["a"])?;
    let result = graph.connect(&BlockId::from("a"), &BlockId::from("ghost"));
    assert_eq!(result, Err(FlowError::BlockNotFound(BlockId::from("ghost"))));
    assert_eq!(graph.connection_count(), 0);
    Ok(())
}

#[test]
fn test_move_updates_all_incident_endpoints() -> Result<()> {
    let mut graph = graph_with(&["mid", "up", "down"])?;
    let mid = BlockId::from("mid");
    let incoming = graph.connect(&BlockId::from("up"), &mid)?;
    let outgoing = graph.connect(&mid, &BlockId::from("down"))?;

    graph.move_block(&mid, 400.0, 300.0)?;
    let bounds = graph.block(&mid).unwrap().bounds();

    assert_eq!(graph.connection(&incoming).unwrap().to_point, bounds.input_anchor());
    assert_eq!(
        graph.connection(&outgoing).unwrap().from_point,
        bounds.output_anchor()
    );
    assert_eq!(bounds.input_anchor(), Point::new(400.0, 330.0));
    assert_eq!(bounds.output_anchor(), Point::new(600.0, 330.0));
    Ok(())
}

#[test]
fn test_move_unknown_block_fails() {
    let mut graph = FlowGraph::new();
    assert_eq!(
        graph.move_block(&BlockId::from("nope"), 1.0, 1.0),
        Err(FlowError::BlockNotFound(BlockId::from("nope")))
    );
}

#[test]
fn test_duplicate_copies_block_but_not_connections() -> Result<()> {
    let mut graph = graph_with(&["src", "dst"])?;
    let src = BlockId::from("src");
    graph.edit_block(&src, |b| {
        b.kind = BlockKind::UserInput;
        b.sub_type = Some(UserInputSubType::KeywordGroup);
        b.content = Some("pricing".to_string());
        b.status = BlockStatus::Active;
        b.position = Point::new(100.0, 100.0);
        b.extra.insert("keywords".to_string(), json!(["price", "cost"]));
    })?;
    graph.connect(&src, &BlockId::from("dst"))?;

    let copy_id = graph.duplicate_block(&src)?;
    assert_ne!(copy_id, src);

    let original = graph.block(&src).unwrap().clone();
    let copy = graph.block(&copy_id).unwrap();
    assert_eq!(copy.kind, original.kind);
    assert_eq!(copy.sub_type, original.sub_type);
    assert_eq!(copy.content, original.content);
    assert_eq!(copy.extra, original.extra);
    assert_eq!(copy.status, BlockStatus::New);
    assert_eq!(copy.position, Point::new(140.0, 140.0));

    assert!(graph.connections_of(&copy_id).is_empty());
    assert_eq!(graph.connection_count(), 1);
    Ok(())
}

#[test]
fn test_duplicate_offset_is_configurable() -> Result<()> {
    let config = FlowConfig {
        duplicate_offset: 10.0,
        ..FlowConfig::default()
    };
    let mut graph = FlowGraph::with_config(config);
    graph.insert_block(block("a"))?;
    let copy = graph.duplicate_block(&BlockId::from("a"))?;
    assert_eq!(graph.block(&copy).unwrap().position, Point::new(10.0, 10.0));
    Ok(())
}

#[test]
fn test_dangling_link_resolves_to_sentinel() -> Result<()> {
    let mut graph = FlowGraph::new();
    graph.insert_block(Block::new(BlockKind::LinkStory).with_id("link").linking_story("S9"))?;

    let unavailable = graph.resolve_linked_story_names(&[]);
    assert_eq!(unavailable, 1);

    let link = graph.block(&BlockId::from("link")).unwrap();
    assert_eq!(link.linked_story_name(), Some(&LinkedStoryName::Unavailable));
    let label = &graph.config().unavailable_story_label;
    assert_eq!(
        link.linked_story_name().and_then(|name| name.display(label)),
        Some("N/A")
    );

    let unavailable = graph.resolve_linked_story_names(&[AvailableStory::new("S9", "Checkout")]);
    assert_eq!(unavailable, 0);
    let link = graph.block(&BlockId::from("link")).unwrap();
    assert_eq!(
        link.linked_story_name(),
        Some(&LinkedStoryName::Resolved("Checkout".to_string()))
    );
    Ok(())
}

#[test]
fn test_bridging_removal_reconnects_chain() -> Result<()> {
    let mut graph = graph_with(&["a", "b", "c"])?;
    let (a, b, c) = (BlockId::from("a"), BlockId::from("b"), BlockId::from("c"));
    graph.connect(&a, &b)?;
    graph.connect(&b, &c)?;

    let removed = graph.remove_block_bridging(&b).expect("b is in the graph");
    assert_eq!(removed.connections.len(), 2);
    let bridge = removed.bridge.expect("a single parent and child are bridged");

    let connection = graph.connection(&bridge).unwrap();
    assert_eq!(connection.from_block_id, a);
    assert_eq!(connection.to_block_id, c);
    assert_eq!(graph.connection_count(), 1);
    graph.validate()?;
    Ok(())
}

#[test]
fn test_edit_sequence_keeps_graph_valid() -> Result<()> {
    let dto: StoryFlowDto = serde_json::from_value(json!({
        "storyId": "welcome",
        "blocks": [
            { "id": "in", "type": "userInput", "subType": "anything", "width": 200, "height": 60 },
            { "id": "wait", "type": "typingDelay", "y": 140, "width": 200, "height": 60 },
            { "id": "out", "type": "textResponse", "y": 280, "width": 200, "height": 60 }
        ],
        "connections": [
            { "id": "c1", "fromBlockId": "in", "toBlockId": "wait" },
            { "id": "c2", "fromBlockId": "wait", "toBlockId": "out" }
        ]
    }))?;
    let mut graph = FlowGraph::from_dto(dto)?;

    let edits: Vec<FlowEdit> = serde_json::from_value(json!([
        { "op": "removeBlock", "id": "wait", "bridge": true },
        { "op": "connect", "from": "in", "to": "out" },
        { "op": "moveBlock", "id": "out", "x": 0, "y": 500 },
        { "op": "duplicateBlock", "id": "in" },
        { "op": "layoutBelow", "id": "in" }
    ]))?;
    let results = graph.apply_edits(edits);

    assert!(results[0].is_ok());
    // the bridge already links in -> out
    assert!(matches!(
        results[1],
        Err(FlowError::ConnectionAlreadyExists { .. })
    ));
    assert!(results[2..].iter().all(|r| r.is_ok()));

    graph.validate()?;
    assert_eq!(graph.block_count(), 3);
    assert_eq!(graph.connection_count(), 1);
    // laid out directly below "in": bottom 60 plus the 80 gap
    assert_eq!(
        graph.block(&BlockId::from("out")).unwrap().position,
        Point::new(0.0, 140.0)
    );

    let saved = graph.to_dto(Some("welcome".into()));
    let reloaded = FlowGraph::from_dto(saved)?;
    assert_eq!(reloaded.block_count(), 3);
    assert_eq!(reloaded.connection_count(), 1);
    Ok(())
}
