//! Integration tests for editor crate

use formwork_editor::{parse_batch, Mutation, MutationOutcome, NodePatch, TreeStore};
use formwork_model::{Content, ElementKind, NodeId, Tree};

#[test]
fn test_store_lifecycle() {
    let mut store = TreeStore::new("signup-form");

    // Check initial state
    assert_eq!(store.version(), 0);
    assert!(store.tree().is_empty());

    let name = store.add_node(ElementKind::Text, None);
    let email = store.add_node(ElementKind::Email, None);
    let submit = store.add_node(ElementKind::Button, None);
    assert!(name.is_applied() && email.is_applied() && submit.is_applied());

    let submit_id = submit.created_id().cloned().unwrap();
    store.update_node(&submit_id, NodePatch::label("Sign up"));
    store.move_up(&submit_id, None);

    let labels: Vec<_> = store.tree().elements.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["Text Field", "Sign up", "Email"]);
    assert_eq!(store.version(), 5);
    assert_eq!(store.selected_node().map(|n| n.id.clone()), Some(submit_id));
}

#[test]
fn test_json_batch_workflow() {
    let mut store = TreeStore::new("newsletter");
    let columns = store.add_node(ElementKind::Columns, None);
    let grid = columns.created_id().cloned().unwrap();
    let first_group = store.tree().elements[0].children().next().unwrap().id.clone();

    let json = format!(
        r#"[
            {{ "op": "removeNode", "nodeId": "{group}" }},
            {{ "op": "addNodeToSlot", "kind": "image", "containerId": "{grid}", "slotIndex": 0 }},
            {{ "op": "updateNode", "nodeId": "{grid}", "patch": {{ "label": "Hero" }} }},
            {{ "op": "moveDown", "nodeId": "{grid}" }}
        ]"#,
        group = first_group,
        grid = grid
    );

    let outcomes = store.apply_json(&json).unwrap();
    let applied: Vec<bool> = outcomes.iter().map(MutationOutcome::is_applied).collect();
    assert_eq!(applied, vec![true, true, true, false]);

    let node = store.find(&grid).unwrap();
    assert_eq!(node.label, "Hero");
    match &node.content {
        Content::Columns(columns) => {
            let image = columns.slots.get(0).unwrap();
            assert_eq!(image.kind(), ElementKind::Image);
            assert_eq!(image.width.units(), 6);
        }
        _ => panic!("Expected columns"),
    }
}

#[test]
fn test_mutation_serialization() {
    let mutation = Mutation::InsertAfter {
        node_id: NodeId::from("elem-1"),
        target_id: NodeId::from("elem-2"),
        target_parent_id: Some(NodeId::from("container-2")),
    };

    // Serialize to JSON
    let json = serde_json::to_string(&mutation).unwrap();
    assert!(json.contains(r#""targetParentId":"container-2""#));

    // Deserialize back
    let deserialized: Mutation = serde_json::from_str(&json).unwrap();

    assert_eq!(mutation, deserialized);
}

#[test]
fn test_unknown_op_fails_to_parse() {
    let result = parse_batch(r#"[{ "op": "explode", "nodeId": "x" }]"#);
    assert!(result.is_err());
}

#[test]
fn test_tree_round_trips_through_json() {
    let mut store = TreeStore::new("page");
    store.add_node(ElementKind::Menu, None);
    let rows = store.add_node(ElementKind::Rows, None).created_id().cloned().unwrap();
    store.add_node_to_slot(ElementKind::RichContent, &rows, 1);

    let json = serde_json::to_string_pretty(store.tree()).unwrap();
    let back: Tree = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, store.tree());

    let reloaded = TreeStore::with_tree("page", back).unwrap();
    assert_eq!(reloaded.tree(), store.tree());
    assert_eq!(reloaded.version(), 0);
}
