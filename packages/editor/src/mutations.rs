//! # Structural Mutations
//!
//! Semantic operations on the element tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` reads a snapshot and returns a new one; the input is never touched
//! 2. **Id-addressed**: targets are named by id, never by a transient index
//! 3. **Total**: a missing target or a structural violation rejects the mutation and
//!    the caller keeps the snapshot it had
//!
//! ## Mutation Semantics
//!
//! ### Remove
//! - Removes the node and all descendants
//! - Slot containers keep a hole at the old position, dense lists close the gap
//!
//! ### Move
//! - Fails if the destination is the node itself or one of its descendants
//! - The moved node takes the width of its new container
//!
//! ### Duplicate
//! - Fresh ids at every level, " (Copy)" on the top label only
//! - The clone lands right after the original in the same parent

use crate::patch::NodePatch;
use crate::traversal::{self, Placement};
use formwork_model::{
    create_node, ChildListMut, Content, ElementKind, IdGenerator, ModelError, Node, NodeId, Tree,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label marker appended to duplicated nodes
pub const COPY_SUFFIX: &str = "(Copy)";

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Create a node and append it to a container (or the root)
    AddNode {
        kind: ElementKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<NodeId>,
    },

    /// Create a node and prepend it at the root
    AddNodeAtStart { kind: ElementKind },

    /// Create a node directly into a slot
    AddNodeToSlot {
        kind: ElementKind,
        container_id: NodeId,
        slot_index: usize,
    },

    /// Remove a node and its subtree from wherever it lives
    RemoveNode { node_id: NodeId },

    /// Clone a subtree next to the original
    DuplicateNode { node_id: NodeId },

    /// Shallow-merge fields into a node
    UpdateNode { node_id: NodeId, patch: NodePatch },

    /// Re-parent a node under a container
    MoveNodeToContainer { node_id: NodeId, container_id: NodeId },

    /// Re-parent a node into a specific slot
    MoveNodeToSlot {
        node_id: NodeId,
        container_id: NodeId,
        slot_index: usize,
    },

    /// Move a node right before a sibling target
    InsertBefore {
        node_id: NodeId,
        target_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_parent_id: Option<NodeId>,
    },

    /// Move a node right after a sibling target
    InsertAfter {
        node_id: NodeId,
        target_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_parent_id: Option<NodeId>,
    },

    /// Remove a direct child of a specific container
    RemoveNodeFromContainer { node_id: NodeId, container_id: NodeId },

    /// Swap with the previous entry in the parent's list
    MoveUp {
        node_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<NodeId>,
    },

    /// Swap with the next entry in the parent's list
    MoveDown {
        node_id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<NodeId>,
    },
}

/// Why a mutation left the tree unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectReason {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node is not a container: {0}")]
    NotAContainer(NodeId),

    #[error("Node is not a slot container: {0}")]
    NotASlotContainer(NodeId),

    #[error("Slot {index} is out of range ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("No open slot in {0}")]
    SlotsFull(NodeId),

    #[error("Cannot splice into slot container {0}")]
    SlotSplice(NodeId),

    #[error("{node} is not a child of {parent}")]
    NotAChild { node: NodeId, parent: String },

    #[error("Node cannot be placed relative to itself")]
    SameNode,

    #[error("Already at the edge of its list")]
    AtBoundary,

    #[error("Expected {expected} payload, found {found}")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },

    #[error("Field cannot be patched on this node: {0}")]
    StructuralField(&'static str),

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Invalid structure: {0}")]
    Model(#[from] ModelError),
}

/// A mutation that went through
#[derive(Debug, Clone)]
pub struct Applied {
    /// The new snapshot
    pub tree: Tree,

    /// Ids that entered the tree (the new top node first)
    pub created: Vec<NodeId>,

    /// Ids that left the tree
    pub removed: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Changes {
    created: Vec<NodeId>,
    removed: Vec<NodeId>,
}

impl Changes {
    fn created(node: &Node) -> Self {
        Self {
            created: node.ids(),
            removed: Vec::new(),
        }
    }

    fn removed(node: &Node) -> Self {
        Self {
            created: Vec::new(),
            removed: node.ids(),
        }
    }
}

impl Mutation {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddNode { .. } => "addNode",
            Mutation::AddNodeAtStart { .. } => "addNodeAtStart",
            Mutation::AddNodeToSlot { .. } => "addNodeToSlot",
            Mutation::RemoveNode { .. } => "removeNode",
            Mutation::DuplicateNode { .. } => "duplicateNode",
            Mutation::UpdateNode { .. } => "updateNode",
            Mutation::MoveNodeToContainer { .. } => "moveNodeToContainer",
            Mutation::MoveNodeToSlot { .. } => "moveNodeToSlot",
            Mutation::InsertBefore { .. } => "insertBefore",
            Mutation::InsertAfter { .. } => "insertAfter",
            Mutation::RemoveNodeFromContainer { .. } => "removeNodeFromContainer",
            Mutation::MoveUp { .. } => "moveUp",
            Mutation::MoveDown { .. } => "moveDown",
        }
    }

    /// Whether the node this mutation creates should become the selection
    pub fn selects_created(&self) -> bool {
        matches!(
            self,
            Mutation::AddNode { .. } | Mutation::AddNodeAtStart { .. } | Mutation::AddNodeToSlot { .. }
        )
    }

    /// Apply to a snapshot, returning the next one.
    ///
    /// Derived fields (menu mirrors) are not refreshed here; see
    /// [`crate::PostEffectEngine::apply_with_effects`].
    pub fn apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Result<Applied, RejectReason> {
        // Validate first
        self.validate(tree)?;

        let mut next = tree.clone();
        let changes = match self {
            Mutation::AddNode { kind, parent_id } => {
                Self::apply_add(&mut next, *kind, parent_id.as_ref(), ids)
            }
            Mutation::AddNodeAtStart { kind } => Self::apply_add_at_start(&mut next, *kind, ids),
            Mutation::AddNodeToSlot {
                kind,
                container_id,
                slot_index,
            } => Self::apply_add_to_slot(&mut next, *kind, container_id, *slot_index, ids),
            Mutation::RemoveNode { node_id } => Self::apply_remove(&mut next, node_id),
            Mutation::DuplicateNode { node_id } => Self::apply_duplicate(&mut next, node_id, ids),
            Mutation::UpdateNode { node_id, patch } => {
                Self::apply_update(&mut next, node_id, patch, ids)
            }
            Mutation::MoveNodeToContainer {
                node_id,
                container_id,
            } => Self::apply_move_to_container(&mut next, node_id, container_id),
            Mutation::MoveNodeToSlot {
                node_id,
                container_id,
                slot_index,
            } => Self::apply_move_to_slot(&mut next, node_id, container_id, *slot_index),
            Mutation::InsertBefore {
                node_id,
                target_id,
                target_parent_id,
            } => Self::apply_insert_relative(&mut next, node_id, target_id, target_parent_id.as_ref(), 0),
            Mutation::InsertAfter {
                node_id,
                target_id,
                target_parent_id,
            } => Self::apply_insert_relative(&mut next, node_id, target_id, target_parent_id.as_ref(), 1),
            Mutation::RemoveNodeFromContainer {
                node_id,
                container_id,
            } => Self::apply_remove_from_container(&mut next, node_id, container_id),
            Mutation::MoveUp { node_id, parent_id } => {
                Self::apply_shift(&mut next, node_id, parent_id.as_ref(), Shift::Up)
            }
            Mutation::MoveDown { node_id, parent_id } => {
                Self::apply_shift(&mut next, node_id, parent_id.as_ref(), Shift::Down)
            }
        }?;

        Ok(Applied {
            tree: next,
            created: changes.created,
            removed: changes.removed,
        })
    }

    /// Validate without applying
    pub fn validate(&self, tree: &Tree) -> Result<(), RejectReason> {
        match self {
            Mutation::AddNode { parent_id, .. } => {
                traversal::container_kind(tree, parent_id.as_ref())?;
                Ok(())
            }

            Mutation::AddNodeAtStart { .. } => Ok(()),

            Mutation::AddNodeToSlot {
                container_id,
                slot_index,
                ..
            } => Self::validate_slot_target(tree, container_id, *slot_index),

            Mutation::RemoveNode { node_id } | Mutation::DuplicateNode { node_id } => {
                Self::require(tree, node_id)
            }

            Mutation::UpdateNode { node_id, patch } => {
                let node = traversal::find(tree, node_id)
                    .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
                patch.validate(node)
            }

            Mutation::MoveNodeToContainer {
                node_id,
                container_id,
            } => {
                Self::require(tree, node_id)?;
                traversal::container_kind(tree, Some(container_id))?;
                Self::validate_no_cycle(tree, node_id, container_id)
            }

            Mutation::MoveNodeToSlot {
                node_id,
                container_id,
                slot_index,
            } => {
                Self::require(tree, node_id)?;
                Self::validate_slot_target(tree, container_id, *slot_index)?;
                Self::validate_no_cycle(tree, node_id, container_id)
            }

            Mutation::InsertBefore {
                node_id, target_id, ..
            }
            | Mutation::InsertAfter {
                node_id, target_id, ..
            } => {
                if node_id == target_id {
                    return Err(RejectReason::SameNode);
                }
                Self::require(tree, node_id)?;
                Self::require(tree, target_id)
            }

            Mutation::RemoveNodeFromContainer {
                node_id,
                container_id,
            } => {
                traversal::container_kind(tree, Some(container_id))?;
                Self::validate_parent(tree, node_id, Some(container_id)).map(|_| ())
            }

            Mutation::MoveUp { node_id, parent_id } | Mutation::MoveDown { node_id, parent_id } => {
                let placement = Self::validate_parent(tree, node_id, parent_id.as_ref())?;
                let len = Self::sibling_count(tree, placement.parent.as_ref())?;
                let shift = match self {
                    Mutation::MoveUp { .. } => Shift::Up,
                    _ => Shift::Down,
                };
                shift.target(placement.index, len).map(|_| ())
            }
        }
    }

    fn require(tree: &Tree, node_id: &NodeId) -> Result<(), RejectReason> {
        if traversal::contains(tree, node_id) {
            Ok(())
        } else {
            Err(RejectReason::NodeNotFound(node_id.clone()))
        }
    }

    fn validate_no_cycle(tree: &Tree, node_id: &NodeId, container_id: &NodeId) -> Result<(), RejectReason> {
        if node_id == container_id || traversal::is_descendant(tree, container_id, node_id) {
            Err(RejectReason::CycleDetected)
        } else {
            Ok(())
        }
    }

    fn validate_slot_target(tree: &Tree, container_id: &NodeId, slot_index: usize) -> Result<(), RejectReason> {
        let kind = traversal::container_kind(tree, Some(container_id))?;
        if !kind.is_slotted() {
            return Err(RejectReason::NotASlotContainer(container_id.clone()));
        }
        let len = Self::sibling_count(tree, Some(container_id))?;
        if slot_index >= len {
            return Err(RejectReason::SlotOutOfRange {
                index: slot_index,
                len,
            });
        }
        Ok(())
    }

    /// Locate `node_id` and check it sits under `parent` when a parent is named
    fn validate_parent(
        tree: &Tree,
        node_id: &NodeId,
        parent: Option<&NodeId>,
    ) -> Result<Placement, RejectReason> {
        let placement = traversal::find_parent_of(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;

        match parent {
            Some(expected) if placement.parent.as_ref() != Some(expected) => {
                Err(RejectReason::NotAChild {
                    node: node_id.clone(),
                    parent: expected.to_string(),
                })
            }
            _ => Ok(placement),
        }
    }

    fn sibling_count(tree: &Tree, parent: Option<&NodeId>) -> Result<usize, RejectReason> {
        match parent {
            None => Ok(tree.elements.len()),
            Some(id) => traversal::find(tree, id)
                .and_then(|node| node.content.child_list())
                .map(|list| list.len())
                .ok_or_else(|| RejectReason::NotAContainer(id.clone())),
        }
    }

    fn apply_add(
        tree: &mut Tree,
        kind: ElementKind,
        parent_id: Option<&NodeId>,
        ids: &mut IdGenerator,
    ) -> Result<Changes, RejectReason> {
        let node = create_node(kind, ids);
        let changes = Changes::created(&node);
        traversal::append_child(tree, parent_id, node)?;
        Ok(changes)
    }

    fn apply_add_at_start(
        tree: &mut Tree,
        kind: ElementKind,
        ids: &mut IdGenerator,
    ) -> Result<Changes, RejectReason> {
        let node = create_node(kind, ids);
        let changes = Changes::created(&node);
        traversal::insert_child(tree, None, 0, node)?;
        Ok(changes)
    }

    fn apply_add_to_slot(
        tree: &mut Tree,
        kind: ElementKind,
        container_id: &NodeId,
        slot_index: usize,
        ids: &mut IdGenerator,
    ) -> Result<Changes, RejectReason> {
        let node = create_node(kind, ids);
        let mut changes = Changes::created(&node);
        if let Some(displaced) = traversal::place_in_slot(tree, container_id, slot_index, node)? {
            Self::log_displaced(&displaced, container_id, slot_index);
            changes.removed = displaced.ids();
        }
        Ok(changes)
    }

    fn apply_remove(tree: &mut Tree, node_id: &NodeId) -> Result<Changes, RejectReason> {
        let removed = traversal::detach(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
        Ok(Changes::removed(&removed))
    }

    fn apply_duplicate(
        tree: &mut Tree,
        node_id: &NodeId,
        ids: &mut IdGenerator,
    ) -> Result<Changes, RejectReason> {
        let placement = traversal::find_parent_of(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
        let original = traversal::find(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;

        let mut clone = original.clone();
        assign_fresh_ids(&mut clone, ids);
        if !clone.label.contains(COPY_SUFFIX) {
            clone.label = format!("{} {}", clone.label, COPY_SUFFIX);
        }
        let changes = Changes::created(&clone);

        let parent = placement.parent.as_ref();
        if placement.container.is_slotted() {
            let container = parent.ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
            let after = placement.index + 1;
            let open = match traversal::find_mut(tree, container).map(|n| &mut n.content) {
                // Rows open a new row right below the original unless one is already empty
                Some(Content::Rows(rows)) => {
                    if !rows.slots.is_hole(after) {
                        rows.insert_row(after)
                            .map_err(|_| RejectReason::SlotsFull(container.clone()))?;
                    }
                    after
                }
                // Columns keep their positions, so the clone takes the next open slot
                Some(Content::Columns(columns)) => (after..columns.slots.len())
                    .find(|&i| columns.slots.is_hole(i))
                    .ok_or_else(|| RejectReason::SlotsFull(container.clone()))?,
                _ => return Err(RejectReason::NotASlotContainer(container.clone())),
            };
            traversal::place_in_slot(tree, container, open, clone)?;
        } else {
            traversal::insert_child(tree, parent, placement.index + 1, clone)?;
        }

        Ok(changes)
    }

    fn apply_update(
        tree: &mut Tree,
        node_id: &NodeId,
        patch: &NodePatch,
        ids: &mut IdGenerator,
    ) -> Result<Changes, RejectReason> {
        let node = traversal::find_mut(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
        let effects = patch.merge(node, ids)?;
        Ok(Changes {
            created: effects.created,
            removed: effects.removed,
        })
    }

    fn apply_move_to_container(
        tree: &mut Tree,
        node_id: &NodeId,
        container_id: &NodeId,
    ) -> Result<Changes, RejectReason> {
        let node = traversal::detach(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;
        traversal::append_child(tree, Some(container_id), node)?;
        Ok(Changes::default())
    }

    fn apply_move_to_slot(
        tree: &mut Tree,
        node_id: &NodeId,
        container_id: &NodeId,
        slot_index: usize,
    ) -> Result<Changes, RejectReason> {
        let node = traversal::detach(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;

        let mut changes = Changes::default();
        if let Some(displaced) = traversal::place_in_slot(tree, container_id, slot_index, node)? {
            Self::log_displaced(&displaced, container_id, slot_index);
            changes.removed = displaced.ids();
        }
        Ok(changes)
    }

    fn apply_insert_relative(
        tree: &mut Tree,
        node_id: &NodeId,
        target_id: &NodeId,
        target_parent_id: Option<&NodeId>,
        offset: usize,
    ) -> Result<Changes, RejectReason> {
        let node = traversal::detach(tree, node_id)
            .ok_or_else(|| RejectReason::NodeNotFound(node_id.clone()))?;

        // The target may have been inside the detached subtree
        let placement = Self::validate_parent(tree, target_id, target_parent_id)?;
        if target_parent_id.is_none() && placement.parent.is_some() {
            return Err(RejectReason::NotAChild {
                node: target_id.clone(),
                parent: "root".to_string(),
            });
        }
        if placement.container.is_slotted() {
            return Err(RejectReason::SlotSplice(
                placement.parent.unwrap_or_else(|| target_id.clone()),
            ));
        }

        traversal::insert_child(tree, placement.parent.as_ref(), placement.index + offset, node)?;
        Ok(Changes::default())
    }

    fn apply_remove_from_container(
        tree: &mut Tree,
        node_id: &NodeId,
        container_id: &NodeId,
    ) -> Result<Changes, RejectReason> {
        let not_a_child = || RejectReason::NotAChild {
            node: node_id.clone(),
            parent: container_id.to_string(),
        };

        let removed = match traversal::child_list_mut(tree, Some(container_id))? {
            ChildListMut::Dense(children) => {
                let index = children
                    .iter()
                    .position(|c| &c.id == node_id)
                    .ok_or_else(not_a_child)?;
                children.remove(index)
            }
            ChildListMut::Slots(slots) => {
                let index = slots.position(node_id).ok_or_else(not_a_child)?;
                slots.take(index).ok_or_else(not_a_child)?
            }
        };

        Ok(Changes::removed(&removed))
    }

    fn apply_shift(
        tree: &mut Tree,
        node_id: &NodeId,
        parent_id: Option<&NodeId>,
        shift: Shift,
    ) -> Result<Changes, RejectReason> {
        let placement = Self::validate_parent(tree, node_id, parent_id)?;

        match traversal::child_list_mut(tree, placement.parent.as_ref())? {
            ChildListMut::Dense(children) => {
                let other = shift.target(placement.index, children.len())?;
                children.swap(placement.index, other);
            }
            ChildListMut::Slots(slots) => {
                let other = shift.target(placement.index, slots.len())?;
                slots.swap(placement.index, other);
            }
        }

        Ok(Changes::default())
    }

    fn log_displaced(displaced: &Node, container_id: &NodeId, slot_index: usize) {
        tracing::warn!(
            "Slot {} of {} was occupied; {} ({} nodes) dropped",
            slot_index,
            container_id,
            displaced.id,
            displaced.size()
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum Shift {
    Up,
    Down,
}

impl Shift {
    /// Index to swap with, or `AtBoundary` at the edge of the list
    fn target(self, index: usize, len: usize) -> Result<usize, RejectReason> {
        match self {
            Shift::Up if index > 0 => Ok(index - 1),
            Shift::Down if index + 1 < len => Ok(index + 1),
            _ => Err(RejectReason::AtBoundary),
        }
    }
}

/// Give `node` and every descendant a fresh id, keeping the structure
pub fn assign_fresh_ids(node: &mut Node, ids: &mut IdGenerator) {
    node.id = ids.new_id();
    for child in node.children_mut() {
        assign_fresh_ids(child, ids);
    }
}

/// Parse a JSON array of mutations
pub fn parse_batch(json: &str) -> Result<Vec<Mutation>, serde_json::Error> {
    serde_json::from_str(json)
}
