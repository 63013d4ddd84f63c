//! # Traversal & Lookup
//!
//! Recursive primitives shared by every mutation: find, locate the parent,
//! detach, descendant checks, and re-attachment with width assignment.
//!
//! The document root behaves as a free container (`parent: None`).
//! Attach helpers work on a private working copy of the tree; when they fail
//! the caller drops the copy, so a half-finished attach is never observed.

use crate::mutations::RejectReason;
use formwork_model::{ChildList, ChildListMut, ContainerKind, Content, Node, NodeId, Tree, Width};

/// Where a node sits: its parent (`None` for the root), the parent's
/// container kind, and the index in the parent's children list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub parent: Option<NodeId>,
    pub container: ContainerKind,
    pub index: usize,
}

pub fn find<'a>(tree: &'a Tree, id: &NodeId) -> Option<&'a Node> {
    tree.elements.iter().find_map(|node| find_in(node, id))
}

fn find_in<'a>(node: &'a Node, id: &NodeId) -> Option<&'a Node> {
    if &node.id == id {
        return Some(node);
    }
    node.children().find_map(|child| find_in(child, id))
}

pub fn find_mut<'a>(tree: &'a mut Tree, id: &NodeId) -> Option<&'a mut Node> {
    tree.elements.iter_mut().find_map(|node| find_in_mut(node, id))
}

fn find_in_mut<'a>(node: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if &node.id == id {
        return Some(node);
    }
    node.children_mut().find_map(|child| find_in_mut(child, id))
}

pub fn contains(tree: &Tree, id: &NodeId) -> bool {
    find(tree, id).is_some()
}

/// Locate the parent of `id`
pub fn find_parent_of(tree: &Tree, id: &NodeId) -> Option<Placement> {
    locate_in(ChildList::Dense(&tree.elements), None, ContainerKind::Free, id)
}

fn locate_in(
    list: ChildList<'_>,
    parent: Option<&NodeId>,
    container: ContainerKind,
    id: &NodeId,
) -> Option<Placement> {
    if let Some(index) = list.position(id) {
        return Some(Placement {
            parent: parent.cloned(),
            container,
            index,
        });
    }

    let children: Box<dyn Iterator<Item = &Node> + '_> = match list {
        ChildList::Dense(children) => Box::new(children.iter()),
        ChildList::Slots(slots) => Box::new(slots.nodes()),
    };

    for child in children {
        if let (Some(child_list), Some(kind)) =
            (child.content.child_list(), child.content.container_kind())
        {
            if let Some(found) = locate_in(child_list, Some(&child.id), kind, id) {
                return Some(found);
            }
        }
    }

    None
}

/// True when `node` lives strictly inside the subtree rooted at `ancestor`
pub fn is_descendant(tree: &Tree, node: &NodeId, ancestor: &NodeId) -> bool {
    find(tree, ancestor)
        .map(|root| root.children().any(|child| find_in(child, node).is_some()))
        .unwrap_or(false)
}

/// Remove `id` wherever it lives: holes in slot containers, splices elsewhere.
///
/// An absent id leaves the tree untouched and returns `None`.
pub fn detach(tree: &mut Tree, id: &NodeId) -> Option<Node> {
    detach_from(ChildListMut::Dense(&mut tree.elements), id)
}

fn detach_from(list: ChildListMut<'_>, id: &NodeId) -> Option<Node> {
    match list {
        ChildListMut::Dense(children) => {
            if let Some(pos) = children.iter().position(|c| &c.id == id) {
                return Some(children.remove(pos));
            }
            children
                .iter_mut()
                .filter_map(|child| child.content.child_list_mut())
                .find_map(|list| detach_from(list, id))
        }
        ChildListMut::Slots(slots) => {
            if let Some(pos) = slots.position(id) {
                return slots.take(pos);
            }
            slots
                .nodes_mut()
                .filter_map(|child| child.content.child_list_mut())
                .find_map(|list| detach_from(list, id))
        }
    }
}

/// Visit every node bottom-up (children before their parent)
pub fn walk_mut(tree: &mut Tree, visit: &mut impl FnMut(&mut Node)) {
    for node in &mut tree.elements {
        walk_node_mut(node, visit);
    }
}

fn walk_node_mut(node: &mut Node, visit: &mut impl FnMut(&mut Node)) {
    for child in node.children_mut() {
        walk_node_mut(child, visit);
    }
    visit(node);
}

/// Width a node gets when attached under `parent`
pub fn attach_width(tree: &Tree, parent: Option<&NodeId>) -> Result<Width, RejectReason> {
    match parent {
        None => Ok(tree.root_width()),
        Some(id) => {
            let node = find(tree, id).ok_or_else(|| RejectReason::ParentNotFound(id.clone()))?;
            if node.is_container() {
                Ok(node.content.child_width())
            } else {
                Err(RejectReason::NotAContainer(id.clone()))
            }
        }
    }
}

/// Container kind of `parent` (the root counts as free)
pub fn container_kind(tree: &Tree, parent: Option<&NodeId>) -> Result<ContainerKind, RejectReason> {
    match parent {
        None => Ok(ContainerKind::Free),
        Some(id) => find(tree, id)
            .ok_or_else(|| RejectReason::ParentNotFound(id.clone()))?
            .content
            .container_kind()
            .ok_or_else(|| RejectReason::NotAContainer(id.clone())),
    }
}

/// Children list of `parent` (the root's element list for `None`)
pub fn child_list_mut<'a>(
    tree: &'a mut Tree,
    parent: Option<&NodeId>,
) -> Result<ChildListMut<'a>, RejectReason> {
    match parent {
        None => Ok(ChildListMut::Dense(&mut tree.elements)),
        Some(id) => find_mut(tree, id)
            .ok_or_else(|| RejectReason::ParentNotFound(id.clone()))?
            .content
            .child_list_mut()
            .ok_or_else(|| RejectReason::NotAContainer(id.clone())),
    }
}

/// Append `node` to `parent`.
///
/// Dense containers push to the end. Columns take the first open slot and
/// reject when full; rows take the first open row or grow by one row.
pub fn append_child(tree: &mut Tree, parent: Option<&NodeId>, mut node: Node) -> Result<usize, RejectReason> {
    node.width = attach_width(tree, parent)?;

    if let Some(id) = parent {
        if let Some(Content::Rows(rows)) = find_mut(tree, id).map(|n| &mut n.content) {
            if rows.slots.first_open().is_none() {
                let grown = rows.row_count() + 1;
                rows.set_row_count(grown)
                    .map_err(|_| RejectReason::SlotsFull(id.clone()))?;
            }
        }
    }

    match child_list_mut(tree, parent)? {
        ChildListMut::Dense(children) => {
            children.push(node);
            Ok(children.len() - 1)
        }
        ChildListMut::Slots(slots) => {
            let index = slots.first_open().ok_or_else(|| {
                RejectReason::SlotsFull(parent.cloned().unwrap_or_else(|| node.id.clone()))
            })?;
            if let Some(slot) = slots.slot_mut(index) {
                *slot = Some(node);
            }
            Ok(index)
        }
    }
}

/// Splice `node` into a dense children list at `index` (clamped to the end)
pub fn insert_child(
    tree: &mut Tree,
    parent: Option<&NodeId>,
    index: usize,
    mut node: Node,
) -> Result<(), RejectReason> {
    node.width = attach_width(tree, parent)?;

    match child_list_mut(tree, parent)? {
        ChildListMut::Dense(children) => {
            let index = index.min(children.len());
            children.insert(index, node);
            Ok(())
        }
        ChildListMut::Slots(_) => Err(RejectReason::SlotSplice(
            parent.cloned().unwrap_or_else(|| node.id.clone()),
        )),
    }
}

/// Put `node` into slot `index` of a slot container, returning the displaced occupant
pub fn place_in_slot(
    tree: &mut Tree,
    container: &NodeId,
    index: usize,
    mut node: Node,
) -> Result<Option<Node>, RejectReason> {
    node.width = attach_width(tree, Some(container))?;

    match child_list_mut(tree, Some(container))? {
        ChildListMut::Slots(slots) => {
            let len = slots.len();
            let slot = slots
                .slot_mut(index)
                .ok_or(RejectReason::SlotOutOfRange { index, len })?;
            Ok(slot.replace(node))
        }
        ChildListMut::Dense(_) => Err(RejectReason::NotASlotContainer(container.clone())),
    }
}
