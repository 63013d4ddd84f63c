//! # Tree Store
//!
//! Holds the current snapshot, the selection and the id allocator.
//!
//! Every operation reads the latest snapshot and either swaps in a new one
//! or leaves everything as it was. Snapshots are shared as `Arc<Tree>`, so a
//! reader holding an older one never sees later changes.

use crate::errors::EditorError;
use crate::mutations::{Mutation, RejectReason};
use crate::patch::NodePatch;
use crate::post_effects::PostEffectEngine;
use crate::traversal;
use formwork_model::{ElementKind, IdGenerator, Node, NodeId, Tree};
use std::sync::Arc;

/// Result of applying a mutation to the store
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// A new snapshot was installed
    Applied {
        version: u64,
        created: Vec<NodeId>,
        removed: Vec<NodeId>,
    },

    /// Snapshot and selection are unchanged
    Rejected(RejectReason),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            MutationOutcome::Rejected(reason) => Some(reason),
            MutationOutcome::Applied { .. } => None,
        }
    }

    /// Id of the first node this mutation created
    pub fn created_id(&self) -> Option<&NodeId> {
        match self {
            MutationOutcome::Applied { created, .. } => created.first(),
            MutationOutcome::Rejected(_) => None,
        }
    }
}

/// Snapshot store for one document
#[derive(Debug)]
pub struct TreeStore {
    snapshot: Arc<Tree>,
    selected: Option<NodeId>,
    version: u64,
    ids: IdGenerator,
    effects: PostEffectEngine,
}

impl TreeStore {
    /// Empty store whose ids are seeded from `project_id`
    pub fn new(project_id: &str) -> Self {
        Self {
            snapshot: Arc::new(Tree::new()),
            selected: None,
            version: 0,
            ids: IdGenerator::new(project_id),
            effects: PostEffectEngine::new(),
        }
    }

    /// Store pre-loaded with `tree`
    pub fn with_tree(project_id: &str, tree: Tree) -> Result<Self, EditorError> {
        let mut store = Self::new(project_id);
        store.replace_tree(tree)?;
        store.version = 0;
        Ok(store)
    }

    pub fn tree(&self) -> &Tree {
        &self.snapshot
    }

    /// Shared handle to the current snapshot
    pub fn snapshot(&self) -> Arc<Tree> {
        Arc::clone(&self.snapshot)
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected
            .as_ref()
            .and_then(|id| traversal::find(&self.snapshot, id))
    }

    /// Incremented once per applied mutation or bulk load
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        traversal::find(&self.snapshot, id)
    }

    /// Apply a mutation against the latest snapshot
    pub fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        // Allocate from a scratch copy so a rejection does not burn ids
        let mut ids = self.ids.clone();

        match self
            .effects
            .apply_with_effects(&mutation, &self.snapshot, &mut ids)
        {
            Ok(applied) => {
                self.ids = ids;
                self.snapshot = Arc::new(applied.tree);
                self.version += 1;

                if mutation.selects_created() {
                    if let Some(id) = applied.created.first() {
                        self.selected = Some(id.clone());
                    }
                }
                self.drop_stale_selection();

                tracing::debug!(
                    "Applied {} (v{}): {} created, {} removed",
                    mutation.name(),
                    self.version,
                    applied.created.len(),
                    applied.removed.len()
                );

                MutationOutcome::Applied {
                    version: self.version,
                    created: applied.created,
                    removed: applied.removed,
                }
            }
            Err(reason) => {
                tracing::debug!("Rejected {}: {}", mutation.name(), reason);
                MutationOutcome::Rejected(reason)
            }
        }
    }

    /// Apply a batch in order; a rejection does not stop later mutations
    pub fn apply_all(&mut self, mutations: impl IntoIterator<Item = Mutation>) -> Vec<MutationOutcome> {
        mutations.into_iter().map(|m| self.apply(m)).collect()
    }

    /// Parse a JSON array of mutations and apply it
    pub fn apply_json(&mut self, json: &str) -> Result<Vec<MutationOutcome>, EditorError> {
        let batch = crate::mutations::parse_batch(json)?;
        Ok(self.apply_all(batch))
    }

    /// Select a node, or clear the selection with `None`
    pub fn select_node(&mut self, id: Option<&NodeId>) -> Result<(), RejectReason> {
        match id {
            None => {
                self.selected = None;
                Ok(())
            }
            Some(id) if traversal::contains(&self.snapshot, id) => {
                self.selected = Some(id.clone());
                Ok(())
            }
            Some(id) => Err(RejectReason::NodeNotFound(id.clone())),
        }
    }

    /// Install a whole new tree (load, import)
    pub fn replace_tree(&mut self, mut tree: Tree) -> Result<(), EditorError> {
        if let Some(id) = tree.duplicate_id() {
            tracing::warn!("Refusing tree with duplicate id {}", id);
            return Err(RejectReason::DuplicateId(id).into());
        }

        self.effects.run(&mut tree);
        for id in tree.ids() {
            self.ids.observe(&id);
        }

        self.snapshot = Arc::new(tree);
        self.version += 1;
        self.drop_stale_selection();
        Ok(())
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selected {
            if !traversal::contains(&self.snapshot, id) {
                self.selected = None;
            }
        }
    }

    pub fn add_node(&mut self, kind: ElementKind, parent_id: Option<&NodeId>) -> MutationOutcome {
        self.apply(Mutation::AddNode {
            kind,
            parent_id: parent_id.cloned(),
        })
    }

    pub fn add_node_at_start(&mut self, kind: ElementKind) -> MutationOutcome {
        self.apply(Mutation::AddNodeAtStart { kind })
    }

    pub fn add_node_to_slot(
        &mut self,
        kind: ElementKind,
        container_id: &NodeId,
        slot_index: usize,
    ) -> MutationOutcome {
        self.apply(Mutation::AddNodeToSlot {
            kind,
            container_id: container_id.clone(),
            slot_index,
        })
    }

    pub fn remove_node(&mut self, node_id: &NodeId) -> MutationOutcome {
        self.apply(Mutation::RemoveNode {
            node_id: node_id.clone(),
        })
    }

    pub fn duplicate_node(&mut self, node_id: &NodeId) -> MutationOutcome {
        self.apply(Mutation::DuplicateNode {
            node_id: node_id.clone(),
        })
    }

    pub fn update_node(&mut self, node_id: &NodeId, patch: NodePatch) -> MutationOutcome {
        self.apply(Mutation::UpdateNode {
            node_id: node_id.clone(),
            patch,
        })
    }

    pub fn move_node_to_container(&mut self, node_id: &NodeId, container_id: &NodeId) -> MutationOutcome {
        self.apply(Mutation::MoveNodeToContainer {
            node_id: node_id.clone(),
            container_id: container_id.clone(),
        })
    }

    pub fn move_node_to_slot(
        &mut self,
        node_id: &NodeId,
        container_id: &NodeId,
        slot_index: usize,
    ) -> MutationOutcome {
        self.apply(Mutation::MoveNodeToSlot {
            node_id: node_id.clone(),
            container_id: container_id.clone(),
            slot_index,
        })
    }

    pub fn insert_before(
        &mut self,
        node_id: &NodeId,
        target_id: &NodeId,
        target_parent_id: Option<&NodeId>,
    ) -> MutationOutcome {
        self.apply(Mutation::InsertBefore {
            node_id: node_id.clone(),
            target_id: target_id.clone(),
            target_parent_id: target_parent_id.cloned(),
        })
    }

    pub fn insert_after(
        &mut self,
        node_id: &NodeId,
        target_id: &NodeId,
        target_parent_id: Option<&NodeId>,
    ) -> MutationOutcome {
        self.apply(Mutation::InsertAfter {
            node_id: node_id.clone(),
            target_id: target_id.clone(),
            target_parent_id: target_parent_id.cloned(),
        })
    }

    pub fn remove_node_from_container(&mut self, node_id: &NodeId, container_id: &NodeId) -> MutationOutcome {
        self.apply(Mutation::RemoveNodeFromContainer {
            node_id: node_id.clone(),
            container_id: container_id.clone(),
        })
    }

    pub fn move_up(&mut self, node_id: &NodeId, parent_id: Option<&NodeId>) -> MutationOutcome {
        self.apply(Mutation::MoveUp {
            node_id: node_id.clone(),
            parent_id: parent_id.cloned(),
        })
    }

    pub fn move_down(&mut self, node_id: &NodeId, parent_id: Option<&NodeId>) -> MutationOutcome {
        self.apply(Mutation::MoveDown {
            node_id: node_id.clone(),
            parent_id: parent_id.cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_model::{Content, Group};

    #[test]
    fn test_store_creation() {
        let store = TreeStore::new("contact-form");
        assert!(store.tree().is_empty());
        assert_eq!(store.version(), 0);
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_add_selects_new_node() {
        let mut store = TreeStore::new("test");
        let outcome = store.add_node(ElementKind::Text, None);

        assert!(outcome.is_applied());
        assert_eq!(store.selected_id(), outcome.created_id());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_rejection_keeps_snapshot_and_version() {
        let mut store = TreeStore::new("test");
        store.add_node(ElementKind::Text, None);
        let before = store.snapshot();

        let outcome = store.remove_node(&NodeId::from("missing"));
        assert_eq!(
            outcome.rejection(),
            Some(&RejectReason::NodeNotFound(NodeId::from("missing")))
        );
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_rejection_does_not_burn_ids() {
        let mut store = TreeStore::new("test");
        let leaf = store.add_node(ElementKind::Text, None);
        let leaf_id = leaf.created_id().unwrap().clone();

        // Leaf parent is rejected
        store.add_node(ElementKind::Columns, Some(&leaf_id));
        let next = store.add_node(ElementKind::Text, None);

        assert!(next.created_id().unwrap().as_str().ends_with("-2"));
    }

    #[test]
    fn test_old_snapshot_is_unaffected() {
        let mut store = TreeStore::new("test");
        store.add_node(ElementKind::Text, None);
        let old = store.snapshot();

        store.add_node(ElementKind::Email, None);
        assert_eq!(old.elements.len(), 1);
        assert_eq!(store.tree().elements.len(), 2);
    }

    #[test]
    fn test_remove_clears_selection_inside_subtree() {
        let mut store = TreeStore::new("test");
        let group = store.add_node(ElementKind::Group, None);
        let group_id = group.created_id().unwrap().clone();
        store.add_node(ElementKind::Text, Some(&group_id));
        assert!(store.selected_id().is_some());

        store.remove_node(&group_id);
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_apply_json_batch() {
        let mut store = TreeStore::new("test");
        let outcomes = store
            .apply_json(r#"[{ "op": "addNode", "kind": "group" }, { "op": "removeNode", "nodeId": "nope" }]"#)
            .unwrap();

        assert!(outcomes[0].is_applied());
        assert!(!outcomes[1].is_applied());
        assert!(store.apply_json("{ not json").is_err());
    }

    #[test]
    fn test_select_absent_id_is_rejected() {
        let mut store = TreeStore::new("test");
        let text = store.add_node(ElementKind::Text, None);
        let text_id = text.created_id().unwrap().clone();

        let result = store.select_node(Some(&NodeId::from("ghost")));
        assert!(result.is_err());
        assert_eq!(store.selected_id(), Some(&text_id));

        store.select_node(None).unwrap();
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_replace_tree_rejects_duplicates() {
        let mut store = TreeStore::new("test");
        let node = Node::new(NodeId::from("a"), "A", Content::Group(Group::default()));
        let tree = Tree::from_elements(vec![node.clone(), node]);

        assert!(store.replace_tree(tree).is_err());
        assert!(store.tree().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_replace_tree_advances_ids() {
        let mut ids = IdGenerator::new("test");
        let loaded = formwork_model::create_node(ElementKind::Group, &mut ids);
        let loaded_id = loaded.id.clone();

        let mut store = TreeStore::with_tree("test", Tree::from_elements(vec![loaded])).unwrap();
        let outcome = store.add_node(ElementKind::Text, None);

        assert_ne!(outcome.created_id(), Some(&loaded_id));
        assert_eq!(store.version(), 1);
    }
}
