//! # Node Patches
//!
//! Shallow field merge for `updateNode`. Every field is optional; absent
//! fields are left as they are. Structural fields (ids, children) are not
//! patchable, with one exception: a new `mirror` on a menu rebuilds its
//! children as fresh buttons.

use crate::mutations::RejectReason;
use formwork_model::{Content, IdGenerator, MenuLink, Node, NodeId, Width};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    pub label: Option<String>,
    pub width: Option<Width>,
    /// Replacement leaf payload; must be the same kind as the node
    pub content: Option<Content>,
    pub column_count: Option<usize>,
    pub row_count: Option<usize>,
    pub mirror: Option<Vec<MenuLink>>,
}

/// Ids that entered and left the tree while merging a patch
#[derive(Debug, Default)]
pub(crate) struct PatchEffects {
    pub created: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn mirror(links: Vec<MenuLink>) -> Self {
        Self {
            mirror: Some(links),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check the patch fits `node` without touching it
    pub fn validate(&self, node: &Node) -> Result<(), RejectReason> {
        if let Some(content) = &self.content {
            if content.kind() != node.kind() {
                return Err(RejectReason::KindMismatch {
                    expected: node.kind(),
                    found: content.kind(),
                });
            }
            if content.container_kind().is_some() {
                return Err(RejectReason::StructuralField("content"));
            }
        }

        if self.column_count.is_some() && !matches!(node.content, Content::Columns(_)) {
            return Err(RejectReason::StructuralField("columnCount"));
        }
        if self.row_count.is_some() && !matches!(node.content, Content::Rows(_)) {
            return Err(RejectReason::StructuralField("rowCount"));
        }
        if self.mirror.is_some() && !matches!(node.content, Content::Menu(_)) {
            return Err(RejectReason::StructuralField("mirror"));
        }

        Ok(())
    }

    /// Merge into `node`. Call [`NodePatch::validate`] first.
    pub(crate) fn merge(
        &self,
        node: &mut Node,
        ids: &mut IdGenerator,
    ) -> Result<PatchEffects, RejectReason> {
        let mut effects = PatchEffects::default();

        if let Some(label) = &self.label {
            node.label = label.clone();
        }
        if let Some(width) = self.width {
            node.width = width;
        }
        if let Some(content) = &self.content {
            node.content = content.clone();
        }

        match &mut node.content {
            Content::Columns(columns) => {
                if let Some(count) = self.column_count {
                    let dropped = columns.set_column_count(count)?;
                    effects.removed.extend(dropped.iter().flat_map(Node::ids));
                    // Surviving columns re-flow to the new column width
                    let width = Width::for_columns(count);
                    for child in columns.slots.nodes_mut() {
                        child.width = width;
                    }
                }
            }
            Content::Rows(rows) => {
                if let Some(count) = self.row_count {
                    let dropped = rows.set_row_count(count)?;
                    effects.removed.extend(dropped.iter().flat_map(Node::ids));
                }
            }
            Content::Menu(menu) => {
                if let Some(links) = &self.mirror {
                    let buttons = formwork_model::buttons_from_links(links, ids);
                    let previous = std::mem::replace(&mut menu.children, buttons);
                    effects.removed.extend(previous.iter().flat_map(Node::ids));
                    effects
                        .created
                        .extend(menu.children.iter().map(|b| b.id.clone()));
                    menu.sync_mirror();
                }
            }
            _ => {}
        }

        Ok(effects)
    }
}
