//! # Element Tree
//!
//! The document root: an ordered, dense list of top-level nodes. The root is
//! treated as a free container unless it is laid out in several columns, in
//! which case top-level nodes take one column's width.

use crate::node::{Node, NodeId};
use crate::width::Width;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub elements: Vec<Node>,
    #[serde(default = "default_root_columns")]
    pub root_columns: usize,
}

fn default_root_columns() -> usize {
    1
}

impl Tree {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            root_columns: default_root_columns(),
        }
    }

    pub fn from_elements(elements: Vec<Node>) -> Self {
        Self {
            elements,
            ..Self::new()
        }
    }

    pub fn with_root_columns(mut self, columns: usize) -> Self {
        self.root_columns = columns.max(1);
        self
    }

    /// Width of a node attached at the document root
    pub fn root_width(&self) -> Width {
        Width::for_columns(self.root_columns)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.elements.iter().map(Node::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Visit every node in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for node in &self.elements {
            node.walk(visit);
        }
    }

    /// Every id in document order
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id.clone()));
        ids
    }

    /// First id that appears more than once, in document order
    pub fn duplicate_id(&self) -> Option<NodeId> {
        let mut seen = HashSet::new();
        self.ids().into_iter().find(|id| !seen.insert(id.clone()))
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
