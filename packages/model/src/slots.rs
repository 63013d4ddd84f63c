//! # Slot Containers
//!
//! Columns and rows hold a fixed number of positions. Every position is either
//! a node or an explicit hole, and the number of positions only changes through
//! [`SlotArray::resize`].
//!
//! On the wire a slot container is `{ "columnCount": 2, "children": [node, null] }`
//! (`rowCount` for rows); a declared count that disagrees with the children
//! length is rejected when deserializing.

use crate::error::ModelError;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// Upper bound on columns: one grid unit per column
pub const MAX_COLUMNS: usize = 12;

/// Upper bound on rows in a single stack
pub const MAX_ROWS: usize = 64;

/// Fixed-length list of `Node | Empty`
#[derive(Debug, Clone, PartialEq)]
pub struct SlotArray {
    slots: Vec<Option<Node>>,
}

impl SlotArray {
    /// All-empty array with `count` positions
    pub fn empty(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| None).collect(),
        }
    }

    pub fn from_slots(slots: Vec<Option<Node>>) -> Self {
        Self { slots }
    }

    /// Declared cardinality (always the number of positions)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node at `index`; `None` for a hole or an index past the end
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_hole(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Node>> {
        self.slots.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.slots.iter_mut().flatten()
    }

    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|node| &node.id == id))
    }

    pub fn first_open(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Take the node at `index`, leaving a hole behind
    pub fn take(&mut self, index: usize) -> Option<Node> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Position at `index`; `None` past the declared cardinality
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<Node>> {
        self.slots.get_mut(index)
    }

    /// Swap two positions (holes included). Out-of-range indices are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.slots.len() && b < self.slots.len() {
            self.slots.swap(a, b);
        }
    }

    /// Open a hole at `index` (clamped to the end), shifting later positions down
    pub fn insert_hole(&mut self, index: usize) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, None);
    }

    /// Change the cardinality, padding with holes or truncating.
    ///
    /// Returns the nodes dropped by truncation.
    pub fn resize(&mut self, count: usize) -> Vec<Node> {
        if count >= self.slots.len() {
            self.slots.resize_with(count, || None);
            Vec::new()
        } else {
            self.slots.split_off(count).into_iter().flatten().collect()
        }
    }
}

impl<'a> IntoIterator for &'a SlotArray {
    type Item = &'a Option<Node>;
    type IntoIter = std::slice::Iter<'a, Option<Node>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_count(count: usize, max: usize) -> Result<(), ModelError> {
    if (1..=max).contains(&count) {
        Ok(())
    } else {
        Err(ModelError::InvalidSlotCount { count, max })
    }
}

fn check_length(declared: usize, slots: &[Option<Node>]) -> Result<(), ModelError> {
    if declared == slots.len() {
        Ok(())
    } else {
        Err(ModelError::SlotLengthMismatch {
            declared,
            actual: slots.len(),
        })
    }
}

/// Slot grid: one entry per column, children laid out side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumns", into = "RawColumns")]
pub struct Columns {
    pub slots: SlotArray,
}

impl Columns {
    pub fn new(count: usize) -> Result<Self, ModelError> {
        check_count(count, MAX_COLUMNS)?;
        Ok(Self {
            slots: SlotArray::empty(count),
        })
    }

    pub fn column_count(&self) -> usize {
        self.slots.len()
    }

    /// Change the column count; returns the nodes that fell off the end
    pub fn set_column_count(&mut self, count: usize) -> Result<Vec<Node>, ModelError> {
        check_count(count, MAX_COLUMNS)?;
        Ok(self.slots.resize(count))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumns {
    column_count: usize,
    #[serde(default)]
    children: Vec<Option<Node>>,
}

impl TryFrom<RawColumns> for Columns {
    type Error = ModelError;

    fn try_from(raw: RawColumns) -> Result<Self, Self::Error> {
        check_count(raw.column_count, MAX_COLUMNS)?;
        check_length(raw.column_count, &raw.children)?;
        Ok(Self {
            slots: SlotArray::from_slots(raw.children),
        })
    }
}

impl From<Columns> for RawColumns {
    fn from(columns: Columns) -> Self {
        Self {
            column_count: columns.slots.len(),
            children: columns.slots.slots,
        }
    }
}

/// Slot stack: one entry per row, children stacked vertically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRows", into = "RawRows")]
pub struct Rows {
    pub slots: SlotArray,
}

impl Rows {
    pub fn new(count: usize) -> Result<Self, ModelError> {
        check_count(count, MAX_ROWS)?;
        Ok(Self {
            slots: SlotArray::empty(count),
        })
    }

    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    /// Change the row count; returns the nodes that fell off the end
    pub fn set_row_count(&mut self, count: usize) -> Result<Vec<Node>, ModelError> {
        check_count(count, MAX_ROWS)?;
        Ok(self.slots.resize(count))
    }

    /// Add an empty row at `index`, pushing the rows below it down one
    pub fn insert_row(&mut self, index: usize) -> Result<(), ModelError> {
        check_count(self.slots.len() + 1, MAX_ROWS)?;
        self.slots.insert_hole(index);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRows {
    row_count: usize,
    #[serde(default)]
    children: Vec<Option<Node>>,
}

impl TryFrom<RawRows> for Rows {
    type Error = ModelError;

    fn try_from(raw: RawRows) -> Result<Self, Self::Error> {
        check_count(raw.row_count, MAX_ROWS)?;
        check_length(raw.row_count, &raw.children)?;
        Ok(Self {
            slots: SlotArray::from_slots(raw.children),
        })
    }
}

impl From<Rows> for RawRows {
    fn from(rows: Rows) -> Self {
        Self {
            row_count: rows.slots.len(),
            children: rows.slots.slots,
        }
    }
}
