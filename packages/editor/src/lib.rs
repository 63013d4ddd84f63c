//! # Formwork Editor
//!
//! Tree-mutation engine for Formwork documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: element tree, defaults, ids          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: snapshot store + mutations          │
//! │  - Id-addressed structural operations       │
//! │  - Slot holes vs. dense splices             │
//! │  - Menu mirror sync as a post-effect        │
//! │  - Selection kept coherent with the tree    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ project: persistence, export / import       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every applied mutation installs a new tree
//! 2. **Rejections are values**: a mutation that cannot apply returns
//!    [`MutationOutcome::Rejected`] and nothing changes
//! 3. **Ids are stable**: targets are named by id and ids are never reissued
//!
//! ## Usage
//!
//! ```rust
//! use formwork_editor::{TreeStore, MutationOutcome};
//! use formwork_model::ElementKind;
//!
//! let mut store = TreeStore::new("contact-form");
//!
//! let outcome = store.add_node(ElementKind::Columns, None);
//! let grid = outcome.created_id().cloned().unwrap();
//!
//! // Both columns ship pre-filled; a third child has nowhere to go
//! let full = store.add_node(ElementKind::Text, Some(&grid));
//! assert!(!full.is_applied());
//! ```

mod errors;
mod mutations;
mod patch;
mod post_effects;
mod store;
pub mod traversal;

pub use errors::EditorError;
pub use mutations::{assign_fresh_ids, parse_batch, Applied, Mutation, RejectReason, COPY_SUFFIX};
pub use patch::NodePatch;
pub use post_effects::{PostEffect, PostEffectEngine, SyncMenuMirrors};
pub use store::{MutationOutcome, TreeStore};
pub use traversal::Placement;
