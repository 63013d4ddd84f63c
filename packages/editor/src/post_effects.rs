//! # Post-Effect System
//!
//! Mutations can leave derived fields stale. Post-effects run over the
//! new snapshot after every applied mutation and bring them back in line.
//!
//! ## Design
//!
//! Post-effects are:
//! - **Deterministic**: the same tree always produces the same result
//! - **Idempotent**: running an effect twice changes nothing the second time
//! - **Composable**: the engine runs every registered effect in order

use crate::mutations::{Applied, Mutation, RejectReason};
use crate::traversal;
use formwork_model::{Content, IdGenerator, Tree};

/// Post-effect run over a freshly produced snapshot
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Fix up the tree in place, returning how many nodes changed
    fn apply(&self, tree: &mut Tree) -> usize;
}

/// Recompute every menu's link mirror from its button children
#[derive(Debug)]
pub struct SyncMenuMirrors;

impl PostEffect for SyncMenuMirrors {
    fn name(&self) -> &'static str {
        "sync-menu-mirrors"
    }

    fn apply(&self, tree: &mut Tree) -> usize {
        let mut changed = 0;
        traversal::walk_mut(tree, &mut |node| {
            if let Content::Menu(menu) = &mut node.content {
                if menu.sync_mirror() {
                    changed += 1;
                }
            }
        });
        changed
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
        .with_effect(SyncMenuMirrors)
    }

    pub fn with_effect(mut self, effect: impl PostEffect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    /// Run every effect over `tree`
    pub fn run(&self, tree: &mut Tree) -> usize {
        self.effects
            .iter()
            .map(|effect| {
                let changed = effect.apply(tree);
                if changed > 0 {
                    tracing::debug!("Post-effect {} touched {} nodes", effect.name(), changed);
                }
                changed
            })
            .sum()
    }

    /// Apply a mutation and run all post-effects over the result
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        tree: &Tree,
        ids: &mut IdGenerator,
    ) -> Result<Applied, RejectReason> {
        let mut applied = mutation.apply(tree, ids)?;
        self.run(&mut applied.tree);
        Ok(applied)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
