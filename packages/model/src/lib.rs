//! # Formwork Model
//!
//! Element tree for Formwork documents (forms, emails, pages).
//!
//! A document is an ordered list of [`Node`]s. Each node is either a leaf
//! (inputs, buttons, images, content blocks) or one of four containers:
//!
//! ```text
//! group    free container   dense children, any length
//! columns  slot grid        one entry per column, holes allowed
//! rows     slot stack       one entry per row, holes allowed
//! menu     flex list        dense children + mirrored {label, href} links
//! ```
//!
//! Widths live on a 12-unit grid. Ids come from [`IdGenerator`] and are never
//! reissued.

pub mod defaults;
pub mod error;
pub mod id_generator;
pub mod node;
pub mod slots;
pub mod tree;
pub mod width;

pub use defaults::{buttons_from_links, create_node, default_label, default_menu_links};
pub use error::ModelError;
pub use id_generator::{get_seed, IdGenerator};
pub use node::{
    Button, Checkbox, ChildList, ChildListMut, Choice, Content, ContainerKind, ElementKind, Group,
    Image, Menu, MenuLink, Node, NodeId, NumberInput, RichContent, TextInput,
};
pub use slots::{Columns, Rows, SlotArray, MAX_COLUMNS, MAX_ROWS};
pub use tree::Tree;
pub use width::{Width, GRID_UNITS};
