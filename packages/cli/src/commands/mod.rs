pub mod apply;
pub mod export;
pub mod import;
pub mod init;
pub mod new;
pub mod tree;

pub use apply::{apply, ApplyArgs};
pub use export::{export, ExportArgs};
pub use import::{import, ImportArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use tree::{tree, TreeArgs};
