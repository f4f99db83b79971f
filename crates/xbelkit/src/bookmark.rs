//! XBEL 1.0 bookmark codec

pub mod reader;
pub mod tree;
pub mod writer;

pub use reader::{Reader, UNKNOWN_TITLE, XBEL_VERSION};
pub use tree::{BookmarkTree, Field, Node, NodeData, NodeId, NodeKind, TreeModel};
pub use writer::Writer;
