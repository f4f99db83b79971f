//! xbelkit - streaming XBEL bookmark codec and schema component registry
//!
//! # Quick Start
//!
//! ```
//! use xbelkit::{from_xbel_str, to_xbel_string};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = from_xbel_str(
//!     r#"<xbel version="1.0">
//!          <folder folded="no">
//!            <title>Rust</title>
//!            <bookmark href="https://doc.rust-lang.org"><title>Docs</title></bookmark>
//!          </folder>
//!        </xbel>"#,
//! )?;
//! assert_eq!(tree.len(), 2);
//!
//! let xml = to_xbel_string(&tree)?;
//! assert_eq!(from_xbel_str(&xml)?, tree);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::io::{self, Write};

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod config;
pub use config::Config;

pub mod xml;
pub use xml::{Event, EventBuffer, EventSink, EventSource, Tokenizer, XmlWriter};

pub mod bookmark;
pub use bookmark::{BookmarkTree, Node, NodeData, NodeId, NodeKind, Reader, TreeModel, Writer};

pub mod schema;
pub use schema::{QName, SchemaRegistry};

/// Parse an XBEL document from string
pub fn from_xbel_str(s: &str) -> Result<BookmarkTree> {
    from_xbel_bytes(s.as_bytes())
}

/// Parse an XBEL document from bytes
pub fn from_xbel_bytes(bytes: &[u8]) -> Result<BookmarkTree> {
    from_xbel_bytes_with_config(bytes, Config::default())
}

/// Parse with custom limits
pub fn from_xbel_str_with_config(s: &str, config: Config) -> Result<BookmarkTree> {
    from_xbel_bytes_with_config(s.as_bytes(), config)
}

/// Parse bytes with custom limits
pub fn from_xbel_bytes_with_config(bytes: &[u8], config: Config) -> Result<BookmarkTree> {
    let mut tree = BookmarkTree::new();
    let mut tokenizer = Tokenizer::with_config(bytes, config);
    Reader::with_config(&mut tree, config).read(&mut tokenizer)?;
    Ok(tree)
}

/// Serialize a tree as an indented XBEL document
pub fn to_xbel_writer<W: Write>(tree: &BookmarkTree, out: W) -> io::Result<()> {
    let mut sink = XmlWriter::new(out);
    Writer::new(tree).write(&mut sink)
}

/// Serialize a tree to a string
pub fn to_xbel_string(tree: &BookmarkTree) -> io::Result<String> {
    let mut buffer = Vec::new();
    to_xbel_writer(tree, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
