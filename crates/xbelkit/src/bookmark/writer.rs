//! XBEL writer

use tracing::{debug, instrument};

use crate::bookmark::reader::XBEL_VERSION;
use crate::bookmark::tree::{Field, NodeKind, TreeModel};
use crate::xml::event::EventSink;

enum Step<N> {
    Enter(N),
    Exit,
}

/// Writes any [`TreeModel`] as XBEL events, the inverse of
/// [`Reader`](crate::bookmark::Reader)
#[derive(Debug)]
pub struct Writer<'t, M: TreeModel> {
    tree: &'t M,
}

impl<'t, M: TreeModel> Writer<'t, M> {
    pub const fn new(tree: &'t M) -> Self {
        Self { tree }
    }

    /// Emit the whole document: `<xbel version="1.0">` around every top-level node.
    #[instrument(level = "debug", skip_all)]
    pub fn write<S: EventSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.write_start_document()?;
        sink.write_dtd("<!DOCTYPE xbel>")?;
        sink.write_start_element("xbel")?;
        sink.write_attribute("version", XBEL_VERSION)?;
        let mut written = 0;
        for node in self.tree.child_nodes(None) {
            written += self.write_node(node, sink)?;
        }
        sink.write_end_element()?;
        sink.write_end_document()?;
        debug!(nodes = written, "xbel document written");
        Ok(())
    }

    /// Emit `node` and its subtree in pre-order, returning the number of
    /// nodes written.
    ///
    /// Folders always carry `folded="yes"` or `folded="no"`; their title is
    /// written only when non-empty.
    pub fn write_node<S: EventSink>(
        &self,
        node: M::NodeRef,
        sink: &mut S,
    ) -> Result<usize, S::Error> {
        let mut written = 0;
        let mut pending = vec![Step::Enter(node)];
        while let Some(step) = pending.pop() {
            let node = match step {
                Step::Exit => {
                    sink.write_end_element()?;
                    continue;
                }
                Step::Enter(node) => node,
            };
            written += 1;
            let title = self.tree.field(node, Field::Title);
            match self.tree.node_kind(node) {
                NodeKind::Folder => {
                    let folded = if self.tree.is_expanded(node) { "no" } else { "yes" };
                    sink.write_start_element("folder")?;
                    sink.write_attribute("folded", folded)?;
                    if !title.is_empty() {
                        sink.write_text_element("title", title)?;
                    }
                    pending.push(Step::Exit);
                    pending.extend(self.tree.child_nodes(Some(node)).rev().map(Step::Enter));
                }
                NodeKind::Bookmark => {
                    sink.write_start_element("bookmark")?;
                    sink.write_attribute("href", self.tree.field(node, Field::Url))?;
                    sink.write_text_element("title", title)?;
                    sink.write_end_element()?;
                }
                NodeKind::Separator => {
                    sink.write_start_element("separator")?;
                    sink.write_end_element()?;
                }
            }
        }
        Ok(written)
    }
}
