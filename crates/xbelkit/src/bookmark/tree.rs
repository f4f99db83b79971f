//! Bookmark tree model

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Handle to a node inside a [`BookmarkTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Node kinds understood by the codec
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Folder,
    Bookmark,
    Separator,
}

/// Text fields of a node, read and written through [`TreeModel`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    Url,
}

/// Variant-specific node data
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum NodeData {
    Folder {
        expanded: bool,
        children: Vec<NodeId>,
    },
    Bookmark {
        url: String,
    },
    Separator,
}

/// A node with its common fields
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub title: String,
    /// Owning folder; `None` for top-level nodes
    pub parent: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    fn empty(kind: NodeKind, parent: Option<NodeId>) -> Self {
        let data = match kind {
            NodeKind::Folder => NodeData::Folder {
                expanded: false,
                children: Vec::new(),
            },
            NodeKind::Bookmark => NodeData::Bookmark { url: String::new() },
            NodeKind::Separator => NodeData::Separator,
        };
        Self {
            title: String::new(),
            parent,
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Folder { .. } => NodeKind::Folder,
            NodeData::Bookmark { .. } => NodeKind::Bookmark,
            NodeData::Separator => NodeKind::Separator,
        }
    }

    /// Children in insertion order; empty for non-folders
    pub fn children(&self) -> &[NodeId] {
        match &self.data {
            NodeData::Folder { children, .. } => children,
            _ => &[],
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.data {
            NodeData::Bookmark { url } => Some(url),
            _ => None,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.data, NodeData::Folder { expanded: true, .. })
    }
}

/// Tree-model interface shared by the reader and the writer
///
/// The reader builds a model through `add_child`, `set_field` and
/// `set_expanded`; the writer walks it through the accessors.
pub trait TreeModel {
    type NodeRef: Copy;

    /// Append a child of `kind` under `parent` (`None` = top level)
    fn add_child(&mut self, parent: Option<Self::NodeRef>, kind: NodeKind) -> Self::NodeRef;

    fn set_field(&mut self, node: Self::NodeRef, field: Field, value: &str);

    fn set_expanded(&mut self, node: Self::NodeRef, expanded: bool);

    /// Children of `parent` (`None` = top level) in insertion order
    fn child_nodes(
        &self,
        parent: Option<Self::NodeRef>,
    ) -> impl DoubleEndedIterator<Item = Self::NodeRef> + '_;

    fn node_kind(&self, node: Self::NodeRef) -> NodeKind;

    /// Field text; empty when the node has no such field
    fn field(&self, node: Self::NodeRef, field: Field) -> &str;

    /// Whether a folder is expanded; `false` for other kinds
    fn is_expanded(&self, node: Self::NodeRef) -> bool;
}

/// Arena-backed bookmark tree
///
/// Nodes own no pointers: children and parents are [`NodeId`] indices into
/// the arena. Equality is structural and ignores node identity.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookmarkTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl BookmarkTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn add_folder(
        &mut self,
        parent: Option<NodeId>,
        title: impl Into<String>,
        expanded: bool,
    ) -> NodeId {
        let id = self.add_child(parent, NodeKind::Folder);
        self.set_title(id, title);
        self.set_expanded(id, expanded);
        id
    }

    pub fn add_bookmark(
        &mut self,
        parent: Option<NodeId>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> NodeId {
        let id = self.add_child(parent, NodeKind::Bookmark);
        self.set_title(id, title);
        if let Some(Node {
            data: NodeData::Bookmark { url: slot },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *slot = url.into();
        }
        id
    }

    pub fn add_separator(&mut self, parent: Option<NodeId>) -> NodeId {
        self.add_child(parent, NodeKind::Separator)
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.title = title.into();
        }
    }

    /// Depth-first pre-order walk yielding `(depth, id, node)`
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: self.roots.iter().rev().map(|&id| (0, id)).collect(),
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        let mut pending = vec![(self.roots.as_slice(), other.roots.as_slice())];
        while let Some((left, right)) = pending.pop() {
            if left.len() != right.len() {
                return false;
            }
            for (&a, &b) in left.iter().zip(right) {
                let (Some(a), Some(b)) = (self.node(a), other.node(b)) else {
                    return false;
                };
                let same_fields = a.title == b.title
                    && match (&a.data, &b.data) {
                        (
                            NodeData::Folder { expanded: x, .. },
                            NodeData::Folder { expanded: y, .. },
                        ) => x == y,
                        (NodeData::Bookmark { url: x }, NodeData::Bookmark { url: y }) => x == y,
                        (NodeData::Separator, NodeData::Separator) => true,
                        _ => false,
                    };
                if !same_fields {
                    return false;
                }
                pending.push((a.children(), b.children()));
            }
        }
        true
    }
}

impl PartialEq for BookmarkTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_structure(other)
    }
}

impl Eq for BookmarkTree {}

impl TreeModel for BookmarkTree {
    type NodeRef = NodeId;

    fn add_child(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = match parent {
            Some(p) => match self.nodes.get_mut(p.0) {
                Some(Node {
                    data: NodeData::Folder { children, .. },
                    ..
                }) => {
                    children.push(id);
                    Some(p)
                }
                _ => {
                    warn!(parent = p.0, "parent is not a folder, attaching at top level");
                    self.roots.push(id);
                    None
                }
            },
            None => {
                self.roots.push(id);
                None
            }
        };
        self.nodes.push(Node::empty(kind, parent));
        id
    }

    fn set_field(&mut self, id: NodeId, field: Field, value: &str) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        match (field, &mut node.data) {
            (Field::Title, _) => node.title = value.to_string(),
            (Field::Url, NodeData::Bookmark { url }) => *url = value.to_string(),
            (Field::Url, _) => {}
        }
    }

    fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(Node {
            data: NodeData::Folder { expanded: slot, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *slot = expanded;
        }
    }

    fn child_nodes(
        &self,
        parent: Option<NodeId>,
    ) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        let ids = match parent {
            Some(id) => self.children(id),
            None => self.roots(),
        };
        ids.iter().copied()
    }

    fn node_kind(&self, id: NodeId) -> NodeKind {
        self.node(id).map_or(NodeKind::Separator, Node::kind)
    }

    fn field(&self, id: NodeId, field: Field) -> &str {
        match (field, self.node(id)) {
            (Field::Title, Some(node)) => &node.title,
            (Field::Url, Some(node)) => node.url().unwrap_or_default(),
            (_, None) => "",
        }
    }

    fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_expanded)
    }
}

/// Iterator returned by [`BookmarkTree::iter`]
#[derive(Debug)]
pub struct Iter<'a> {
    tree: &'a BookmarkTree,
    stack: Vec<(usize, NodeId)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let (depth, id) = self.stack.pop()?;
            let Some(node) = tree.node(id) else {
                continue;
            };
            self.stack
                .extend(node.children().iter().rev().map(|&child| (depth + 1, child)));
            return Some((depth, id, node));
        }
    }
}
