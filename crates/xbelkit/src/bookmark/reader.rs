//! Streaming XBEL reader
//!
//! Nesting is tracked on an explicit parent stack rather than the call stack,
//! so document depth is bounded only by [`Config::max_depth`].

use tracing::{debug, instrument, trace, warn};

use crate::bookmark::tree::{Field, NodeKind, TreeModel};
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::event::{Attributes, Event, EventSource};

/// Title given to bookmarks until their `<title>` element is read
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// The only XBEL version accepted
pub const XBEL_VERSION: &str = "1.0";

/// One level of the parent stack
#[derive(Clone, Copy, Debug)]
enum Frame<N> {
    /// Inside `<xbel>` (`None`) or a folder
    Body(Option<N>),
    /// Inside a bookmark, where only `<title>` is meaningful
    Bookmark(N),
}

/// Reads XBEL events into a [`TreeModel`]
///
/// A reader is single-threaded and keeps traversal state between calls to
/// [`Reader::read`]; the last failure stays available through
/// [`Reader::error`].
#[derive(Debug)]
pub struct Reader<'m, M: TreeModel> {
    model: &'m mut M,
    config: Config,
    parents: Vec<Frame<M::NodeRef>>,
    created: usize,
    error: Option<Error>,
}

impl<'m, M: TreeModel> Reader<'m, M> {
    pub fn new(model: &'m mut M) -> Self {
        Self::with_config(model, Config::default())
    }

    pub fn with_config(model: &'m mut M, config: Config) -> Self {
        Self {
            model,
            config,
            parents: Vec::new(),
            created: 0,
            error: None,
        }
    }

    /// Error from the last failed [`Reader::read`]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Number of nodes added to the model by the last read
    pub fn nodes_created(&self) -> usize {
        self.created
    }

    /// Read a whole document, attaching new nodes to the model's top level.
    ///
    /// Fails with `UnrecognizedRoot` unless the root element is
    /// `<xbel version="1.0">`, in which case nothing is added to the model.
    #[instrument(level = "debug", skip_all)]
    pub fn read<S: EventSource>(&mut self, source: &mut S) -> Result<()> {
        self.parents.clear();
        self.created = 0;
        self.error = None;

        let result = self.read_document(source);
        match &result {
            Ok(()) => debug!(nodes = self.created, "xbel document read"),
            Err(err) => self.error = Some(err.clone()),
        }
        result
    }

    fn read_document<S: EventSource>(&mut self, source: &mut S) -> Result<()> {
        loop {
            match source.next_event()? {
                Event::StartElement { name, attributes } => {
                    let version = attributes.get("version").map(String::as_str);
                    if name != "xbel" || version != Some(XBEL_VERSION) {
                        warn!(root = %name, ?version, "rejecting document root");
                        return Err(Error::unrecognized_root());
                    }
                    self.parents.push(Frame::Body(None));
                    self.read_body(source)?;
                    break;
                }
                Event::Characters(_) => {}
                Event::EndElement => {
                    return Err(Error::unexpected_end_of_input(
                        "end element before the document root",
                    ));
                }
                Event::EndOfInput => return Err(Error::unrecognized_root()),
            }
        }

        // anything after the root is drained; stray elements are not modeled
        loop {
            match source.next_event()? {
                Event::EndOfInput => return Ok(()),
                Event::Characters(_) => {}
                Event::StartElement { name, .. } => self.read_unknown_element(source, &name)?,
                Event::EndElement => {
                    return Err(Error::unexpected_end_of_input(
                        "end element after the document root closed",
                    ));
                }
            }
        }
    }

    /// Dispatch child elements of the innermost open frame until the
    /// `<xbel>` element closes.
    fn read_body<S: EventSource>(&mut self, source: &mut S) -> Result<()> {
        while let Some(&frame) = self.parents.last() {
            match source.next_event()? {
                Event::StartElement { name, attributes } => match frame {
                    Frame::Body(parent) => match (name.as_str(), parent) {
                        ("folder", _) => self.read_folder(parent, &attributes)?,
                        ("bookmark", _) => self.read_bookmark(parent, &attributes)?,
                        ("separator", _) => self.read_separator(source, parent)?,
                        ("title", Some(folder)) => {
                            self.read_title(source, folder)?;
                        }
                        _ => self.read_unknown_element(source, &name)?,
                    },
                    Frame::Bookmark(bookmark) => {
                        if name == "title" {
                            self.read_title(source, bookmark)?;
                        } else {
                            self.read_unknown_element(source, &name)?;
                        }
                    }
                },
                Event::EndElement => {
                    self.parents.pop();
                }
                Event::Characters(_) => {}
                Event::EndOfInput => {
                    return Err(Error::unexpected_end_of_input(format!(
                        "input ended with {} open element(s)",
                        self.parents.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Any `folded` value other than the literal `"no"`, or none at all,
    /// leaves the folder collapsed.
    fn read_folder(&mut self, parent: Option<M::NodeRef>, attributes: &Attributes) -> Result<()> {
        self.check_depth(self.parents.len() + 1)?;
        let folder = self.create(parent, NodeKind::Folder);
        let folded = attributes.get("folded").is_none_or(|value| value != "no");
        self.model.set_expanded(folder, !folded);
        self.parents.push(Frame::Body(Some(folder)));
        Ok(())
    }

    /// Depth counts the `<title>` child every written bookmark carries.
    fn read_bookmark(&mut self, parent: Option<M::NodeRef>, attributes: &Attributes) -> Result<()> {
        self.check_depth(self.parents.len() + 2)?;
        let bookmark = self.create(parent, NodeKind::Bookmark);
        self.model.set_field(bookmark, Field::Title, UNKNOWN_TITLE);
        let href = attributes.get("href").map(String::as_str).unwrap_or_default();
        self.model.set_field(bookmark, Field::Url, href);
        self.parents.push(Frame::Bookmark(bookmark));
        Ok(())
    }

    fn read_separator<S: EventSource>(
        &mut self,
        source: &mut S,
        parent: Option<M::NodeRef>,
    ) -> Result<()> {
        self.create(parent, NodeKind::Separator);
        source.read_element_text()?;
        Ok(())
    }

    /// Read the current `<title>` element's text into `node`; the last title wins.
    fn read_title<S: EventSource>(&mut self, source: &mut S, node: M::NodeRef) -> Result<String> {
        self.check_depth(self.parents.len() + 1)?;
        let title = source.read_element_text()?;
        self.model.set_field(node, Field::Title, &title);
        Ok(title)
    }

    /// Skip the element just started, including all of its descendants.
    fn read_unknown_element<S: EventSource>(&mut self, source: &mut S, name: &str) -> Result<()> {
        debug!(element = name, "skipping unknown element");
        let mut depth = 1usize;
        self.check_depth(self.parents.len() + depth)?;
        while depth > 0 {
            match source.next_event()? {
                Event::StartElement { .. } => {
                    depth += 1;
                    self.check_depth(self.parents.len() + depth)?;
                }
                Event::EndElement => depth -= 1,
                Event::Characters(_) => {}
                Event::EndOfInput => {
                    return Err(Error::unexpected_end_of_input(format!(
                        "input ended inside unknown element <{name}>"
                    )));
                }
            }
        }
        Ok(())
    }

    fn create(&mut self, parent: Option<M::NodeRef>, kind: NodeKind) -> M::NodeRef {
        trace!(?kind, "creating node");
        self.created += 1;
        self.model.add_child(parent, kind)
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if self.config.exceeds_depth(depth) {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                Span::empty(),
            ));
        }
        Ok(())
    }
}
