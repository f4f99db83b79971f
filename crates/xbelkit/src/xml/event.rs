//! Pull-parser events and the source/sink traits built on them

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Element attributes in document order
pub type Attributes = IndexMap<String, String>;

/// Events produced by an [`EventSource`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Opening tag; self-closing elements are followed directly by `EndElement`
    StartElement { name: String, attributes: Attributes },
    /// Closing tag of the innermost open element
    EndElement,
    /// Character data (text or CDATA)
    Characters(String),
    /// No more input; repeated calls keep returning it
    EndOfInput,
}

impl Event {
    /// Start element without attributes
    pub fn start(name: impl Into<String>) -> Self {
        Self::StartElement {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Start element with the given attributes
    pub fn start_with<I, K, V>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::StartElement {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Characters(text.into())
    }
}

/// Pull-based event source consumed by the bookmark reader
pub trait EventSource {
    /// Advance to the next event
    fn next_event(&mut self) -> Result<Event>;

    /// Whether `EndOfInput` has been produced
    fn at_end(&self) -> bool;

    /// Collect the text of the element whose `StartElement` was just returned.
    ///
    /// Consumes events up to and including the matching `EndElement`. Nested
    /// child elements are skipped together with their text.
    fn read_element_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                Event::Characters(chunk) => {
                    if depth == 0 {
                        text.push_str(&chunk);
                    }
                }
                Event::StartElement { .. } => depth += 1,
                Event::EndElement => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                }
                Event::EndOfInput => {
                    return Err(Error::unexpected_end_of_input(
                        "input ended inside element text",
                    ));
                }
            }
        }
    }
}

/// Event sink driven by the bookmark writer
///
/// Errors are the sink's own and reach the caller unchanged.
pub trait EventSink {
    type Error;

    fn write_start_document(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    /// Document type declaration, written verbatim by sinks that produce text
    fn write_dtd(&mut self, _dtd: &str) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    fn write_start_element(&mut self, name: &str) -> std::result::Result<(), Self::Error>;

    /// Attribute of the element most recently started
    fn write_attribute(&mut self, name: &str, value: &str) -> std::result::Result<(), Self::Error>;

    fn write_characters(&mut self, text: &str) -> std::result::Result<(), Self::Error>;

    fn write_end_element(&mut self) -> std::result::Result<(), Self::Error>;

    fn write_text_element(&mut self, name: &str, text: &str) -> std::result::Result<(), Self::Error> {
        self.write_start_element(name)?;
        self.write_characters(text)?;
        self.write_end_element()
    }

    fn write_end_document(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}
