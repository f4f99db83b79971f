//! Indenting XML serializer implementing [`EventSink`]

use std::io::{self, Write};

use crate::xml::event::EventSink;

#[derive(Debug)]
struct OpenElement {
    name: String,
    has_child_elements: bool,
    has_text: bool,
}

/// XML serializer over any [`Write`]
///
/// Child elements are placed on their own lines, indented by
/// [`XmlWriter::with_indent`] spaces per level (two by default, zero disables
/// formatting). Elements containing text are kept on one line and empty
/// elements are self-closed.
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    out: W,
    indent: usize,
    open: Vec<OpenElement>,
    /// `<name` written, `>` not yet
    start_tag_open: bool,
    wrote_markup: bool,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 2,
            open: Vec::new(),
            start_tag_open: false,
            wrote_markup: false,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn finish_start_tag(&mut self) -> io::Result<()> {
        if self.start_tag_open {
            self.start_tag_open = false;
            self.out.write_all(b">")?;
        }
        Ok(())
    }

    fn newline(&mut self, level: usize) -> io::Result<()> {
        if self.indent == 0 {
            return Ok(());
        }
        writeln!(self.out)?;
        write!(self.out, "{:width$}", "", width = level * self.indent)
    }
}

impl<W: Write> EventSink for XmlWriter<W> {
    type Error = io::Error;

    fn write_start_document(&mut self) -> io::Result<()> {
        self.out.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        self.wrote_markup = true;
        Ok(())
    }

    fn write_dtd(&mut self, dtd: &str) -> io::Result<()> {
        if self.wrote_markup {
            self.newline(0)?;
        }
        self.out.write_all(dtd.as_bytes())?;
        self.wrote_markup = true;
        Ok(())
    }

    fn write_start_element(&mut self, name: &str) -> io::Result<()> {
        self.finish_start_tag()?;
        let level = self.open.len();
        let inline = match self.open.last_mut() {
            Some(parent) => {
                parent.has_child_elements = true;
                parent.has_text
            }
            None => false,
        };
        if self.wrote_markup && !inline {
            self.newline(level)?;
        }
        write!(self.out, "<{name}")?;
        self.open.push(OpenElement {
            name: name.to_string(),
            has_child_elements: false,
            has_text: false,
        });
        self.start_tag_open = true;
        self.wrote_markup = true;
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        if !self.start_tag_open {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("attribute {name} written outside a start tag"),
            ));
        }
        write!(self.out, " {name}=\"{}\"", escape(value, true))
    }

    fn write_characters(&mut self, text: &str) -> io::Result<()> {
        let Some(element) = self.open.last_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "character data outside the root element",
            ));
        };
        element.has_text = true;
        self.finish_start_tag()?;
        self.out.write_all(escape(text, false).as_bytes())
    }

    fn write_end_element(&mut self) -> io::Result<()> {
        let Some(element) = self.open.pop() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "end element without an open element",
            ));
        };
        if self.start_tag_open {
            self.start_tag_open = false;
            return self.out.write_all(b"/>");
        }
        if element.has_child_elements && !element.has_text {
            self.newline(self.open.len())?;
        }
        write!(self.out, "</{}>", element.name)
    }

    fn write_end_document(&mut self) -> io::Result<()> {
        while !self.open.is_empty() {
            self.write_end_element()?;
        }
        if self.indent > 0 {
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            '\t' if attribute => escaped.push_str("&#9;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
