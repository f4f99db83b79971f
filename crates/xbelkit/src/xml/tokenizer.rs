//! Pull tokenizer turning XML bytes into [`Event`]s

use crate::config::Config;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::event::{Attributes, Event, EventSource};

/// XML pull tokenizer
///
/// Skips the prolog (declaration, processing instructions, comments and
/// `DOCTYPE`), reports CDATA as character data and checks that end tags match
/// the element they close.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    config: Config,
    /// Names of the currently open elements, innermost last
    open: Vec<String>,
    /// A self-closing tag was returned; its `EndElement` is owed
    pending_end: bool,
    root_closed: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            open: Vec::new(),
            pending_end: false,
            root_closed: false,
            finished: false,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Current position in the input
    pub const fn position(&self) -> Pos {
        self.cursor.position()
    }

    fn read_event(&mut self) -> Result<Event> {
        if self.config.exceeds_size(self.cursor.input_len()) {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Pos::default(),
            ));
        }

        if self.pending_end {
            self.pending_end = false;
            self.close_innermost();
            return Ok(Event::EndElement);
        }

        loop {
            if self.cursor.is_eof() {
                self.finished = true;
                return Ok(Event::EndOfInput);
            }

            if self.cursor.current() != Some(b'<') {
                let start = self.cursor.position();
                let text = self.parse_text()?;
                if self.open.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(Error::with_message(
                            ErrorKind::InvalidToken,
                            Span::new(start, self.cursor.position()),
                            "text outside the root element",
                        ));
                    }
                    continue;
                }
                return Ok(Event::Characters(text));
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                if self.open.is_empty() {
                    return Err(self.error_here("CDATA outside the root element"));
                }
                self.cursor.advance_by(9);
                let start = self.cursor.pos();
                self.skip_until(b"]]>")?;
                let raw = self.cursor.slice_from(start);
                let raw = raw.get(..raw.len().saturating_sub(3)).unwrap_or_default();
                return Ok(Event::Characters(bytes_to_string(raw)?));
            }

            if self.cursor.starts_with(b"<!") {
                self.skip_doctype()?;
                continue;
            }

            if self.cursor.starts_with(b"</") {
                return self.parse_end_tag();
            }

            return self.parse_start_tag();
        }
    }

    fn parse_start_tag(&mut self) -> Result<Event> {
        if self.root_closed {
            return Err(self.error_here("content after the root element"));
        }
        self.cursor.advance();

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let self_closing = self.cursor.consume(b'/');
        self.expect_byte(b'>')?;

        if self.config.exceeds_depth(self.open.len() + 1) {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.cursor.position(),
            ));
        }

        self.open.push(name.clone());
        self.pending_end = self_closing;
        Ok(Event::StartElement { name, attributes })
    }

    fn parse_end_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;

        match self.open.last() {
            None => Err(Error::with_message(
                ErrorKind::UnexpectedEndOfInput,
                Span::new(start, self.cursor.position()),
                format!("closing tag </{name}> has no matching open element"),
            )),
            Some(expected) if *expected != name => Err(Error::new(
                ErrorKind::MismatchedTag {
                    expected: expected.clone(),
                    found: name,
                },
                Span::new(start, self.cursor.position()),
            )),
            Some(_) => {
                self.close_innermost();
                Ok(Event::EndElement)
            }
        }
    }

    fn close_innermost(&mut self) {
        self.open.pop();
        if self.open.is_empty() {
            self.root_closed = true;
        }
    }

    fn parse_attributes(&mut self) -> Result<Attributes> {
        let mut attrs = Attributes::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input in tag")),
            }

            let start = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::new(
                    ErrorKind::DuplicateAttribute { name },
                    Span::new(start, self.cursor.position()),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                return self.decode(raw);
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }
        let raw = self.cursor.slice_from(start);
        self.decode(raw)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(self.error_here("invalid name")),
            None => return Err(self.error_here("expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start))
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // cursor at "<!"
        self.cursor.advance_by(2);
        let mut in_subset = false;
        let mut quote = None;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => in_subset = true,
                (None, b']') => in_subset = false,
                (None, b'>') if !in_subset => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here("unterminated declaration"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn decode(&self, raw: &[u8]) -> Result<String> {
        let text = bytes_to_string(raw)?;
        decode_entities(&text).ok_or_else(|| self.error_here("invalid xml entity"))
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::at(self.cursor.position()),
            message,
        )
    }
}

impl EventSource for Tokenizer<'_> {
    fn next_event(&mut self) -> Result<Event> {
        self.read_event()
    }

    fn at_end(&self) -> bool {
        self.finished
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::with_message(ErrorKind::InvalidToken, Span::empty(), "invalid utf-8"))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Option<String> {
    if !input.contains('&') {
        return Some(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        result.push_str(rest.get(..amp)?);
        let after = rest.get(amp + 1..)?;
        let semi = after.find(';')?;
        let entity = after.get(..semi)?;
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_numeric_entity(entity)?,
        };
        result.push(decoded);
        rest = after.get(semi + 1..)?;
    }
    result.push_str(rest);
    Some(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
