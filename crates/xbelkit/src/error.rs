//! Error types for xbelkit

use std::fmt;
use thiserror::Error;

/// Message reported when the document root is not `<xbel version="1.0">`
pub const UNRECOGNIZED_ROOT_MESSAGE: &str = "The file is not an XBEL version 1.0 file.";

/// Position in the input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Range in the input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span for errors raised away from any byte input (event buffers, models)
    pub const fn empty() -> Self {
        Self::at(Pos::new(0, 0, 0))
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Root element missing, not `xbel`, or not version `1.0`
    UnrecognizedRoot,
    /// Input ended with open elements, or an end tag closed nothing
    UnexpectedEndOfInput,
    InvalidToken,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedRoot => write!(f, "{UNRECOGNIZED_ROOT_MESSAGE}"),
            Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for xbelkit
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at a specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn unrecognized_root() -> Self {
        Self::new(ErrorKind::UnrecognizedRoot, Span::empty())
    }

    pub fn unexpected_end_of_input(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::UnexpectedEndOfInput, Span::empty(), message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for xbelkit
pub type Result<T> = std::result::Result<T, Error>;
