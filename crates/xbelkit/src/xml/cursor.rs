//! Byte cursor with line/column tracking for the tokenizer

use crate::error::Pos;

/// Cursor over XML input bytes
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Whether the unread input begins with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if b & 0xC0 != 0x80 {
                // continuation bytes of a UTF-8 sequence share the column
                self.col += 1;
            }
        }
    }

    pub fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.current() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Total input length in bytes
    pub const fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes between `start` and the current position
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_basic() {
        let mut cursor = Cursor::new(b"<xbel>");
        assert_eq!(cursor.current(), Some(b'<'));
        cursor.advance();
        assert_eq!(cursor.current(), Some(b'x'));
        assert_eq!(cursor.input_len(), 6);
    }

    #[test]
    fn test_cursor_starts_with() {
        let mut cursor = Cursor::new(b"<!-- note -->");
        assert!(cursor.starts_with(b"<!--"));
        cursor.advance_by(4);
        assert!(cursor.starts_with(b" note"));
        assert!(!cursor.starts_with(b"-->"));
    }

    #[test]
    fn test_cursor_line_tracking() {
        let mut cursor = Cursor::new(b"  \n\t<a>");
        cursor.skip_whitespace();
        assert_eq!(cursor.current(), Some(b'<'));
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().col, 2);
    }

    #[test]
    fn test_cursor_utf8_columns() {
        let mut cursor = Cursor::new("é<".as_bytes());
        cursor.advance_by(2);
        assert_eq!(cursor.current(), Some(b'<'));
        assert_eq!(cursor.position().col, 2);
    }

    #[test]
    fn test_cursor_slice_and_eof() {
        let mut cursor = Cursor::new(b"title");
        let start = cursor.pos();
        cursor.advance_by(10);
        assert!(cursor.is_eof());
        assert_eq!(cursor.slice_from(start), b"title");
        assert_eq!(cursor.current(), None);
    }
}
