use std::io;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;

/// Splits the elements of one array field of a top-level JSON object out of a
/// byte stream, e.g. every job of `{"jobs": [...]}`.
///
/// Each element is yielded as raw bytes as soon as its last byte arrives.
/// Only the element in progress is buffered; everything else in the document
/// is scanned and dropped. Elements are not validated beyond bracket and
/// string balance, parsing them is up to the caller.
#[derive(Debug)]
pub struct JsonArrayDecoder {
    field: Vec<u8>,
    state: State,
    lexer: Lexer,
    /// Position in the buffer up to which bytes have been scanned
    scanned: usize,
    /// Start of the element in progress
    start: Option<usize>,
    key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the array field in the top-level object
    Seeking,
    /// Inside the array
    Elements,
    /// After the array, until the top-level object closes
    Trailing,
    Done,
}

#[derive(Debug, Default)]
struct Lexer {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

enum Token {
    /// A byte inside a string literal
    Text(u8),
    /// The quote closing a string literal
    CloseQuote,
    /// A byte outside string literals, opening quotes included
    Byte(u8),
}

/// Tracks which key of the top-level object the next value belongs to.
#[derive(Debug, Default)]
struct Key {
    expect_key: bool,
    capturing: bool,
    buf: Vec<u8>,
    last: Option<Vec<u8>>,
    value_of: Option<Vec<u8>>,
}

impl Lexer {
    fn feed(&mut self, b: u8) -> Token {
        if !self.in_string {
            if b == b'"' {
                self.in_string = true;
            }
            return Token::Byte(b);
        }

        if self.escaped {
            self.escaped = false;
        } else if b == b'\\' {
            self.escaped = true;
        } else if b == b'"' {
            self.in_string = false;
            return Token::CloseQuote;
        }
        Token::Text(b)
    }
}

impl JsonArrayDecoder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into().into_bytes(),
            state: State::Seeking,
            lexer: Lexer::default(),
            scanned: 0,
            start: None,
            key: Key::default(),
        }
    }

    /// The array was read to its closing bracket.
    #[cfg(test)]
    fn is_finished(&self) -> bool {
        matches!(self.state, State::Trailing | State::Done)
    }

    fn seek(&mut self, token: Token) -> io::Result<()> {
        let b = match token {
            Token::Text(b) => {
                if self.key.capturing {
                    self.key.buf.push(b);
                }
                return Ok(());
            }
            Token::CloseQuote => {
                if self.key.capturing {
                    self.key.capturing = false;
                    self.key.last = Some(std::mem::take(&mut self.key.buf));
                }
                return Ok(());
            }
            Token::Byte(b) => b,
        };
        if b.is_ascii_whitespace() {
            return Ok(());
        }

        let depth = self.lexer.depth;
        if depth == 0 {
            if b != b'{' {
                return Err(invalid_data("expected a JSON object"));
            }
            self.lexer.depth = 1;
            self.key.expect_key = true;
            return Ok(());
        }

        match b {
            b'"' if depth == 1 && self.key.expect_key => {
                self.key.expect_key = false;
                self.key.capturing = true;
                self.key.buf.clear();
            }
            b':' if depth == 1 => self.key.value_of = self.key.last.take(),
            b',' if depth == 1 => {
                self.key.expect_key = true;
                self.key.value_of = None;
            }
            b'[' if depth == 1 && self.key.value_of.as_deref() == Some(&self.field[..]) => {
                self.lexer.depth = 2;
                self.state = State::Elements;
            }
            b'{' | b'[' => self.lexer.depth += 1,
            b'}' | b']' => {
                self.lexer.depth -= 1;
                if self.lexer.depth == 0 {
                    return Err(invalid_data(format!(
                        "field `{}` not found",
                        String::from_utf8_lossy(&self.field)
                    )));
                }
            }
            _ => (),
        }
        Ok(())
    }

    /// Returns the end of the element when `b` completes it.
    fn element(&mut self, i: usize, token: Token) -> Option<usize> {
        let b = match token {
            Token::Text(_) | Token::CloseQuote => return None,
            Token::Byte(b) => b,
        };

        if self.start.is_none() {
            match b {
                b',' => (),
                b']' => {
                    self.lexer.depth -= 1;
                    self.state = State::Trailing;
                }
                b if b.is_ascii_whitespace() => (),
                b => {
                    self.start = Some(i);
                    if matches!(b, b'{' | b'[') {
                        self.lexer.depth += 1;
                    }
                }
            }
            return None;
        }

        match b {
            b'{' | b'[' => self.lexer.depth += 1,
            b'}' | b']' if self.lexer.depth > 2 => {
                self.lexer.depth -= 1;
                if self.lexer.depth == 2 {
                    return Some(i + 1);
                }
            }
            // End of a scalar element; the bracket is scanned again to close the array.
            b']' => {
                self.scanned = i;
                return Some(i);
            }
            b',' if self.lexer.depth == 2 => return Some(i),
            b if b.is_ascii_whitespace() && self.lexer.depth == 2 => return Some(i),
            _ => (),
        }
        None
    }

    fn trail(&mut self, token: Token) {
        match token {
            Token::Byte(b'{' | b'[') => self.lexer.depth += 1,
            Token::Byte(b'}' | b']') => {
                self.lexer.depth = self.lexer.depth.saturating_sub(1);
                if self.lexer.depth == 0 {
                    self.state = State::Done;
                }
            }
            _ => (),
        }
    }
}

impl Decoder for JsonArrayDecoder {
    type Item = Bytes;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<Bytes>> {
        while self.scanned < buf.len() {
            let i = self.scanned;
            self.scanned += 1;
            let token = self.lexer.feed(buf[i]);

            match self.state {
                State::Seeking => self.seek(token)?,
                State::Elements => {
                    if let Some(end) = self.element(i, token) {
                        let start = self.start.take().unwrap_or_default();
                        let mut item = buf.split_to(end);
                        item.advance(start);
                        self.scanned -= end;
                        return Ok(Some(item.freeze()));
                    }
                }
                State::Trailing => self.trail(token),
                State::Done => (),
            }
        }

        // Drop what has been scanned and is not part of an element.
        let keep_from = self.start.unwrap_or(self.scanned);
        buf.advance(keep_from);
        self.scanned -= keep_from;
        if let Some(start) = self.start.as_mut() {
            *start = 0;
        }
        Ok(None)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<Bytes>> {
        if let Some(item) = self.decode(buf)? {
            return Ok(Some(item));
        }
        match self.state {
            State::Done => Ok(None),
            State::Seeking if self.lexer.depth == 0 => {
                Err(invalid_data("empty body, expected a JSON object"))
            }
            State::Seeking => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "body ended before field `{}`",
                    String::from_utf8_lossy(&self.field)
                ),
            )),
            State::Elements | State::Trailing => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "body ended inside the JSON document",
            )),
        }
    }
}

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}
