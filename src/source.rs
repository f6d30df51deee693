use std::io;

use csvstream_core::Chars;
use log::{debug, trace};

use crate::error::{Error, Result};

/// The default size of the chunks read from the underlying stream.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * (1 << 10);

/// The longest UTF-8 encoding of a char. The buffer must hold at least one.
const MIN_BUFFER_CAPACITY: usize = 4;

/// A buffered supply of characters decoded from an `io::Read`.
///
/// Bytes are pulled from the underlying reader in fixed size chunks into a
/// buffer that is allocated once and reused for every chunk. They are decoded
/// as UTF-8 one character at a time. A character whose encoding straddles two
/// chunks is carried over to the next chunk.
///
/// Any error is final. After an I/O error or invalid UTF-8 has been reported,
/// the source behaves as if its input had ended.
#[derive(Debug)]
pub struct CharSource<R> {
    rdr: R,
    buf: Vec<u8>,
    /// The position of the next undecoded byte in `buf`.
    pos: usize,
    /// The number of bytes in `buf` from the most recent fill.
    len: usize,
    /// Set once the reader has reported the end of its data, or has failed.
    eof: bool,
    prev: Option<char>,
    byte: u64,
    line: u64,
}

impl<R: io::Read> CharSource<R> {
    /// Create a new source with a buffer of the default capacity.
    pub fn new(rdr: R) -> CharSource<R> {
        CharSource::with_capacity(DEFAULT_BUFFER_CAPACITY, rdr)
    }

    /// Create a new source whose chunks are at most `capacity` bytes.
    ///
    /// Capacities smaller than four bytes are raised to four, so that any
    /// single character can be decoded.
    pub fn with_capacity(capacity: usize, rdr: R) -> CharSource<R> {
        let capacity = capacity.max(MIN_BUFFER_CAPACITY);
        CharSource {
            rdr,
            buf: vec![0; capacity],
            pos: 0,
            len: 0,
            eof: false,
            prev: None,
            byte: 0,
            line: 1,
        }
    }

    /// The byte offset of the next character.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`, of the next character. Lines are
    /// counted by occurrences of `\n`.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Return a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.rdr
    }

    /// Return a mutable reference to the underlying reader.
    ///
    /// Reading from it directly skips over data this source has not yet
    /// buffered.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rdr
    }

    /// Unwrap the underlying reader. Buffered data is lost.
    pub fn into_inner(self) -> R {
        self.rdr
    }

    fn fill(&mut self) -> Result<()> {
        let rest = self.len - self.pos;
        self.buf.copy_within(self.pos..self.len, 0);
        self.pos = 0;
        self.len = rest;
        debug_assert!(self.len < self.buf.len());
        loop {
            match self.rdr.read(&mut self.buf[self.len..]) {
                Ok(0) => {
                    debug!("reached end of CSV input at byte {}", self.byte);
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    trace!("read {} bytes of CSV input", n);
                    self.len += n;
                    return Ok(());
                }
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.exhaust();
                    return Err(Error::Io(err));
                }
            }
        }
    }

    fn exhaust(&mut self) {
        self.eof = true;
        self.pos = 0;
        self.len = 0;
    }
}

impl<R: io::Read> Chars for CharSource<R> {
    type Error = Error;

    fn next_char(&mut self) -> Result<Option<char>> {
        loop {
            if self.pos < self.len {
                let pending = self.len - self.pos;
                let (ch, n) = bstr::decode_utf8(&self.buf[self.pos..self.len]);
                if let Some(ch) = ch {
                    self.pos += n;
                    self.byte += n as u64;
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.prev = Some(ch);
                    return Ok(Some(ch));
                }
                let incomplete = !self.eof
                    && n == pending
                    && n < MIN_BUFFER_CAPACITY;
                if !incomplete {
                    let err = Error::Utf8 { byte: self.byte, line: self.line };
                    self.exhaust();
                    return Err(err);
                }
            } else if self.eof {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn peek_previous(&self) -> Option<char> {
        self.prev
    }
}
