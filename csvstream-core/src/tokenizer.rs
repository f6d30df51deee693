use crate::chars::{Chars, StrChars};
use crate::config::{Config, Terminator};

/// How a field scan stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FieldEnd {
    /// A delimiter was read, so another field follows in the same record.
    Delimiter,
    /// A record terminator or the end of input was read.
    Record,
}

/// A pull based CSV tokenizer.
///
/// The tokenizer reads characters from a `Chars` source one record at a time
/// and splits them into fields. Field values are unquoted, unescaped and
/// trimmed of surrounding whitespace.
///
/// # Leniency
///
/// Like most CSV readers found in the wild, this tokenizer never rejects its
/// input and will always find *a* parse:
///
/// * A quote inside a quoted field that is not followed by another quote, a
///   delimiter or a record terminator is kept as a literal quote.
/// * A quoted field that is never closed runs to the end of the input.
/// * Records may have any number of fields.
///
/// # Comments
///
/// When comments are enabled, a record whose first character is the comment
/// character is skipped through the end of its line. The comment character
/// only has this meaning at the very start of a record. Anywhere else, for
/// example in `one,#N/A`, it is ordinary data.
///
/// # Empty lines
///
/// A line with nothing on it yields a record with no fields. A line holding
/// only whitespace yields a record with one empty field.
#[derive(Clone, Debug)]
pub struct Tokenizer<S> {
    src: S,
    delimiter: char,
    quote: char,
    comment: Option<char>,
    term: Terminator,
    /// The character read before the one most recently read.
    before: Option<char>,
    /// Scratch space for the field being scanned.
    field: String,
}

impl<S: Chars> Tokenizer<S> {
    /// Create a tokenizer that reads from `src`.
    pub fn new(config: &Config, src: S) -> Tokenizer<S> {
        Tokenizer {
            src,
            delimiter: config.delimiter(),
            quote: config.quote(),
            comment: if config.comments() {
                Some(config.comment())
            } else {
                None
            },
            term: config.terminator(),
            before: None,
            field: String::with_capacity(64),
        }
    }

    /// Return a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.src
    }

    /// Return a mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.src
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> S {
        self.src
    }

    /// Read the fields of the next record.
    ///
    /// This returns `Ok(None)` once the source is exhausted. Errors from the
    /// source are returned as is; the record being read when the error
    /// occurred is discarded.
    pub fn next_record(&mut self) -> Result<Option<Vec<String>>, S::Error> {
        let first = loop {
            match self.bump()? {
                None => return Ok(None),
                Some(ch) if Some(ch) == self.comment => self.skip_line()?,
                Some(ch) => break ch,
            }
        };

        let mut fields = Vec::new();
        let mut ch = Some(first);
        loop {
            let end = if ch == Some(self.quote) {
                self.read_quoted()?
            } else {
                let end = self.read_unquoted(ch)?;
                if fields.is_empty()
                    && end == FieldEnd::Record
                    && self.field.is_empty()
                {
                    return Ok(Some(fields));
                }
                end
            };
            fields.push(self.field.trim().to_string());
            match end {
                FieldEnd::Record => return Ok(Some(fields)),
                FieldEnd::Delimiter => ch = self.bump()?,
            }
        }
    }

    fn bump(&mut self) -> Result<Option<char>, S::Error> {
        self.before = self.src.peek_previous();
        self.src.next_char()
    }

    /// Whether `ch`, which was just read, ends a record.
    #[inline]
    fn is_newline(&self, ch: char) -> bool {
        self.term.is_end(ch, self.before)
    }

    fn skip_line(&mut self) -> Result<(), S::Error> {
        while let Some(ch) = self.bump()? {
            if self.is_newline(ch) {
                break;
            }
        }
        Ok(())
    }

    /// Scan an unquoted field whose first character, if any, is `ch`.
    fn read_unquoted(
        &mut self,
        mut ch: Option<char>,
    ) -> Result<FieldEnd, S::Error> {
        self.field.clear();
        loop {
            match ch {
                None => return Ok(FieldEnd::Record),
                Some(c) if c == self.delimiter => {
                    return Ok(FieldEnd::Delimiter);
                }
                Some(c) if self.is_newline(c) => {
                    // The lead of a two character terminator was scanned
                    // as field data before the terminator was recognized.
                    if let Some(lead) = self.term.lead() {
                        if self.field.ends_with(lead) {
                            self.field.pop();
                        }
                    }
                    return Ok(FieldEnd::Record);
                }
                Some(c) => {
                    self.field.push(c);
                    ch = self.bump()?;
                }
            }
        }
    }

    /// Scan a quoted field. The opening quote has already been read.
    fn read_quoted(&mut self) -> Result<FieldEnd, S::Error> {
        self.field.clear();
        let mut ch = self.bump()?;
        loop {
            match ch {
                None => return Ok(FieldEnd::Record),
                Some(c) if c == self.quote => match self.bump()? {
                    None => return Ok(FieldEnd::Record),
                    Some(c) if c == self.delimiter => {
                        return Ok(FieldEnd::Delimiter);
                    }
                    Some(c) if self.is_newline(c) => {
                        return Ok(FieldEnd::Record);
                    }
                    Some(c) if c == self.quote => {
                        self.field.push(c);
                        ch = self.bump()?;
                    }
                    Some(c) if Some(c) == self.term.lead() => {
                        let next = self.bump()?;
                        if next.map_or(false, |n| self.is_newline(n)) {
                            return Ok(FieldEnd::Record);
                        }
                        self.field.push(self.quote);
                        self.field.push(c);
                        ch = next;
                    }
                    Some(c) => {
                        // A stray quote. Keep it and rescan `c`.
                        self.field.push(self.quote);
                        ch = Some(c);
                    }
                },
                Some(c) => {
                    self.field.push(c);
                    ch = self.bump()?;
                }
            }
        }
    }
}

/// Parse the first record in `line`.
///
/// This ignores `has_headers` on the configuration; the first record is
/// returned even when it would otherwise be a header. Empty input, or input
/// holding only comments, yields an empty vector.
pub fn split(config: &Config, line: &str) -> Vec<String> {
    let mut tok = Tokenizer::new(config, StrChars::new(line));
    match tok.next_record() {
        Ok(Some(fields)) => fields,
        Ok(None) => vec![],
        Err(never) => match never {},
    }
}
