#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A record terminator.
///
/// Exactly one terminator is active for a tokenizer or writer. Input is never
/// sniffed for its line endings, so data written with `\r\n` should be read
/// with `Terminator::CRLF`.
///
/// The two byte terminators are recognized when their second character is
/// read immediately after their first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Terminator {
    /// `\n`. This is the default.
    LF,
    /// `\r`.
    CR,
    /// `\r` followed by `\n`.
    CRLF,
    /// `\n` followed by `\r`.
    LFCR,
}

impl Terminator {
    /// The character that completes this terminator.
    pub fn last(&self) -> char {
        match *self {
            Terminator::LF | Terminator::CRLF => '\n',
            Terminator::CR | Terminator::LFCR => '\r',
        }
    }

    /// The character that must precede `last` for two character terminators.
    pub fn lead(&self) -> Option<char> {
        match *self {
            Terminator::LF | Terminator::CR => None,
            Terminator::CRLF => Some('\r'),
            Terminator::LFCR => Some('\n'),
        }
    }

    /// The terminator as it is written after a record.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Terminator::LF => "\n",
            Terminator::CR => "\r",
            Terminator::CRLF => "\r\n",
            Terminator::LFCR => "\n\r",
        }
    }

    /// Returns true if `ch`, read right after `prev`, ends a record.
    #[inline]
    pub fn is_end(&self, ch: char, prev: Option<char>) -> bool {
        match self.lead() {
            None => ch == self.last(),
            Some(lead) => ch == self.last() && prev == Some(lead),
        }
    }
}

impl Default for Terminator {
    fn default() -> Terminator {
        Terminator::LF
    }
}

/// The quoting style to use when formatting fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QuoteStyle {
    /// This puts quotes around every field. Always.
    Always,
    /// This puts quotes around fields only when necessary.
    ///
    /// They are necessary when a field contains a quote or the delimiter.
    ///
    /// This is the default.
    Necessary,
}

impl Default for QuoteStyle {
    fn default() -> QuoteStyle {
        QuoteStyle::Necessary
    }
}

/// Parsing and formatting configuration.
///
/// A `Config` is a small immutable value. It is copied into every tokenizer
/// and formatter built from it.
///
/// The delimiter, quote and comment characters must be distinct from each
/// other and from the terminator characters. This isn't checked. If they
/// collide, parsing still produces *a* result, but which one is unspecified.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    delimiter: char,
    quote: char,
    comment: char,
    comments: bool,
    has_headers: bool,
    terminator: Terminator,
}

impl Config {
    /// A comma delimiter, `"` quotes, `#` comments, comment skipping on and
    /// a header row expected.
    pub const DEFAULT: Config = Config {
        delimiter: ',',
        quote: '"',
        comment: '#',
        comments: true,
        has_headers: true,
        terminator: Terminator::LF,
    };

    /// Like `DEFAULT`, but the first record is data rather than a header.
    pub const DEFAULT_WITHOUT_HEADER: Config =
        Config::DEFAULT.with_headers_flag(false);

    /// The field delimiter. The default is `,`.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The quote character. The default is `"`.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// The comment character. The default is `#`.
    pub fn comment(&self) -> char {
        self.comment
    }

    /// Whether records starting with the comment character are skipped.
    pub fn comments(&self) -> bool {
        self.comments
    }

    /// Whether the first record is a header.
    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    /// The record terminator.
    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    pub const fn with_delimiter(self, delimiter: char) -> Config {
        Config { delimiter, ..self }
    }

    pub const fn with_quote(self, quote: char) -> Config {
        Config { quote, ..self }
    }

    pub const fn with_comment(self, comment: char) -> Config {
        Config { comment, ..self }
    }

    pub const fn with_comments(self, yes: bool) -> Config {
        Config { comments: yes, ..self }
    }

    pub const fn with_headers_flag(self, yes: bool) -> Config {
        Config { has_headers: yes, ..self }
    }

    pub const fn with_terminator(self, terminator: Terminator) -> Config {
        Config { terminator, ..self }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::DEFAULT
    }
}
