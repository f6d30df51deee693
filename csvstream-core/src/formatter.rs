use memchr::memchr2;

use crate::config::{Config, QuoteStyle};

/// Formats records as single CSV lines.
///
/// With the default `QuoteStyle::Necessary`, a field is wrapped in quotes
/// when it contains the delimiter or the quote character, and every quote
/// inside it is doubled. All other fields are written as is.
///
/// The formatter never writes a record terminator. Callers append one, or use
/// a `Writer` from the `csvstream` crate which does it for them.
///
/// A formatter keeps one scratch buffer that is reused by every call.
#[derive(Clone, Debug)]
pub struct Formatter {
    delimiter: char,
    quote: char,
    style: QuoteStyle,
    buf: String,
}

impl Default for Formatter {
    fn default() -> Formatter {
        Formatter::new(&Config::DEFAULT)
    }
}

impl Formatter {
    /// Create a formatter using the delimiter and quote of `config`.
    pub fn new(config: &Config) -> Formatter {
        Formatter::with_style(config, QuoteStyle::default())
    }

    /// Create a formatter with an explicit quoting style.
    pub fn with_style(config: &Config, style: QuoteStyle) -> Formatter {
        Formatter {
            delimiter: config.delimiter(),
            quote: config.quote(),
            style,
            buf: String::with_capacity(256),
        }
    }

    /// Format `fields` as one line and return it.
    pub fn format<I, T>(&mut self, fields: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.format_record(fields).to_string()
    }

    /// Format `fields` as one line into the scratch buffer and borrow it.
    ///
    /// The returned line is overwritten by the next call.
    pub fn format_record<I, T>(&mut self, fields: I) -> &str
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.buf.clear();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(self.delimiter);
            }
            self.push_field(field.as_ref());
        }
        &self.buf
    }

    fn push_field(&mut self, field: &str) {
        let mut quoted = self.style == QuoteStyle::Always;
        if !quoted && !self.may_need_quotes(field) {
            self.buf.push_str(field);
            return;
        }

        let start = self.buf.len();
        for ch in field.chars() {
            if ch == self.delimiter {
                quoted = true;
            } else if ch == self.quote {
                quoted = true;
                self.buf.push(ch);
            }
            self.buf.push(ch);
        }
        if quoted {
            self.buf.insert(start, self.quote);
            self.buf.push(self.quote);
        }
    }

    /// A quick check that rules out most fields without a char by char scan.
    fn may_need_quotes(&self, field: &str) -> bool {
        if self.delimiter.is_ascii() && self.quote.is_ascii() {
            let (d, q) = (self.delimiter as u8, self.quote as u8);
            memchr2(d, q, field.as_bytes()).is_some()
        } else {
            true
        }
    }
}
