use core::convert::Infallible;
use core::str;

/// A pull based supply of characters.
///
/// This is the only thing a `Tokenizer` needs from its input. Implementations
/// must remember the last character they returned so that two character
/// record terminators can be recognized without reading ahead.
pub trait Chars {
    /// The error produced when the underlying input fails.
    type Error;

    /// Return the next character, or `None` once the input is exhausted.
    ///
    /// After `None` (or an error) is returned, every later call returns
    /// `Ok(None)`.
    fn next_char(&mut self) -> Result<Option<char>, Self::Error>;

    /// Return the character most recently returned by `next_char`.
    ///
    /// This is `None` until a character has been produced.
    fn peek_previous(&self) -> Option<char>;
}

impl<'a, C: Chars + ?Sized> Chars for &'a mut C {
    type Error = C::Error;

    fn next_char(&mut self) -> Result<Option<char>, C::Error> {
        (**self).next_char()
    }

    fn peek_previous(&self) -> Option<char> {
        (**self).peek_previous()
    }
}

/// Characters from an in memory string. Never fails.
#[derive(Clone, Debug)]
pub struct StrChars<'a> {
    it: str::Chars<'a>,
    prev: Option<char>,
}

impl<'a> StrChars<'a> {
    pub fn new(s: &'a str) -> StrChars<'a> {
        StrChars { it: s.chars(), prev: None }
    }

    /// The part of the string not yet returned.
    pub fn as_str(&self) -> &'a str {
        self.it.as_str()
    }
}

impl<'a> Chars for StrChars<'a> {
    type Error = Infallible;

    #[inline]
    fn next_char(&mut self) -> Result<Option<char>, Infallible> {
        let ch = self.it.next();
        if ch.is_some() {
            self.prev = ch;
        }
        Ok(ch)
    }

    fn peek_previous(&self) -> Option<char> {
        self.prev
    }
}
