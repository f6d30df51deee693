use std::error;
use std::fmt;
use std::io;
use std::result;

/// A type alias for `Result<T, csvstream::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when processing CSV data.
///
/// Malformed quoting and records of differing lengths are never errors. The
/// reader always finds *a* parse for its input. What can fail is the stream
/// underneath it, and both kinds of stream failure are final: once a reader
/// has returned `Io` or `Utf8`, it returns no more records.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading or writing CSV data.
    Io(io::Error),
    /// The input was not valid UTF-8.
    Utf8 {
        /// The byte offset of the first byte of the invalid sequence.
        byte: u64,
        /// The line, starting at `1`, on which the invalid sequence starts.
        line: u64,
    },
    /// Records were requested as maps, but the reader has no header to take
    /// keys from. This happens when header parsing is disabled and no
    /// headers were given to the builder.
    MissingHeaders,
}

impl Error {
    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Utf8 { .. } => None,
            Error::MissingHeaders => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Utf8 { byte, line } => write!(
                f,
                "CSV parse error: invalid UTF-8 at byte {} (line {})",
                byte, line
            ),
            Error::MissingHeaders => write!(
                f,
                "CSV error: cannot build maps from records \
                 without a header row or explicit headers"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::Error;

    #[test]
    fn io_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(err.is_io_error());
        assert_eq!(err.to_string(), "boom");
        assert!(err.source().is_some());
    }

    #[test]
    fn messages() {
        let err = Error::Utf8 { byte: 7, line: 2 };
        assert!(!err.is_io_error());
        assert_eq!(
            err.to_string(),
            "CSV parse error: invalid UTF-8 at byte 7 (line 2)"
        );
        assert!(Error::MissingHeaders.to_string().contains("header"));
    }
}
