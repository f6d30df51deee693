use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csvstream_core::{Config, Formatter, QuoteStyle, Terminator};
use log::debug;

use crate::error::{Error, Result};

/// Builds a CSV writer with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter, record terminator
/// and more. Once a CSV `Writer` is built, its configuration cannot be
/// changed.
#[derive(Debug)]
pub struct WriterBuilder {
    config: Config,
    style: QuoteStyle,
    capacity: usize,
}

impl Default for WriterBuilder {
    fn default() -> WriterBuilder {
        WriterBuilder {
            config: Config::DEFAULT,
            style: QuoteStyle::default(),
            capacity: 8 * (1 << 10),
        }
    }
}

impl WriterBuilder {
    /// Create a new builder for configuring CSV writing.
    ///
    /// To convert a builder into a writer, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use csvstream::WriterBuilder;
    ///
    /// # fn example() -> csvstream::Result<()> {
    /// let mut wtr = WriterBuilder::new().delimiter(';').from_writer(vec![]);
    /// wtr.write_record(&["a", "b;c"])?;
    ///
    /// let data = String::from_utf8(wtr.into_inner()?).unwrap();
    /// assert_eq!(data, "a;\"b;c\"\n");
    /// # Ok(()) }
    /// # example().unwrap();
    /// ```
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Build a CSV writer from this configuration that writes data to `wtr`.
    ///
    /// Note that the CSV writer is buffered automatically, so you should not
    /// wrap `wtr` in a buffered writer like `io::BufWriter`.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Writer<W> {
        Writer::new(self, wtr)
    }

    /// Build a CSV writer from this configuration that writes data to the
    /// given file path. The file is truncated if it already exists.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Writer<File>> {
        Ok(Writer::new(self, File::create(path)?))
    }

    /// Replace the whole configuration. Only its delimiter, quote and
    /// terminator affect writing.
    pub fn config(&mut self, config: Config) -> &mut WriterBuilder {
        self.config = config;
        self
    }

    /// The field delimiter to use when writing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut WriterBuilder {
        self.config = self.config.with_delimiter(delimiter);
        self
    }

    /// The quote character to use when writing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.config = self.config.with_quote(quote);
        self
    }

    /// The record terminator written after every record.
    ///
    /// The default is `Terminator::LF`.
    pub fn terminator(&mut self, term: Terminator) -> &mut WriterBuilder {
        self.config = self.config.with_terminator(term);
        self
    }

    /// The quoting style to use when writing CSV.
    ///
    /// The default is `QuoteStyle::Necessary`.
    pub fn quote_style(&mut self, style: QuoteStyle) -> &mut WriterBuilder {
        self.style = style;
        self
    }

    /// The capacity of the buffer in front of the underlying writer.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut WriterBuilder {
        self.capacity = capacity;
        self
    }
}

/// A CSV writer.
///
/// Every record is formatted as one line followed by the record terminator.
/// Fields are quoted only when they contain the delimiter or the quote
/// character, unless the writer was built with `QuoteStyle::Always`.
///
/// Data is buffered. It is flushed when the buffer fills, on `flush`, on
/// `into_inner` and when the writer is dropped. Errors are ignored on drop,
/// so call `flush` to observe them.
///
/// # Example
///
/// ```
/// use csvstream::Writer;
///
/// # fn example() -> csvstream::Result<()> {
/// let mut wtr = Writer::from_writer(vec![]);
/// wtr.write_record(&["city", "note"])?;
/// wtr.write_record(&["Boston", "says \"hi\""])?;
///
/// let data = String::from_utf8(wtr.into_inner()?).unwrap();
/// assert_eq!(data, "city,note\nBoston,\"says \"\"hi\"\"\"\n");
/// # Ok(()) }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    wtr: io::BufWriter<W>,
    fmt: Formatter,
    term: Terminator,
    records: u64,
}

impl<W: io::Write> Writer<W> {
    fn new(builder: &WriterBuilder, wtr: W) -> Writer<W> {
        Writer {
            wtr: io::BufWriter::with_capacity(builder.capacity, wtr),
            fmt: Formatter::with_style(&builder.config, builder.style),
            term: builder.config.terminator(),
            records: 0,
        }
    }

    /// Create a new CSV writer with a default configuration that writes to
    /// `wtr`.
    pub fn from_writer(wtr: W) -> Writer<W> {
        WriterBuilder::new().from_writer(wtr)
    }

    /// Write a single record.
    ///
    /// The record may have any number of fields. A record with no fields is
    /// written as an empty line.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let line = self.fmt.format_record(record);
        self.wtr.write_all(line.as_bytes())?;
        self.wtr.write_all(self.term.as_str().as_bytes())?;
        self.records += 1;
        Ok(())
    }

    /// The number of records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        debug!("flushing CSV writer after {} records", self.records);
        self.wtr.flush()?;
        Ok(())
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.wtr.get_ref()
    }

    /// Flush the internal buffer and unwrap the underlying writer.
    ///
    /// If flushing fails, the underlying writer is lost and the flush error
    /// is returned.
    pub fn into_inner(self) -> Result<W> {
        debug!("closing CSV writer after {} records", self.records);
        self.wtr.into_inner().map_err(|err| Error::Io(err.into_error()))
    }
}

impl Writer<File> {
    /// Create a new CSV writer with a default configuration that writes to
    /// the given file path. The file is truncated if it already exists.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<File>> {
        WriterBuilder::new().from_path(path)
    }
}
