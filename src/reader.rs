use std::fs::File;
use std::io;
use std::path::Path;

use csvstream_core::{Config, Terminator, Tokenizer};
use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};
use crate::source::{CharSource, DEFAULT_BUFFER_CAPACITY};
use crate::string_record::StringRecord;

/// Builds a CSV reader with various configuration knobs.
///
/// This builder can be used to tweak the field delimiter, record terminator
/// and more. Once a CSV `Reader` is built, its configuration cannot be
/// changed.
#[derive(Debug)]
pub struct ReaderBuilder {
    config: Config,
    headers: Option<StringRecord>,
    capacity: usize,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder {
            config: Config::DEFAULT,
            headers: None,
            capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring CSV parsing.
    ///
    /// To convert a builder into a reader, call one of the methods starting
    /// with `from_`.
    ///
    /// # Example
    ///
    /// ```
    /// use csvstream::ReaderBuilder;
    ///
    /// # fn example() -> csvstream::Result<()> {
    /// let data = "city;country\nBoston;United States\n";
    /// let mut rdr = ReaderBuilder::new()
    ///     .delimiter(';')
    ///     .from_reader(data.as_bytes());
    ///
    /// let record = rdr.read_record()?.unwrap();
    /// assert_eq!(record, vec!["Boston", "United States"]);
    /// # Ok(()) }
    /// # example().unwrap();
    /// ```
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Build a CSV reader from this configuration that reads data from `rdr`.
    ///
    /// Note that the CSV reader is buffered automatically, so you should not
    /// wrap `rdr` in a buffered reader like `io::BufReader`.
    pub fn from_reader<R: io::Read>(&self, rdr: R) -> Reader<R> {
        Reader::new(self, rdr)
    }

    /// Build a CSV reader from this configuration that reads data from the
    /// given file path.
    ///
    /// If there was a problem opening the file at the given path, then this
    /// returns the corresponding error.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Reader<File>> {
        Ok(Reader::new(self, File::open(path)?))
    }

    /// Replace the whole parsing configuration.
    ///
    /// Settings made before this call are overwritten; settings made after
    /// it apply on top of `config`.
    pub fn config(&mut self, config: Config) -> &mut ReaderBuilder {
        self.config = config;
        self
    }

    /// The field delimiter to use when parsing CSV.
    ///
    /// The default is `,`.
    pub fn delimiter(&mut self, delimiter: char) -> &mut ReaderBuilder {
        self.config = self.config.with_delimiter(delimiter);
        self
    }

    /// The quote character to use when parsing CSV.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.config = self.config.with_quote(quote);
        self
    }

    /// The comment character to use when parsing CSV.
    ///
    /// A record starting with this character is skipped through the end of
    /// its line. The default is `#`.
    pub fn comment(&mut self, comment: char) -> &mut ReaderBuilder {
        self.config = self.config.with_comment(comment);
        self
    }

    /// Whether to skip comment lines. Enabled by default.
    pub fn comments(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.config = self.config.with_comments(yes);
        self
    }

    /// Whether to treat the first record as a special header row.
    ///
    /// By default, the first record is treated as a header, which means it
    /// is excluded from the records returned by this reader. It is still
    /// available through `Reader::headers`.
    pub fn has_headers(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.config = self.config.with_headers_flag(yes);
        self
    }

    /// The record terminator to use when parsing CSV.
    ///
    /// The default is `Terminator::LF`.
    pub fn terminator(&mut self, term: Terminator) -> &mut ReaderBuilder {
        self.config = self.config.with_terminator(term);
        self
    }

    /// Use these field names instead of a header row from the data.
    ///
    /// When `has_headers` is enabled, the first record is still consumed
    /// and discarded. When it is disabled, the first record is data, and
    /// these names are only used to key the maps returned by
    /// `Reader::maps`.
    pub fn headers<I, T>(&mut self, headers: I) -> &mut ReaderBuilder
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.headers = Some(headers.into_iter().collect());
        self
    }

    /// The size of the chunks read from the underlying reader.
    ///
    /// The default is 8 KB.
    pub fn buffer_capacity(&mut self, capacity: usize) -> &mut ReaderBuilder {
        self.capacity = capacity;
        self
    }
}

/// The position of a CSV reader in its input.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    record: u64,
}

impl Position {
    /// The byte offset, starting at `0`, of the next unread character.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`, of the next unread character.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The number of records read so far, including a header record.
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// A CSV reader.
///
/// The reader pulls characters from any `io::Read` and returns one record at
/// a time. Records are produced lazily; reading a record consumes its input,
/// so a reader can be iterated only once.
///
/// # Headers
///
/// By default the first record is a header. It is read before the first data
/// record, or on the first call to `headers`, whichever comes first, and is
/// never returned as data.
///
/// # Example
///
/// ```
/// use csvstream::Reader;
///
/// # fn example() -> csvstream::Result<()> {
/// let data = "\
/// ## populations
/// city,country,pop
/// Boston,United States,4628910
/// Concord,United States,42695
/// ";
/// let mut rdr = Reader::from_reader(data.as_bytes());
/// assert_eq!(rdr.headers()?.unwrap(), vec!["city", "country", "pop"]);
/// for result in rdr.records() {
///     let record = result?;
///     assert_eq!(record.len(), 3);
/// }
/// # Ok(()) }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    tok: Tokenizer<CharSource<R>>,
    has_headers: bool,
    headers: Option<StringRecord>,
    /// Whether header handling has happened. It happens exactly once.
    header_read: bool,
    record: u64,
}

impl<R: io::Read> Reader<R> {
    fn new(builder: &ReaderBuilder, rdr: R) -> Reader<R> {
        let src = CharSource::with_capacity(builder.capacity, rdr);
        Reader {
            tok: Tokenizer::new(&builder.config, src),
            has_headers: builder.config.has_headers(),
            headers: builder.headers.clone(),
            header_read: false,
            record: 0,
        }
    }

    /// Create a new CSV reader with a default configuration for the given
    /// reader.
    ///
    /// To customize CSV parsing, use a `ReaderBuilder`.
    pub fn from_reader(rdr: R) -> Reader<R> {
        ReaderBuilder::new().from_reader(rdr)
    }

    /// Read the next data record.
    ///
    /// This returns `Ok(None)` at the end of the input. An error ends the
    /// input too: every call after an error returns `Ok(None)`.
    pub fn read_record(&mut self) -> Result<Option<StringRecord>> {
        self.read_headers()?;
        self.next_record()
    }

    /// Returns the header record, reading it if necessary.
    ///
    /// This returns `None` when header parsing is disabled and no headers
    /// were given to the builder, or when the input is empty.
    ///
    /// Headers given to the builder always win over a header row in the
    /// data.
    pub fn headers(&mut self) -> Result<Option<&StringRecord>> {
        self.read_headers()?;
        Ok(self.headers.as_ref())
    }

    /// Returns true if the first record is treated as a header.
    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    /// Returns a borrowed iterator over the data records.
    ///
    /// Each item yielded by this iterator is a `Result<StringRecord, Error>`.
    /// After an error is yielded, the iterator yields nothing more.
    pub fn records(&mut self) -> StringRecordsIter<R> {
        StringRecordsIter { rdr: self, done: false }
    }

    /// Returns an owned iterator over the data records.
    pub fn into_records(self) -> StringRecordsIntoIter<R> {
        StringRecordsIntoIter { rdr: self, done: false }
    }

    /// Returns a borrowed iterator that pairs every data record with the
    /// header.
    ///
    /// Each map associates header fields with record fields, in header
    /// order. A record shorter than the header only has entries for the
    /// fields it has. A record longer than the header has its extra fields
    /// dropped. If the header repeats a name, the entry keeps its first
    /// position and takes the last value.
    ///
    /// This returns `Error::MissingHeaders` if header parsing is disabled
    /// and the builder was given no headers.
    ///
    /// # Example
    ///
    /// ```
    /// use csvstream::Reader;
    ///
    /// # fn example() -> csvstream::Result<()> {
    /// let data = "name,age,phone\nSteve,40,555\nColin,42\n";
    /// let mut rdr = Reader::from_reader(data.as_bytes());
    /// let maps = rdr.maps()?.collect::<csvstream::Result<Vec<_>>>()?;
    ///
    /// assert_eq!(maps[0]["phone"], "555");
    /// assert_eq!(maps[1]["name"], "Colin");
    /// assert_eq!(maps[1].get("phone"), None);
    /// # Ok(()) }
    /// # example().unwrap();
    /// ```
    pub fn maps(&mut self) -> Result<MapRecordsIter<R>> {
        self.read_headers()?;
        let headers = match self.headers {
            Some(ref headers) => headers.clone(),
            None if self.has_headers => StringRecord::new(),
            None => return Err(Error::MissingHeaders),
        };
        Ok(MapRecordsIter { headers, records: self.records() })
    }

    /// Returns the current position of this reader.
    pub fn position(&self) -> Position {
        let src = self.tok.get_ref();
        Position { byte: src.byte(), line: src.line(), record: self.record }
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.tok.get_ref().get_ref()
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        self.tok.get_mut().get_mut()
    }

    /// Unwraps this CSV reader, returning the underlying reader.
    ///
    /// Note that any leftover data inside this reader's internal buffer is
    /// lost.
    pub fn into_inner(self) -> R {
        self.tok.into_inner().into_inner()
    }

    fn read_headers(&mut self) -> Result<()> {
        if self.header_read {
            return Ok(());
        }
        self.header_read = true;
        if !self.has_headers {
            return Ok(());
        }
        let first = self.next_record()?;
        match (self.headers.is_some(), first) {
            (_, None) => debug!("no header row: CSV input is empty"),
            (true, Some(_)) => {
                debug!("discarding header row in favor of explicit headers")
            }
            (false, Some(first)) => {
                debug!("read header row with {} fields", first.len());
                self.headers = Some(first);
            }
        }
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<StringRecord>> {
        match self.tok.next_record()? {
            None => Ok(None),
            Some(fields) => {
                self.record += 1;
                Ok(Some(StringRecord::from(fields)))
            }
        }
    }
}

impl Reader<File> {
    /// Create a new CSV reader with a default configuration for the given
    /// file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<File>> {
        ReaderBuilder::new().from_path(path)
    }
}

/// Pair a record with header names.
///
/// Only as many entries as the shorter of `headers` and `record` are made.
pub fn zip_headers(
    headers: &StringRecord,
    record: StringRecord,
) -> IndexMap<String, String> {
    let mut map = IndexMap::with_capacity(headers.len());
    for (key, value) in headers.iter().zip(record) {
        map.insert(key.to_string(), value);
    }
    map
}

/// A borrowed iterator over records as strings.
///
/// The lifetime parameter `'r` refers to the lifetime of the underlying CSV
/// `Reader`.
pub struct StringRecordsIter<'r, R: 'r> {
    rdr: &'r mut Reader<R>,
    done: bool,
}

impl<'r, R: io::Read> StringRecordsIter<'r, R> {
    /// Return a reference to the underlying CSV reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.rdr
    }

    /// Return a mutable reference to the underlying CSV reader.
    pub fn reader_mut(&mut self) -> &mut Reader<R> {
        &mut self.rdr
    }
}

impl<'r, R: io::Read> Iterator for StringRecordsIter<'r, R> {
    type Item = Result<StringRecord>;

    fn next(&mut self) -> Option<Result<StringRecord>> {
        next_or_done(self.rdr, &mut self.done)
    }
}

/// An owned iterator over records as strings.
pub struct StringRecordsIntoIter<R> {
    rdr: Reader<R>,
    done: bool,
}

impl<R: io::Read> StringRecordsIntoIter<R> {
    /// Return a reference to the underlying CSV reader.
    pub fn reader(&self) -> &Reader<R> {
        &self.rdr
    }

    /// Drop this iterator and return the underlying CSV reader.
    pub fn into_reader(self) -> Reader<R> {
        self.rdr
    }
}

impl<R: io::Read> Iterator for StringRecordsIntoIter<R> {
    type Item = Result<StringRecord>;

    fn next(&mut self) -> Option<Result<StringRecord>> {
        next_or_done(&mut self.rdr, &mut self.done)
    }
}

fn next_or_done<R: io::Read>(
    rdr: &mut Reader<R>,
    done: &mut bool,
) -> Option<Result<StringRecord>> {
    if *done {
        return None;
    }
    match rdr.read_record() {
        Ok(Some(record)) => Some(Ok(record)),
        Ok(None) => {
            *done = true;
            None
        }
        Err(err) => {
            *done = true;
            Some(Err(err))
        }
    }
}

/// A borrowed iterator over records as maps keyed by the header.
pub struct MapRecordsIter<'r, R: 'r> {
    headers: StringRecord,
    records: StringRecordsIter<'r, R>,
}

impl<'r, R: io::Read> MapRecordsIter<'r, R> {
    /// The header used as keys.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }
}

impl<'r, R: io::Read> Iterator for MapRecordsIter<'r, R> {
    type Item = Result<IndexMap<String, String>>;

    fn next(&mut self) -> Option<Result<IndexMap<String, String>>> {
        let headers = &self.headers;
        self.records
            .next()
            .map(|res| res.map(|record| zip_headers(headers, record)))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use csvstream_core::{Config, Terminator};

    use super::{zip_headers, Reader, ReaderBuilder};
    use crate::error::Error;
    use crate::string_record::StringRecord;

    fn b(s: &str) -> &[u8] {
        s.as_bytes()
    }

    fn all<R: io::Read>(rdr: &mut Reader<R>) -> Vec<Vec<String>> {
        rdr.records().map(|r| r.unwrap().into_vec()).collect()
    }

    struct FailAfter<'a> {
        data: &'a [u8],
    }

    impl<'a> io::Read for FailAfter<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn header_then_records() {
        let data = "name,age,phone\nSteve,40,555\nJim,42,995";
        let mut rdr = Reader::from_reader(b(data));
        assert_eq!(rdr.headers().unwrap().unwrap(), vec!["name", "age", "phone"]);
        assert_eq!(
            all(&mut rdr),
            vec![vec!["Steve", "40", "555"], vec!["Jim", "42", "995"]]
        );
    }

    #[test]
    fn records_before_headers() {
        let data = "First,Last,Age\nBob,Smith,44\nJane,Doe,40";
        let mut rdr = Reader::from_reader(b(data));
        let total: usize = rdr.records().map(|r| r.unwrap().len()).sum();
        assert_eq!(total, 6);
        assert_eq!(rdr.headers().unwrap().unwrap(), vec!["First", "Last", "Age"]);
    }

    #[test]
    fn comments_before_header() {
        let data = "# this is a comment\n# so is this\nname,age\nBob,40";
        let mut rdr = Reader::from_reader(b(data));
        assert_eq!(rdr.headers().unwrap().unwrap(), vec!["name", "age"]);
        assert_eq!(all(&mut rdr), vec![vec!["Bob", "40"]]);
        assert_eq!(rdr.position().record(), 2);
    }

    #[test]
    fn no_headers() {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(b("a,b\nc,d"));
        assert_eq!(rdr.headers().unwrap(), None);
        assert_eq!(all(&mut rdr), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn override_consumes_header_row() {
        let mut rdr = ReaderBuilder::new()
            .headers(&["x", "y"])
            .from_reader(b("a,b\n1,2"));
        assert_eq!(rdr.headers().unwrap().unwrap(), vec!["x", "y"]);
        assert_eq!(all(&mut rdr), vec![vec!["1", "2"]]);
    }

    #[test]
    fn override_without_header_row() {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .headers(vec!["x".to_string(), "y".to_string()])
            .from_reader(b("a,b\n1,2"));
        let maps: Vec<_> = rdr.maps().unwrap().map(|m| m.unwrap()).collect();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["x"], "a");
        assert_eq!(maps[1]["y"], "2");
    }

    #[test]
    fn maps_ragged_records() {
        let data = "name,age,phone\nSteve,40,555\nColin,42\nAl,1,2,3";
        let mut rdr = Reader::from_reader(b(data));
        let maps: Vec<_> = rdr.maps().unwrap().map(|m| m.unwrap()).collect();
        assert_eq!(maps.len(), 3);

        let keys: Vec<_> = maps[0].keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "age", "phone"]);
        assert_eq!(maps[0]["phone"], "555");

        assert_eq!(maps[1].len(), 2);
        assert_eq!(maps[1]["name"], "Colin");
        assert_eq!(maps[1]["age"], "42");
        assert!(!maps[1].contains_key("phone"));

        assert_eq!(maps[2].len(), 3);
        assert_eq!(maps[2]["phone"], "2");
    }

    #[test]
    fn maps_need_headers() {
        let mut rdr = ReaderBuilder::new().has_headers(false).from_reader(b("a"));
        match rdr.maps() {
            Err(Error::MissingHeaders) => {}
            Err(err) => panic!("unexpected error: {}", err),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn maps_on_empty_input() {
        let mut rdr = Reader::from_reader(b(""));
        assert_eq!(rdr.maps().unwrap().count(), 0);
        assert_eq!(rdr.headers().unwrap(), None);
    }

    #[test]
    fn zip_duplicate_names() {
        let headers = StringRecord::from(vec!["a", "b", "a"]);
        let map = zip_headers(&headers, StringRecord::from(vec!["1", "2", "3"]));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index(0), Some((&"a".to_string(), &"3".to_string())));
    }

    #[test]
    fn empty_input() {
        let mut rdr = Reader::from_reader(b(""));
        assert_eq!(rdr.records().count(), 0);
        assert_eq!(rdr.read_record().unwrap(), None);
    }

    #[test]
    fn io_error_ends_iteration() {
        let rdr = FailAfter { data: b("h\na\nb") };
        let mut rdr = ReaderBuilder::new().buffer_capacity(4).from_reader(rdr);
        let mut it = rdr.records();
        assert_eq!(it.next().unwrap().unwrap(), vec!["a"]);
        match it.next() {
            Some(Err(ref err)) if err.is_io_error() => {}
            res => panic!("expected I/O error, got {:?}", res),
        }
        assert!(it.next().is_none());
        assert_eq!(rdr.read_record().unwrap(), None);
    }

    #[test]
    fn io_error_reading_header() {
        let mut rdr = Reader::from_reader(FailAfter { data: b"" });
        assert!(rdr.headers().unwrap_err().is_io_error());
        assert_eq!(rdr.read_record().unwrap(), None);
    }

    #[test]
    fn buffer_capacity_does_not_change_records() {
        let data = "a,\"b\nb\",c\n# note\n\"x\"\"y\",z,\n";
        let expected = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(b(data))
            .into_records()
            .map(|r| r.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(expected.len(), 2);
        for cap in 1..16 {
            let got = ReaderBuilder::new()
                .has_headers(false)
                .buffer_capacity(cap)
                .from_reader(b(data))
                .into_records()
                .map(|r| r.unwrap())
                .collect::<Vec<_>>();
            assert_eq!(expected, got, "capacity {}", cap);
        }
    }

    #[test]
    fn builder_config() {
        let config = Config::DEFAULT_WITHOUT_HEADER
            .with_delimiter('\t')
            .with_terminator(Terminator::CRLF);
        let mut rdr = ReaderBuilder::new()
            .config(config)
            .from_reader(b("a\tb\r\nc\td\r\n"));
        assert!(!rdr.has_headers());
        assert_eq!(all(&mut rdr), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn position_tracks_input() {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(b("ab,c\nd\n"));
        rdr.read_record().unwrap();
        let pos = rdr.position();
        assert_eq!((pos.byte(), pos.line(), pos.record()), (5, 2, 1));
        rdr.read_record().unwrap();
        assert_eq!(rdr.position().line(), 3);
    }

    #[test]
    fn into_inner_returns_stream() {
        let rdr = Reader::from_reader(io::Cursor::new("a,b"));
        assert_eq!(rdr.get_ref().position(), 0);
        assert_eq!(rdr.into_inner().into_inner(), "a,b");
    }
}
