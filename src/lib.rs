/*!
The `csvstream` crate reads and writes CSV one record at a time over any
`std::io::Read` or `std::io::Write`.

Parsing is lenient: malformed quoting never produces an error and records may
have any number of fields. Fields are unquoted and trimmed of surrounding
whitespace. Comment lines, custom delimiters, quote characters and record
terminators are all configurable.

# Example

```
use csvstream::{Reader, Writer};

# fn example() -> csvstream::Result<()> {
let data = "\
name,age,phone
Steve,40,555-1234
Colin,42
";
let mut rdr = Reader::from_reader(data.as_bytes());
let mut wtr = Writer::from_writer(vec![]);
for result in rdr.maps()? {
    let map = result?;
    wtr.write_record(&[&map["name"], &map["age"]])?;
}
let data = String::from_utf8(wtr.into_inner()?).unwrap();
assert_eq!(data, "Steve,40\nColin,42\n");
# Ok(()) }
# example().unwrap();
```

The I/O free tokenizer and formatter live in the `csvstream-core` crate and
are re-exported here.
*/

pub use csvstream_core::{
    split, Chars, Config, Formatter, QuoteStyle, StrChars, Terminator,
    Tokenizer,
};

pub use crate::error::{Error, Result};
pub use crate::reader::{
    zip_headers, MapRecordsIter, Position, Reader, ReaderBuilder,
    StringRecordsIntoIter, StringRecordsIter,
};
pub use crate::source::{CharSource, DEFAULT_BUFFER_CAPACITY};
pub use crate::string_record::{StringRecord, StringRecordIter};
pub use crate::writer::{Writer, WriterBuilder};

mod error;
mod reader;
mod source;
mod string_record;
mod writer;
