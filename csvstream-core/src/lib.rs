/*!
`csvstream-core` provides the I/O free half of the `csvstream` crate: a pull
based CSV tokenizer and a CSV line formatter.

Most users want the `csvstream` crate instead,
which reads records from any `std::io::Read` and writes them to any
`std::io::Write`.

# Overview

A [`Tokenizer`](struct.Tokenizer.html) reads characters from any type
implementing [`Chars`](trait.Chars.html) and returns one record at a time as a
`Vec<String>`. [`StrChars`](struct.StrChars.html) supplies characters from an
in memory string.

A [`Formatter`](struct.Formatter.html) turns a sequence of fields back into a
single CSV line, quoting only the fields that need it.

Both are configured with a [`Config`](struct.Config.html).

# Example

```
use csvstream_core::{Config, Formatter, StrChars, Tokenizer};

let data = "name,quote\nAda,\"say \"\"hi\"\"\"\n";
let mut tok = Tokenizer::new(&Config::DEFAULT, StrChars::new(data));

let mut records = vec![];
while let Some(record) = tok.next_record().unwrap() {
    records.push(record);
}
assert_eq!(records[1], vec!["Ada", "say \"hi\""]);

let mut fmt = Formatter::default();
assert_eq!(fmt.format(&records[1]), "Ada,\"say \"\"hi\"\"\"");
```
*/

pub use crate::chars::{Chars, StrChars};
pub use crate::config::{Config, QuoteStyle, Terminator};
pub use crate::formatter::Formatter;
pub use crate::tokenizer::{split, Tokenizer};

mod chars;
mod config;
mod formatter;
mod tokenizer;
