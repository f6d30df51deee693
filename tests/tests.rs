use std::env;
use std::fs;
use std::process;

use csvstream::{
    Config, Reader, ReaderBuilder, StringRecord, Terminator, Writer,
    WriterBuilder,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn read_all(data: &str, config: Config) -> Vec<StringRecord> {
    ReaderBuilder::new()
        .config(config)
        .from_reader(data.as_bytes())
        .into_records()
        .collect::<csvstream::Result<Vec<_>>>()
        .unwrap()
}

fn write_all(records: &[Vec<&str>], config: Config) -> String {
    let mut wtr = WriterBuilder::new().config(config).from_writer(vec![]);
    for record in records {
        wtr.write_record(record).unwrap();
    }
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

fn tricky() -> Vec<Vec<&'static str>> {
    vec![
        vec!["plain", "a,b", "say \"hi\""],
        vec!["", "", ""],
        vec!["日本", "\"", "#not a comment"],
        vec!["single"],
    ]
}

#[test]
fn round_trip_default() {
    init_logging();
    let config = Config::DEFAULT_WITHOUT_HEADER;
    let data = write_all(&tricky(), config);
    assert_eq!(read_all(&data, config), tricky());
}

#[test]
fn round_trip_custom() {
    init_logging();
    let config = Config::DEFAULT_WITHOUT_HEADER
        .with_delimiter('|')
        .with_quote('\'')
        .with_terminator(Terminator::CRLF);
    let records = vec![
        vec!["a|b", "it's", "c,d"],
        vec!["x", "'", "\"y\""],
    ];
    let data = write_all(&records, config);
    assert!(data.ends_with("\r\n"));
    assert_eq!(read_all(&data, config), records);
}

#[test]
fn headers_and_maps() {
    init_logging();
    let data = "\
# exported contacts
name, age ,phone
Steve,40,555-1234
Colin,42
";
    let mut rdr = Reader::from_reader(data.as_bytes());
    assert_eq!(rdr.headers().unwrap().unwrap(), vec!["name", "age", "phone"]);

    let maps = rdr.maps().unwrap().collect::<csvstream::Result<Vec<_>>>();
    let maps = maps.unwrap();
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[0]["phone"], "555-1234");
    assert_eq!(maps[1].len(), 2);
    assert_eq!(maps[1].get("phone"), None);
}

#[test]
fn file_round_trip() {
    init_logging();
    let path = env::temp_dir()
        .join(format!("csvstream-file-round-trip-{}.csv", process::id()));

    let mut wtr = Writer::from_path(&path).unwrap();
    wtr.write_record(&["city", "pop"]).unwrap();
    wtr.write_record(&["Boston", "4,628,910"]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut rdr = Reader::from_path(&path).unwrap();
    let records = rdr.records().map(|r| r.unwrap()).collect::<Vec<_>>();
    assert_eq!(rdr.headers().unwrap().unwrap(), vec!["city", "pop"]);
    assert_eq!(records, vec![StringRecord::from(vec!["Boston", "4,628,910"])]);
    drop(rdr);

    fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file() {
    let path = env::temp_dir().join("csvstream-this-file-does-not-exist.csv");
    let err = Reader::from_path(&path).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn formatted_lines_split_back() {
    let config = Config::DEFAULT_WITHOUT_HEADER;
    let mut fmt = csvstream::Formatter::new(&config);
    for record in tricky() {
        let line = fmt.format(&record);
        assert_eq!(csvstream::split(&config, &line), record);
    }
}
