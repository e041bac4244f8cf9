//! Labeled record ingestion from delimited text files.
//!
//! The expected layout is a header row (always skipped) followed by rows of
//! `text,label`:
//! ```csv
//! soup,is_soup
//! tomato bisque,TRUE
//! leather boots,FALSE
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {message}")]
    Format { line: u64, message: String },
}

/// A single labeled text sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub label: bool,
}

impl Record {
    pub fn new(text: impl Into<String>, label: bool) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    /// Builds a record from raw CSV fields. Only the token `TRUE` (any case) marks a soup.
    pub fn from_fields(text: &str, label: &str) -> Self {
        Self::new(text, parse_label(label))
    }
}

/// Returns `true` only when the token upper-cases to exactly `TRUE`.
pub fn parse_label(token: &str) -> bool {
    token.to_uppercase() == "TRUE"
}

/// An ordered collection of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Labels as 0/1, index-aligned with [`RecordSet::texts`].
    pub fn labels(&self) -> Vec<u8> {
        self.records.iter().map(|r| u8::from(r.label)).collect()
    }

    /// Boolean view of [`RecordSet::labels`].
    pub fn label_flags(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.label).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Reads [`RecordSet`]s from delimited files.
#[derive(Debug, Clone)]
pub struct RecordReader {
    delimiter: u8,
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordReader {
    /// Creates a reader for comma-delimited input.
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets a custom single-byte delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads and parses the file at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<RecordSet, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = self.read(file)?;
        info!("Loaded {} records from {:?}", records.len(), path);
        Ok(records)
    }

    /// Parses records from any reader. The first row is discarded as a header.
    ///
    /// Blank lines are rows without columns and fail like any other short row.
    pub fn read<R: Read>(&self, mut input: R) -> Result<RecordSet, DatasetError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        if let Some(line) = first_blank_line(&bytes) {
            return Err(DatasetError::Format {
                line,
                message: "expected 2 columns, found 0".to_string(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(map_csv_error)?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            if row.len() < 2 {
                return Err(DatasetError::Format {
                    line,
                    message: format!("expected 2 columns, found {}", row.len()),
                });
            }

            let text = &row[0];
            if text.trim().is_empty() {
                return Err(DatasetError::Format {
                    line,
                    message: "text column is empty".to_string(),
                });
            }

            let record = Record::from_fields(text, &row[1]);
            debug!("line {}: {:?}", line, record);
            records.push(record);
        }

        Ok(RecordSet::new(records))
    }
}

/// Line number of the first empty line that is not inside a quoted field.
///
/// The csv reader drops such lines silently, which would hide them from the
/// column count check.
fn first_blank_line(bytes: &[u8]) -> Option<u64> {
    let mut line = 1;
    let mut blank = true;
    let mut quoted = false;
    for &byte in bytes {
        match byte {
            b'"' => {
                quoted = !quoted;
                blank = false;
            }
            b'\n' => {
                if blank && !quoted {
                    return Some(line);
                }
                line += 1;
                blank = true;
            }
            b'\r' => {}
            _ => blank = false,
        }
    }
    None
}

fn map_csv_error(err: csv::Error) -> DatasetError {
    let line = err.position().map(|p| p.line()).unwrap_or_default();
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io_err) = err.into_kind() {
            return DatasetError::Io(io_err);
        }
        return DatasetError::Format {
            line,
            message: "unreadable row".to_string(),
        };
    }
    DatasetError::Format {
        line,
        message: err.to_string(),
    }
}

/// Reads a comma-delimited record file.
pub fn read_records(path: impl AsRef<Path>) -> Result<RecordSet, DatasetError> {
    RecordReader::new().read_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<RecordSet, DatasetError> {
        RecordReader::new().read(input.as_bytes())
    }

    #[test]
    fn test_header_is_always_skipped() {
        let records = parse("tomato bisque,TRUE\nleather boots,FALSE\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.records()[0], Record::new("leather boots", false));
    }

    #[test]
    fn test_label_parsing() {
        assert!(parse_label("TRUE"));
        assert!(parse_label("true"));
        assert!(parse_label("True"));
        assert!(!parse_label("FALSE"));
        assert!(!parse_label("yes"));
        assert!(!parse_label("1"));
        assert!(!parse_label(" true"));
        assert!(!parse_label(""));
    }

    #[test]
    fn test_views_are_aligned() {
        let records = parse("soup,is_soup\nchicken noodle,true\nwool sweater,no\nminestrone,TRUE\n").unwrap();
        assert_eq!(records.texts(), vec!["chicken noodle", "wool sweater", "minestrone"]);
        assert_eq!(records.labels(), vec![1, 0, 1]);
        assert_eq!(records.label_flags(), vec![true, false, true]);
    }

    #[test]
    fn test_text_kept_verbatim() {
        let records = parse("soup,is_soup\n\"  split pea, with ham \",TRUE\n").unwrap();
        assert_eq!(records.records()[0].text, "  split pea, with ham ");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let records = parse("soup,is_soup,notes\nborscht,TRUE,beets\n").unwrap();
        assert_eq!(records.records()[0], Record::new("borscht", true));
    }

    #[test]
    fn test_short_row_is_format_error() {
        let err = parse("soup,is_soup\nborscht,TRUE\ngazpacho\n").unwrap_err();
        match err {
            DatasetError::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_is_format_error() {
        assert!(matches!(
            parse("soup,is_soup\n,TRUE\n"),
            Err(DatasetError::Format { .. })
        ));
    }

    #[test]
    fn test_blank_line_reports_line() {
        match parse("soup,is_soup\r\nramen,TRUE\r\n\r\nudon,FALSE\r\n").unwrap_err() {
            DatasetError::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            parse("soup,is_soup\nramen,TRUE\n\n"),
            Err(DatasetError::Format { line: 3, .. })
        ));
    }

    #[test]
    fn test_blank_line_inside_quotes_is_text() {
        let records = parse("soup,is_soup\n\"pho\n\nwith basil\",TRUE\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.records()[0].text, "pho\n\nwith basil");
    }

    #[test]
    fn test_custom_delimiter() {
        let records = RecordReader::new()
            .with_delimiter(b';')
            .read("soup;is_soup\nclam chowder;TRUE\n".as_bytes())
            .unwrap();
        assert_eq!(records.records()[0], Record::new("clam chowder", true));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_records("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
