// CSV dataset loading: one header row followed by immutable data rows.
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};

/// One source record. Clones share the underlying fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(Arc<[String]>);

impl Row {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields.into())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl Deref for Row {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

impl From<&StringRecord> for Row {
    fn from(record: &StringRecord) -> Self {
        Self::new(record.iter().map(str::to_string).collect())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for field in self.0.iter() {
            seq.serialize_element(field)?;
        }
        seq.end()
    }
}

/// Parsed rows with the header split off. Never mutated after load.
#[derive(Debug, Default)]
pub struct Dataset {
    header: Row,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(header: Row, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &Row {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Rows in `[start, end)`, clamped to the dataset. Empty past the end.
    pub fn slice(&self, start: usize, end: usize) -> &[Row] {
        let len = self.rows.len();
        let end = end.min(len);
        if start >= end {
            return &[];
        }
        &self.rows[start..end]
    }
}

pub fn load(path: &Path) -> Result<Dataset, Error> {
    let file = File::open(path).map_err(|err| open_error(path, err))?;
    let dataset = parse(BufReader::new(file)).map_err(|err| err.with_path(path))?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

pub fn parse<R: Read>(reader: R) -> Result<Dataset, Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => Row::from(&record.map_err(record_error)?),
        None => return Ok(Dataset::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(Row::from(&record.map_err(record_error)?));
    }
    Ok(Dataset::new(header, rows))
}

fn open_error(path: &Path, err: io::Error) -> Error {
    let kind = match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        _ => ErrorKind::Io,
    };
    Error::new(kind)
        .with_message("failed to open data file")
        .with_path(path)
        .with_source(err)
}

fn record_error(err: csv::Error) -> Error {
    let kind = if err.is_io_error() {
        ErrorKind::Io
    } else {
        ErrorKind::Corrupt
    };
    let line = err.position().map(|pos| pos.line());
    let mut out = Error::new(kind).with_message("failed to read csv record");
    if let Some(line) = line {
        out = out.with_position(line);
    }
    out.with_source(err)
}
