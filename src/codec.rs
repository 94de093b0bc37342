// codec.rs
//
// Row-oriented text format for the calculation history:
//
//     operation,operand1,operand2,result,created_at
//     add,5.0,3.0,8.0,2025-10-27T10:30:00

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Local, NaiveDateTime};
use itertools::Itertools;

use crate::calculation::Calculation;
use crate::error::PersistenceError;

pub const COLUMNS: [&str; 5] = ["operation", "operand1", "operand2", "result", "created_at"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMESTAMP_FORMAT_SPACED: &str = "%Y-%m-%d %H:%M:%S%.f";
const BOM: &str = "\u{feff}";

/// Serialize `entries` as a header row followed by one row per calculation.
/// An empty history is refused rather than written as a header-only file.
pub fn encode(entries: &[Calculation]) -> Result<Bytes, PersistenceError> {
    if entries.is_empty() {
        return Err(PersistenceError::EmptyHistory);
    }
    let mut buf = BytesMut::with_capacity(64 * (entries.len() + 1));
    put_row(&mut buf, COLUMNS.iter().map(|c| Cow::Borrowed(*c)));
    for calc in entries {
        put_row(
            &mut buf,
            [
                escape_field(calc.operation()),
                Cow::Owned(format_number(calc.operand1())),
                Cow::Owned(format_number(calc.operand2())),
                Cow::Owned(format_number(calc.result())),
                Cow::Owned(format_timestamp(calc.created_at())),
            ],
        );
    }
    Ok(buf.freeze())
}

/// Parse a header plus rows back into calculations, oldest first.
///
/// Columns are located by header name. `created_at` may be missing from the
/// header or from individual rows; unreadable timestamps fall back to now.
pub fn decode(data: &[u8]) -> Result<Vec<Calculation>, PersistenceError> {
    let text = std::str::from_utf8(data).map_err(|_| PersistenceError::NotUtf8)?;
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut records = read_records(text)?.into_iter();

    let header = records.next().ok_or(PersistenceError::MissingHeader)?;
    let columns = ColumnMap::from_header(&header.fields)?;

    let mut entries = Vec::new();
    for record in records {
        let found = record.fields.len();
        if found > header.fields.len() || columns.required_width() > found {
            return Err(PersistenceError::FieldCount {
                row: record.line,
                expected: header.fields.len(),
                found,
            });
        }
        entries.push(columns.parse_row(&record)?);
    }
    Ok(entries)
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT_SPACED))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

fn format_number(value: f64) -> String {
    // Debug output is the shortest text that parses back to the same f64.
    format!("{:?}", value)
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn put_row<'a>(buf: &mut BytesMut, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    let line = fields.into_iter().join(",");
    buf.put_slice(line.as_bytes());
    buf.put_u8(b'\n');
}

struct ColumnMap {
    operation: usize,
    operand1: usize,
    operand2: usize,
    result: usize,
    created_at: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self, PersistenceError> {
        let find = |name: &'static str| header.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(PersistenceError::MissingColumn(name));
        Ok(Self {
            operation: require("operation")?,
            operand1: require("operand1")?,
            operand2: require("operand2")?,
            result: require("result")?,
            created_at: find("created_at"),
        })
    }

    /// Fields a row must carry to reach every required column.
    fn required_width(&self) -> usize {
        1 + self.operation.max(self.operand1).max(self.operand2).max(self.result)
    }

    fn parse_row(&self, record: &Record) -> Result<Calculation, PersistenceError> {
        let operation = record.fields[self.operation].trim();
        if operation.is_empty() {
            return Err(PersistenceError::EmptyField {
                row: record.line,
                column: "operation",
            });
        }
        let operand1 = parse_number(record, self.operand1, "operand1")?;
        let operand2 = parse_number(record, self.operand2, "operand2")?;
        let result = parse_number(record, self.result, "result")?;

        let raw_ts = self
            .created_at
            .and_then(|i| record.fields.get(i))
            .map_or("", String::as_str);
        let created_at = match parse_timestamp(raw_ts) {
            Some(ts) => ts,
            None => {
                if !raw_ts.trim().is_empty() {
                    tracing::warn!(row = record.line, value = raw_ts, "unreadable created_at, using current time");
                }
                Local::now().naive_local()
            }
        };
        Ok(Calculation::with_timestamp(
            operation, operand1, operand2, result, created_at,
        ))
    }
}

fn parse_number(record: &Record, index: usize, column: &'static str) -> Result<f64, PersistenceError> {
    let raw = record.fields[index].trim();
    if raw.is_empty() {
        return Err(PersistenceError::EmptyField {
            row: record.line,
            column,
        });
    }
    raw.parse::<f64>().map_err(|_| PersistenceError::InvalidNumber {
        row: record.line,
        column,
        value: raw.to_string(),
    })
}

struct Record {
    line: usize,
    fields: Vec<String>,
}

fn read_records(text: &str) -> Result<Vec<Record>, PersistenceError> {
    enum State {
        Plain,
        Quoted,
        QuoteSeen,
    }
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut state = State::Plain;
    let mut line = 1;
    let mut start_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Plain | State::QuoteSeen => match ch {
                '"' if matches!(state, State::QuoteSeen) => {
                    cur.push('"');
                    state = State::Quoted;
                }
                '"' if cur.is_empty() => state = State::Quoted,
                ',' => {
                    fields.push(std::mem::take(&mut cur));
                    state = State::Plain;
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    fields.push(std::mem::take(&mut cur));
                    push_record(&mut records, start_line, std::mem::take(&mut fields));
                    line += 1;
                    start_line = line;
                    state = State::Plain;
                }
                _ => {
                    cur.push(ch);
                    state = State::Plain;
                }
            },
            State::Quoted => match ch {
                '"' => state = State::QuoteSeen,
                '\n' => {
                    line += 1;
                    cur.push(ch);
                }
                _ => cur.push(ch),
            },
        }
    }

    if matches!(state, State::Quoted) {
        return Err(PersistenceError::UnterminatedQuote { row: start_line });
    }
    if !cur.is_empty() || !fields.is_empty() || matches!(state, State::QuoteSeen) {
        fields.push(cur);
        push_record(&mut records, start_line, fields);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields });
    }
}
