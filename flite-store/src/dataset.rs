use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::ledger::ReservationStore;
use crate::loader::{LoadReport, RawCandidate};

/// Dataset-level failure. The caller is expected to carry on with whatever
/// the store already holds.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Dataset {} could not be read: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single data line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("line {ordinal}: missing {field}")]
    MissingField { ordinal: u64, field: &'static str },

    #[error("line {ordinal}: {field} is not an integer: '{value}'")]
    InvalidNumber {
        ordinal: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {ordinal}: {message}")]
    Unparseable { ordinal: u64, message: String },
}

impl LineError {
    pub fn ordinal(&self) -> u64 {
        match self {
            LineError::MissingField { ordinal, .. }
            | LineError::InvalidNumber { ordinal, .. }
            | LineError::Unparseable { ordinal, .. } => *ordinal,
        }
    }
}

/// Reads the passenger manifest: a header line, then
/// `passenger_id,name,seat_row,seat_column,seat_class` per line.
pub struct DatasetReader<R> {
    path: PathBuf,
    source: R,
}

impl DatasetReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        match File::open(&path) {
            Ok(source) => Ok(Self { path, source }),
            Err(source) => Err(LoadError::SourceUnreadable { path, source }),
        }
    }
}

impl<R: Read> DatasetReader<R> {
    pub fn from_reader(name: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: name.into(),
            source: reader,
        }
    }

    /// Parse every data line. Malformed lines come back as `Err` entries in
    /// their position; only an I/O failure aborts the read.
    ///
    /// A record's ordinal is its physical line number less the header, so
    /// blank lines and continuation lines of quoted fields still use up a
    /// position.
    pub fn read_all(mut self) -> Result<Vec<Result<RawCandidate, LineError>>, LoadError> {
        let mut text = Vec::new();
        if let Err(source) = self.source.read_to_end(&mut text) {
            return Err(LoadError::SourceUnreadable {
                path: self.path,
                source,
            });
        }

        let mut positions = LinePositions::new(&text);
        let mut lines = Vec::new();
        for (index, record) in builder().from_reader(text.as_slice()).records().enumerate() {
            let offset = match &record {
                Ok(record) => record.position(),
                Err(err) => err.position(),
            }
            .map(Position::byte);
            let ordinal = offset
                .map(|offset| positions.ordinal_at(offset))
                .unwrap_or(index as u64 + 1);
            match record {
                Ok(record) => lines.push(parse_record(ordinal, &record)),
                Err(err) => lines.push(Err(LineError::Unparseable {
                    ordinal,
                    message: err.to_string(),
                })),
            }
        }
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "Dataset read");
        Ok(lines)
    }
}

/// Turns record byte offsets into data-line ordinals. Offsets must be fed in
/// increasing order.
struct LinePositions<'a> {
    text: &'a [u8],
    offset: usize,
    // 1-based line of `offset`; the header is line 1
    line: u64,
}

impl<'a> LinePositions<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self { text, offset: 0, line: 1 }
    }

    fn ordinal_at(&mut self, offset: u64) -> u64 {
        let mut start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.text.len());
        // The parser may report a record from the end of the previous one,
        // before the empty lines it skipped.
        while matches!(self.text.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.text[self.offset..start].iter().filter(|&&b| b == b'\n').count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line.saturating_sub(1).max(1)
    }
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(Trim::All);
    builder
}

fn field<'r>(record: &'r StringRecord, ordinal: u64, index: usize, name: &'static str) -> Result<&'r str, LineError> {
    record
        .get(index)
        .ok_or(LineError::MissingField { ordinal, field: name })
}

fn integer(record: &StringRecord, ordinal: u64, index: usize, name: &'static str) -> Result<i64, LineError> {
    let value = field(record, ordinal, index, name)?;
    value.parse().map_err(|_| LineError::InvalidNumber {
        ordinal,
        field: name,
        value: value.to_string(),
    })
}

fn parse_record(ordinal: u64, record: &StringRecord) -> Result<RawCandidate, LineError> {
    let passenger_id = integer(record, ordinal, 0, "passenger_id")?;
    let name = field(record, ordinal, 1, "name")?.to_string();
    let seat_row = integer(record, ordinal, 2, "seat_row")?;
    // Only the first character of the column counts
    let seat_column = field(record, ordinal, 3, "seat_column")?
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .ok_or(LineError::MissingField { ordinal, field: "seat_column" })?;
    let seat_class = field(record, ordinal, 4, "seat_class")?.to_string();

    Ok(RawCandidate {
        ordinal,
        passenger_id,
        name,
        seat_row,
        seat_column,
        seat_class,
    })
}

/// Read a dataset file and bulk-load it into `store`.
pub fn load_dataset(store: &mut ReservationStore, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
    let lines = DatasetReader::open(path)?.read_all()?;
    Ok(store.bulk_load(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Vec<Result<RawCandidate, LineError>> {
        DatasetReader::from_reader("inline.csv", text.as_bytes())
            .read_all()
            .unwrap()
    }

    #[test]
    fn test_parses_fields() {
        let lines = read("PassengerID,Name,SeatRow,SeatColumn,Class\n101, Ada Lovelace ,12,c,Business\n");
        assert_eq!(lines.len(), 1);
        let candidate = lines[0].as_ref().unwrap();
        assert_eq!(candidate.ordinal, 1);
        assert_eq!(candidate.passenger_id, 101);
        assert_eq!(candidate.name, "Ada Lovelace");
        assert_eq!(candidate.seat_row, 12);
        assert_eq!(candidate.seat_column, 'C');
        assert_eq!(candidate.seat_class, "Business");
    }

    #[test]
    fn test_malformed_lines_keep_their_position() {
        let text = "id,name,row,col,class\n\
                    abc,Bad Id,1,A,Economy\n\
                    2,Short,3\n\
                    3,No Column,4,,First\n\
                    4,Fine,5,B,Economy,extra\n";
        let lines = read(text);
        assert_eq!(lines.len(), 4);

        assert_eq!(
            lines[0],
            Err(LineError::InvalidNumber {
                ordinal: 1,
                field: "passenger_id",
                value: "abc".to_string()
            })
        );
        assert_eq!(lines[1], Err(LineError::MissingField { ordinal: 2, field: "seat_column" }));
        assert_eq!(lines[2], Err(LineError::MissingField { ordinal: 3, field: "seat_column" }));

        let fine = lines[3].as_ref().unwrap();
        assert_eq!(fine.ordinal, 4);
        assert_eq!(fine.passenger_id, 4);
    }

    #[test]
    fn test_blank_and_continuation_lines_count_for_position() {
        let text = "id,name,row,col,class\n\
                    1,Alpha,1,A,Economy\n\
                    \n\
                    2,\"Bravo\nBravo\",1,B,Economy\n\
                    3,Charlie,2,A,Economy\n";
        let ordinals: Vec<u64> = read(text).iter().map(|line| line.as_ref().unwrap().ordinal).collect();
        assert_eq!(ordinals, vec![1, 3, 5]);
    }

    #[test]
    fn test_blank_crlf_lines_count_for_position() {
        let lines = read("id,name,row,col,class\r\n1,A,1,a,First\r\n\r\n\r\nabc,B,1,b,First\r\n");
        assert_eq!(lines[0].as_ref().unwrap().ordinal, 1);
        assert_eq!(lines[1].as_ref().unwrap_err().ordinal(), 4);
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = read("id,name,row,col,class\r\n1,A,1,a,First\r\n");
        assert_eq!(lines[0].as_ref().unwrap().seat_class, "First");
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let mut store = ReservationStore::default();
        let err = load_dataset(&mut store, "/nonexistent/flite/manifest.csv").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnreadable { .. }));
        assert!(err.to_string().contains("/nonexistent/flite/manifest.csv"));
        assert!(store.is_empty());
    }
}
