//! Fixed-size row windows over a CSV/TSV stream.
//!
//! Both the extract and transform steps walk their input through
//! [`ChunkedRecords`], so at most `chunk_rows` parsed rows are resident at a
//! time. Chunk boundaries carry no meaning: concatenating every chunk yields
//! the source rows in their original order.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::io::Read;

use crate::error::Result;

/// A contiguous slice of source rows.
#[derive(Debug, Clone)]
pub struct RawChunk {
    /// Zero-based index of the first row in this chunk (header excluded)
    pub first_row: u64,
    pub rows: Vec<StringRecord>,
}

impl RawChunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lazy iterator of [`RawChunk`]s. Stops after the first error.
pub struct ChunkedRecords<R: Read> {
    header: StringRecord,
    records: StringRecordsIntoIter<R>,
    chunk_rows: usize,
    next_row: u64,
    done: bool,
}

impl<R: Read> ChunkedRecords<R> {
    /// Tab-separated input with a header row
    pub fn tsv(input: R, chunk_rows: usize) -> Result<Self> {
        Self::with_delimiter(input, b'\t', chunk_rows)
    }

    /// Comma-separated input with a header row
    pub fn csv(input: R, chunk_rows: usize) -> Result<Self> {
        Self::with_delimiter(input, b',', chunk_rows)
    }

    fn with_delimiter(input: R, delimiter: u8, chunk_rows: usize) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(input);
        let header = reader.headers()?.clone();
        Ok(Self {
            header,
            records: reader.into_records(),
            chunk_rows: chunk_rows.max(1),
            next_row: 0,
            done: false,
        })
    }

    pub fn header(&self) -> &StringRecord {
        &self.header
    }
}

impl<R: Read> Iterator for ChunkedRecords<R> {
    type Item = Result<RawChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut rows = Vec::with_capacity(self.chunk_rows.min(4096));
        while rows.len() < self.chunk_rows {
            match self.records.next() {
                Some(Ok(record)) => rows.push(record),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if rows.is_empty() {
            return None;
        }
        let chunk = RawChunk {
            first_row: self.next_row,
            rows,
        };
        self.next_row += chunk.len() as u64;
        Some(Ok(chunk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "A\tB\n1\tx\n2\ty\n3\tz\n4\tw\n5\tv\n";

    #[test]
    fn splits_into_bounded_chunks() {
        let chunks: Vec<RawChunk> = ChunkedRecords::tsv(TSV.as_bytes(), 2)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        let starts: Vec<u64> = chunks.iter().map(|c| c.first_row).collect();
        assert_eq!(starts, vec![0, 2, 4]);
        assert_eq!(&chunks[2].rows[0][1], "v");
    }

    #[test]
    fn header_only_input_yields_no_chunks() {
        let mut chunks = ChunkedRecords::tsv("A\tB\n".as_bytes(), 10).unwrap();
        assert_eq!(chunks.header().len(), 2);
        assert!(chunks.next().is_none());
    }

    #[test]
    fn ragged_row_is_an_error() {
        let input = "A,B\n1,2\n3\n";
        let results: Vec<Result<RawChunk>> =
            ChunkedRecords::csv(input.as_bytes(), 1).unwrap().collect();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn quoted_commas_survive_csv_parsing() {
        let input = "CITY,STATE\n\"Seattle, WA\",Washington\n";
        let chunk = ChunkedRecords::csv(input.as_bytes(), 10)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(&chunk.rows[0][0], "Seattle, WA");
    }
}
