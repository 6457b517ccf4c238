use csv::WriterBuilder;
use std::io::Write;

use crate::constants::output_header;
use crate::error::Result;
use crate::pipeline::normalize::{NormalizedChunk, NormalizedRow};

/// All normalized rows of one run, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDataset {
    rows: Vec<NormalizedRow>,
}

impl NormalizedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk after every previously appended chunk.
    pub fn extend(&mut self, chunk: NormalizedChunk) {
        self.rows.extend(chunk.rows);
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        output_header().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Comma-separated, header first, no index column.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record(output_header())?;
        for row in &self.rows {
            writer.write_record(row.to_fields())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

impl FromIterator<NormalizedChunk> for NormalizedDataset {
    fn from_iter<I: IntoIterator<Item = NormalizedChunk>>(iter: I) -> Self {
        let mut dataset = NormalizedDataset::new();
        for chunk in iter {
            dataset.extend(chunk);
        }
        dataset
    }
}
