use chrono::NaiveDateTime;
use csv::{StringRecord, Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::constants::{ARTIFACT_PREFIX, ARTIFACT_TIMESTAMP_FORMAT};
use crate::error::Result;
use crate::pipeline::chunked::RawChunk;

/// `redfin_data_<DDMMYYYYHHMMSS>`, shared by the local file and every object key
pub fn artifact_stem(now: NaiveDateTime) -> String {
    format!("{}_{}", ARTIFACT_PREFIX, now.format(ARTIFACT_TIMESTAMP_FORMAT))
}

pub fn artifact_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}.csv", stem))
}

/// Append-only CSV writer for the local raw artifact.
///
/// The header goes out with the first chunk only. The file is created with
/// `create_new`, so an artifact from an earlier run is never overwritten.
pub struct ArtifactWriter {
    path: PathBuf,
    writer: Writer<BufWriter<File>>,
    header: StringRecord,
    header_written: bool,
    rows_written: u64,
}

impl ArtifactWriter {
    pub fn create(path: &Path, header: StringRecord) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            header,
            header_written: false,
            rows_written: 0,
        })
    }

    pub fn write_chunk(&mut self, chunk: &RawChunk) -> Result<()> {
        if !self.header_written {
            self.writer.write_record(&self.header)?;
            self.header_written = true;
        }
        for row in &chunk.rows {
            self.writer.write_record(row)?;
        }
        self.rows_written += chunk.len() as u64;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and close, returning the artifact path.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}
