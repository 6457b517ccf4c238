use chrono::NaiveDateTime;
use flate2::read::MultiGzDecoder;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::app::ports::DatasetSource;
use crate::error::{PipelineError, Result};
use crate::metrics::ExtractMetrics;
use crate::pipeline::artifact::{artifact_path, artifact_stem, ArtifactWriter};
use crate::pipeline::chunked::ChunkedRecords;
use crate::types::HandoffRecord;

/// Stream the gzip TSV at `url` into `<artifact_dir>/redfin_data_<ts>.csv`.
///
/// Runs on a blocking thread. A source without data rows is an error, and
/// any failure removes the partially written artifact.
pub async fn extract(
    source: Arc<dyn DatasetSource>,
    url: String,
    artifact_dir: PathBuf,
    chunk_rows: usize,
    now: NaiveDateTime,
) -> Result<HandoffRecord> {
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        extract_blocking(source.as_ref(), &url, &artifact_dir, chunk_rows, now)
    })
    .await?;

    ExtractMetrics::record_duration(started.elapsed().as_secs_f64());
    if result.is_err() {
        ExtractMetrics::record_failure();
    }
    result
}

pub fn extract_blocking(
    source: &dyn DatasetSource,
    url: &str,
    artifact_dir: &Path,
    chunk_rows: usize,
    now: NaiveDateTime,
) -> Result<HandoffRecord> {
    let object_key = artifact_stem(now);
    let path = artifact_path(artifact_dir, &object_key);
    info!("Extracting {} into {}", url, path.display());

    let stream = source.open(url)?;
    let decoder = MultiGzDecoder::new(BufReader::new(stream));
    let chunks = ChunkedRecords::tsv(decoder, chunk_rows)?;
    if chunks.header().is_empty() {
        return Err(PipelineError::EmptyDataset(format!("{} has no header row", url)));
    }

    let mut writer = ArtifactWriter::create(&path, chunks.header().clone())?;
    let written = write_all_chunks(&mut writer, chunks);
    let rows = writer.rows_written();
    let finished = writer.finish();

    if let Err(e) = written.and(finished.map(|_| ())) {
        discard_artifact(&path);
        return Err(e);
    }
    if rows == 0 {
        discard_artifact(&path);
        return Err(PipelineError::EmptyDataset(format!("{} has no data rows", url)));
    }

    if let Ok(meta) = std::fs::metadata(&path) {
        ExtractMetrics::record_artifact_bytes(meta.len());
    }
    info!(rows, object_key = %object_key, "Extract finished");

    Ok(HandoffRecord {
        output_file_path: path,
        object_key,
    })
}

fn write_all_chunks<R: std::io::Read>(
    writer: &mut ArtifactWriter,
    chunks: ChunkedRecords<R>,
) -> Result<()> {
    for chunk in chunks {
        let chunk = chunk?;
        writer.write_chunk(&chunk)?;
        ExtractMetrics::record_chunk_written(chunk.len());
        debug!(
            first_row = chunk.first_row,
            rows = chunk.len(),
            "Wrote chunk to artifact"
        );
    }
    Ok(())
}

fn discard_artifact(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not remove incomplete artifact {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::file_source::FileSource;
    use chrono::NaiveDate;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    fn gzip(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        enc.write_all(body.as_bytes()).unwrap();
        enc.finish().unwrap();
        path.to_string_lossy().into_owned()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn converts_tsv_to_single_csv_artifact() {
        let dir = tempdir().unwrap();
        let url = gzip(dir.path(), "src.tsv.gz", "A\tCITY\n1\tSeattle, WA\n2\tTacoma\n3\tSpokane\n");
        let out = dir.path().join("artifacts");

        let handoff = extract_blocking(&FileSource, &url, &out, 2, now()).unwrap();

        assert_eq!(handoff.object_key, "redfin_data_02012024030405");
        assert_eq!(
            handoff.output_file_path,
            out.join("redfin_data_02012024030405.csv")
        );
        let written = std::fs::read_to_string(&handoff.output_file_path).unwrap();
        assert_eq!(written, "A,CITY\n1,\"Seattle, WA\"\n2,Tacoma\n3,Spokane\n");
    }

    #[test]
    fn header_only_source_is_empty_dataset() {
        let dir = tempdir().unwrap();
        let url = gzip(dir.path(), "src.tsv.gz", "A\tB\n");

        let err = extract_blocking(&FileSource, &url, dir.path(), 10, now()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
        assert!(!dir.path().join("redfin_data_02012024030405.csv").exists());
    }

    #[test]
    fn corrupt_stream_is_fatal_and_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let result = extract_blocking(
            &FileSource,
            path.to_str().unwrap(),
            dir.path(),
            10,
            now(),
        );
        assert!(result.is_err());
        assert!(!dir.path().join("redfin_data_02012024030405.csv").exists());
    }

    #[test]
    fn missing_source_is_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.gz");
        let err = extract_blocking(&FileSource, missing.to_str().unwrap(), dir.path(), 10, now())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
