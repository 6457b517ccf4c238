use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::metrics::TransformMetrics;
use crate::pipeline::chunked::ChunkedRecords;
use crate::pipeline::dataset::NormalizedDataset;
use crate::pipeline::normalize::{normalize_chunk, ColumnPlan};

/// Re-read the local artifact in chunks and build the normalized dataset.
pub async fn transform(artifact: PathBuf, chunk_rows: usize) -> Result<NormalizedDataset> {
    let started = Instant::now();
    let result =
        tokio::task::spawn_blocking(move || transform_blocking(&artifact, chunk_rows)).await?;
    TransformMetrics::record_duration(started.elapsed().as_secs_f64());
    if matches!(result, Err(PipelineError::Schema(_))) {
        TransformMetrics::record_schema_error();
    }
    result
}

pub fn transform_blocking(artifact: &Path, chunk_rows: usize) -> Result<NormalizedDataset> {
    info!("Transforming {}", artifact.display());
    let file = BufReader::new(File::open(artifact)?);
    let chunks = ChunkedRecords::csv(file, chunk_rows)?;

    // Checked once up front so no row is processed against an incomplete schema
    let plan = ColumnPlan::resolve(chunks.header())?;

    let mut dataset = NormalizedDataset::new();
    let mut rows_read = 0usize;
    for chunk in chunks {
        let chunk = chunk?;
        let normalized = normalize_chunk(&plan, &chunk)?;
        TransformMetrics::record_chunk(normalized.rows_read, normalized.rows_dropped);
        debug!(
            first_row = chunk.first_row,
            rows_read = normalized.rows_read,
            rows_dropped = normalized.rows_dropped,
            "Normalized chunk"
        );
        rows_read += normalized.rows_read;
        dataset.extend(normalized);
    }

    if rows_read == 0 {
        return Err(PipelineError::EmptyDataset(format!(
            "{} has no data rows",
            artifact.display()
        )));
    }
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset(format!(
            "all {} rows of {} were dropped for missing values",
            rows_read,
            artifact.display()
        )));
    }

    info!("Num of rows: {}", dataset.row_count());
    info!("Num of cols: {}", dataset.column_count());
    TransformMetrics::record_output_shape(dataset.row_count(), dataset.column_count());

    Ok(dataset)
}
