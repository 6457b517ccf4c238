use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::app::ports::{DatasetSource, ObjectStore};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::pipeline::steps;
use crate::types::{HandoffRecord, PublishReceipt};

/// Drives the three steps against injected collaborators.
///
/// Every method is usable on its own (one process per step, handoff carried
/// in a file) or chained through [`RunUseCase::run`].
pub struct RunUseCase {
    config: Config,
    source: Arc<dyn DatasetSource>,
    store: Arc<dyn ObjectStore>,
    run_id: Uuid,
}

/// Summary of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub handoff: HandoffRecord,
    pub rows: usize,
    pub columns: usize,
    pub transformed: PublishReceipt,
    pub raw: PublishReceipt,
}

/// Result of the transform step: shape of the dataset and where it went
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub rows: usize,
    pub columns: usize,
    pub receipt: PublishReceipt,
}

impl RunUseCase {
    pub fn new(config: Config, source: Arc<dyn DatasetSource>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config,
            source,
            store,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract from the configured source URL, stamped with local time.
    pub async fn extract(&self) -> Result<HandoffRecord> {
        self.extract_at(Local::now().naive_local()).await
    }

    pub async fn extract_at(&self, now: NaiveDateTime) -> Result<HandoffRecord> {
        let span = info_span!("extract", run_id = %self.run_id, url = %self.config.source_url);
        steps::extract(
            self.source.clone(),
            self.config.source_url.clone(),
            self.config.artifact_dir.clone(),
            self.config.chunk_rows,
            now,
        )
        .instrument(span)
        .await
    }

    /// Normalize the artifact named by `handoff` and publish it.
    pub async fn transform(&self, handoff: &HandoffRecord) -> Result<TransformReport> {
        let span = info_span!("transform", run_id = %self.run_id, object_key = %handoff.object_key);
        async {
            let dataset =
                steps::transform(handoff.output_file_path.clone(), self.config.chunk_rows).await?;
            let receipt = steps::load(
                self.store.as_ref(),
                &dataset,
                handoff,
                &self.config.storage.transformed_bucket,
            )
            .await?;
            Ok::<_, PipelineError>(TransformReport {
                rows: dataset.row_count(),
                columns: dataset.column_count(),
                receipt,
            })
        }
        .instrument(span)
        .await
    }

    /// Move the raw artifact to the raw bucket.
    pub async fn load(&self, handoff: &HandoffRecord) -> Result<PublishReceipt> {
        let span = info_span!("load", run_id = %self.run_id, object_key = %handoff.object_key);
        steps::relocate(self.store.as_ref(), handoff, &self.config.storage.raw_bucket)
            .instrument(span)
            .await
    }

    /// All steps in order; the first failure stops the run.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_at(Local::now().naive_local()).await
    }

    pub async fn run_at(&self, now: NaiveDateTime) -> Result<RunReport> {
        info!(run_id = %self.run_id, "Starting run");
        let handoff = self.extract_at(now).await?;
        let transformed = self.transform(&handoff).await?;
        let raw = self.load(&handoff).await?;
        info!(run_id = %self.run_id, "Run finished");
        Ok(RunReport {
            run_id: self.run_id,
            handoff,
            rows: transformed.rows,
            columns: transformed.columns,
            transformed: transformed.receipt,
            raw,
        })
    }
}
