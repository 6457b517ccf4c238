use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::app::ports::ObjectStore;
use crate::error::Result;
use crate::metrics::LoadMetrics;
use crate::pipeline::dataset::NormalizedDataset;
use crate::types::{HandoffRecord, PublishReceipt};

/// Publish the normalized dataset as `{object_key}.csv` in `bucket`.
///
/// Re-publishing under the same key replaces the previous object.
pub async fn load(
    store: &dyn ObjectStore,
    dataset: &NormalizedDataset,
    handoff: &HandoffRecord,
    bucket: &str,
) -> Result<PublishReceipt> {
    let key = handoff.transformed_object_key();
    let body = dataset.to_csv_bytes()?;
    let receipt = PublishReceipt {
        bucket: bucket.to_string(),
        key: key.clone(),
        bytes: body.len() as u64,
        sha256: hex::encode(Sha256::digest(&body)),
    };

    if let Err(e) = store.put(bucket, &key, body).await {
        error!("Upload of {}/{} failed: {}", bucket, key, e);
        LoadMetrics::record_upload_error();
        return Err(e);
    }
    LoadMetrics::record_upload(receipt.bytes);
    info!(
        bucket = %receipt.bucket,
        key = %receipt.key,
        bytes = receipt.bytes,
        sha256 = %receipt.sha256,
        "Published normalized dataset"
    );
    Ok(receipt)
}
