use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{error, info};

use crate::app::ports::ObjectStore;
use crate::error::{PipelineError, Result};
use crate::metrics::LoadMetrics;
use crate::types::{HandoffRecord, PublishReceipt};

/// Move the raw artifact into `raw_bucket` and delete the local copy.
///
/// The object key is the artifact's file name and the bytes are uploaded
/// verbatim. The local file is removed only after the upload succeeded.
pub async fn relocate(
    store: &dyn ObjectStore,
    handoff: &HandoffRecord,
    raw_bucket: &str,
) -> Result<PublishReceipt> {
    let path = handoff.output_file_path.clone();
    let key = raw_object_key(&path)?;

    let digest_path = path.clone();
    let (bytes, sha256) = tokio::task::spawn_blocking(move || digest_file(&digest_path)).await??;

    if let Err(e) = store.put_file(raw_bucket, &key, &path).await {
        error!("Relocation of {} failed: {}", path.display(), e);
        LoadMetrics::record_upload_error();
        return Err(e);
    }
    LoadMetrics::record_upload(bytes);

    tokio::fs::remove_file(&path).await?;
    LoadMetrics::record_relocated();
    info!(
        "Moved {} to {}/{} ({} bytes)",
        path.display(),
        raw_bucket,
        key,
        bytes
    );

    Ok(PublishReceipt {
        bucket: raw_bucket.to_string(),
        key,
        bytes,
        sha256,
    })
}

fn raw_object_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PipelineError::storage(format!("artifact path has no file name: {}", path.display()))
        })
}

fn digest_file(path: &Path) -> Result<(u64, String)> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let bytes = std::io::copy(&mut reader, &mut hasher)?;
    Ok((bytes, hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_file_name() {
        let key = raw_object_key(Path::new("/home/etl/redfin_data_01012024000000.csv")).unwrap();
        assert_eq!(key, "redfin_data_01012024000000.csv");
        assert!(raw_object_key(Path::new("/")).is_err());
    }
}
