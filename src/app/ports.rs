use async_trait::async_trait;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

// Extract-side port. Blocking: callers run it on a blocking thread.
pub trait DatasetSource: Send + Sync {
    /// Open the (still compressed) source as a byte stream.
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>>;
}

// Load-side port
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` under `bucket/key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// Write the contents of a local file under `bucket/key`.
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let body = tokio::fs::read(path).await?;
        self.put(bucket, key, body).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>>;
}
