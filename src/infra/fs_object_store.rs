use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::app::ports::ObjectStore;
use crate::error::{PipelineError, Result};

/// Object storage on a local directory tree: `<root>/<bucket>/<key>`.
///
/// Writes go to a sibling temp file and are renamed into place, so readers
/// never observe a partially written object.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        validate_segment(bucket)?;
        let key_path = Path::new(key);
        let clean = key_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !clean {
            return Err(PipelineError::storage(format!("invalid object key '{}'", key)));
        }
        Ok(self.root.join(bucket).join(key_path))
    }

    async fn prepare(&self, bucket: &str, key: &str) -> Result<(PathBuf, PathBuf)> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".partial");
        Ok((path, PathBuf::from(tmp)))
    }
}

fn validate_segment(bucket: &str) -> Result<()> {
    if bucket.is_empty() || bucket.contains('/') || bucket.contains('\\') || bucket == ".." {
        return Err(PipelineError::storage(format!("invalid bucket name '{}'", bucket)));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let (path, tmp) = self.prepare(bucket, key).await?;
        fs::write(&tmp, &body).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Stored {} bytes at {}", body.len(), path.display());
        Ok(())
    }

    async fn put_file(&self, bucket: &str, key: &str, source: &Path) -> Result<()> {
        let (path, tmp) = self.prepare(bucket, key).await?;
        let copied = fs::copy(source, &tmp).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Copied {} bytes from {} to {}", copied, source.display(), path.display());
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.object_path(bucket, key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_overwrites_existing_object() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store.put("bkt", "a.csv", b"first".to_vec()).await.unwrap();
        store.put("bkt", "a.csv", b"second".to_vec()).await.unwrap();

        let got = store.get("bkt", "a.csv").await.unwrap();
        assert_eq!(got.as_deref(), Some(&b"second"[..]));
        assert!(!dir.path().join("bkt").join("a.csv.partial").exists());
    }

    #[tokio::test]
    async fn put_file_copies_verbatim() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("raw.csv");
        std::fs::write(&src, "A,B\n1,2\n").unwrap();

        let store = FsObjectStore::new(dir.path().join("root"));
        store.put_file("raw", "raw.csv", &src).await.unwrap();

        let got = store.get("raw", "raw.csv").await.unwrap().unwrap();
        assert_eq!(got, b"A,B\n1,2\n");
    }

    #[tokio::test]
    async fn missing_object_is_none() {
        let dir = tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        assert!(store.get("bkt", "nope.csv").await.unwrap().is_none());
    }

    #[test]
    fn rejects_keys_escaping_root() {
        let store = FsObjectStore::new("/tmp/root");
        assert!(store.object_path("bkt", "../etc/passwd").is_err());
        assert!(store.object_path("bkt", "/abs.csv").is_err());
        assert!(store.object_path("a/b", "x.csv").is_err());
        assert!(store.object_path("bkt", "nested/x.csv").is_ok());
    }
}
