use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::ports::ObjectStore;
use crate::error::{PipelineError, Result};

/// In-memory object storage for development/testing
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    puts: Arc<Mutex<usize>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes, overwrites included
    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let objects = self.objects.lock().unwrap();
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        if bucket.is_empty() || key.is_empty() {
            return Err(PipelineError::storage("bucket and key must not be empty"));
        }
        debug!("Stored {} bytes at {}/{}", body.len(), bucket, key);
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        *self.puts.lock().unwrap() += 1;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let objects = self.objects.lock().unwrap();
        Ok(objects.get(&(bucket.to_string(), key.to_string())).cloned())
    }
}
