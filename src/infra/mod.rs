pub mod file_source;
pub mod fs_object_store;
pub mod http_object_store;
pub mod http_source;
pub mod in_memory_store;

use std::sync::Arc;

use crate::app::ports::{DatasetSource, ObjectStore};
use crate::config::{StorageBackend, StorageConfig};
use crate::error::{PipelineError, Result};

/// Pick a source adapter from the location scheme: http(s) URLs are streamed
/// over the network, anything else is read from the local filesystem.
pub fn source_for(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(http_source::ReqwestSource::new())
    } else {
        Box::new(file_source::FileSource)
    }
}

pub fn object_store_for(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Filesystem => Ok(Arc::new(fs_object_store::FsObjectStore::new(
            config.root.clone(),
        ))),
        StorageBackend::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                PipelineError::Config("http storage backend requires storage.endpoint".into())
            })?;
            Ok(Arc::new(http_object_store::HttpObjectStore::new(
                endpoint,
                config.token.clone(),
            )))
        }
    }
}
