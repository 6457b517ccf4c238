use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Metadata passed from the extract step to every later step.
///
/// `object_key` is fixed at extract time and reused unchanged for the
/// transformed object (`{object_key}.csv`) and the relocated raw artifact.
/// Extra fields written by other producers are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffRecord {
    pub output_file_path: PathBuf,
    pub object_key: String,
}

impl HandoffRecord {
    pub fn transformed_object_key(&self) -> String {
        format!("{}.csv", self.object_key)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Outcome of writing one object to remote storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    pub bucket: String,
    pub key: String,
    pub bytes: u64,
    /// Hex SHA-256 of the uploaded body
    pub sha256: String,
}
