use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::app::ports::DatasetSource;
use crate::error::Result;

/// Reads a compressed dataset from local disk (`file://` prefix optional).
pub struct FileSource;

impl DatasetSource for FileSource {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        let file = File::open(Path::new(path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}
