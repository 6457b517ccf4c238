use reqwest::blocking::Client;
use std::io::Read;
use tracing::{debug, info};

use crate::app::ports::DatasetSource;
use crate::error::Result;

/// Streams the remote resource body without buffering it.
///
/// The blocking client is built per `open` call, on the caller's blocking
/// thread. Building it on an async runtime thread panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestSource;

impl ReqwestSource {
    pub fn new() -> Self {
        Self
    }

    fn client() -> Result<Client> {
        // The payload is a .gz file, not a gzip transfer encoding; decoding
        // happens downstream so the client must hand over raw bytes.
        let client = Client::builder()
            .no_gzip()
            .no_deflate()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(client)
    }
}

impl DatasetSource for ReqwestSource {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>> {
        info!("Opening remote dataset {}", location);
        let resp = Self::client()?.get(location).send()?.error_for_status()?;
        debug!(
            status = resp.status().as_u16(),
            content_length = ?resp.content_length(),
            "Remote dataset responded"
        );
        Ok(Box::new(resp))
    }
}
