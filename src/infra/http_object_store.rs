use async_trait::async_trait;
use reqwest::{Body, Client, StatusCode};
use std::path::Path;
use tracing::{debug, info};

use crate::app::ports::ObjectStore;
use crate::error::{PipelineError, Result};

/// Object storage behind a plain HTTP API: `PUT/GET {endpoint}/{bucket}/{key}`.
///
/// Works against S3-compatible gateways and storage proxies that accept
/// bearer tokens. Request signing is left to the gateway.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key.trim_start_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn put_request(&self, bucket: &str, key: &str, body: Body, len: u64) -> reqwest::RequestBuilder {
        let req = self
            .client
            .put(self.object_url(bucket, key))
            .header(reqwest::header::CONTENT_TYPE, content_type_for(key))
            .header(reqwest::header::CONTENT_LENGTH, len)
            .body(body);
        self.authorize(req)
    }

    async fn send_put(&self, bucket: &str, key: &str, body: Body, len: u64) -> Result<()> {
        let url = self.object_url(bucket, key);
        let resp = self.put_request(bucket, key, body, len).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PipelineError::storage(format!(
                "upload to {} failed: {} - {}",
                url, status, body
            )));
        }
        info!("Uploaded {} bytes to {}", len, url);
        Ok(())
    }
}

fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".csv") {
        "text/csv; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let len = body.len() as u64;
        self.send_put(bucket, key, Body::from(body), len).await
    }

    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();
        debug!("Streaming {} ({} bytes) to {}/{}", path.display(), len, bucket, key);
        self.send_put(bucket, key, Body::from(file), len).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let url = self.object_url(bucket, key);
        let resp = self.authorize(self.client.get(&url)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp.error_for_status()?;
        Ok(Some(resp.bytes().await?.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_joins_segments() {
        let store = HttpObjectStore::new("http://localhost:9000/".to_string(), None);
        assert_eq!(
            store.object_url("redfin-raw-data-bkt", "redfin_data_01012024000000.csv"),
            "http://localhost:9000/redfin-raw-data-bkt/redfin_data_01012024000000.csv"
        );
    }

    #[test]
    fn put_is_a_plain_authorized_request() {
        let store = HttpObjectStore::new("http://localhost:9000".to_string(), Some("tok".to_string()));
        let req = store
            .put_request("bkt", "a.csv", Body::from(b"A\n".to_vec()), 2)
            .build()
            .unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:9000/bkt/a.csv");
        assert_eq!(req.url().query(), None);
        assert_eq!(req.headers()["authorization"], "Bearer tok");
        assert!(req.headers().get("apikey").is_none());
        assert_eq!(req.headers()["content-type"], "text/csv; charset=utf-8");
    }

    #[test]
    fn put_without_token_has_no_authorization() {
        let store = HttpObjectStore::new("http://localhost:9000".to_string(), None);
        let req = store
            .put_request("bkt", "a.bin", Body::from(Vec::new()), 0)
            .build()
            .unwrap();
        assert!(req.headers().get("authorization").is_none());
    }

    #[test]
    fn csv_keys_get_text_content_type() {
        assert_eq!(content_type_for("a.csv"), "text/csv; charset=utf-8");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
