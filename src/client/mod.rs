//! WatchML Backend Client
//!
//! HTTP access to the ECG backend.
//!
//! ## Architecture
//!
//! - **AddressBook**: operation to URL mapping
//! - **Fetcher**: bounded-retry GET with JSON or text bodies
//! - **WatchClient**: the operations the app needs, wired to configuration
//!
//! Listing uses its own retry budget (zero by default) while key issuance
//! retries; both are configurable.

mod address;
mod error;
mod fetch;
mod types;

pub use address::{AddressBook, DEFAULT_API_BASE};
pub use error::{ClientError, ClientResult};
pub use fetch::{Backoff, Fetcher, RequestOptions, RetryPolicy};
pub use types::{EcgImage, EcgRecord, UploadReceipt};

use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::identity::{KeyIssuer, UserKey};
use crate::page::EcgSource;

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://127.0.0.1:5000")
    pub base_url: String,
    /// Retries when listing recordings
    pub list_retries: u32,
    /// Retries when requesting a new user key
    pub issue_retries: u32,
    /// Delay schedule between retries
    pub retry_policy: RetryPolicy,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            list_retries: 0,
            issue_retries: 3,
            retry_policy: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the WatchML ECG backend
#[derive(Debug, Clone)]
pub struct WatchClient {
    http: Client,
    fetcher: Fetcher,
    routes: AddressBook,
    config: ClientConfig,
}

impl WatchClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            fetcher: Fetcher::new(http.clone(), config.retry_policy),
            routes: AddressBook::new(config.base_url.clone()),
            http,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn routes(&self) -> &AddressBook {
        &self.routes
    }

    /// All recordings uploaded under `user_key`, in backend order
    pub async fn list_ecgs(&self, user_key: &str) -> ClientResult<Vec<EcgRecord>> {
        let url = self.routes.ecgs(user_key);
        let records: Vec<EcgRecord> = self
            .fetcher
            .fetch_json(&url, &RequestOptions::default(), self.config.list_retries)
            .await?;

        tracing::debug!(count = records.len(), "Loaded ECG list");
        Ok(records)
    }

    /// Raw body of the key-issuance endpoint
    pub async fn issue_user_key(&self) -> ClientResult<String> {
        self.fetcher
            .fetch_text(
                &self.routes.user_key(),
                &RequestOptions::default(),
                self.config.issue_retries,
            )
            .await
    }

    /// Upload a recording as the multipart `file` field.
    ///
    /// The backend accepts the upload asynchronously; the receipt only says
    /// the POST was accepted.
    pub async fn upload_ecg(&self, user_key: &str, path: &Path) -> ClientResult<UploadReceipt> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        tracing::info!(file = %file_name, size = bytes.len(), "Uploading ECG");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.clone()));
        let response = self
            .http
            .post(self.routes.upload_ecg(user_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::http(status));
        }

        Ok(UploadReceipt {
            file_name,
            status: status.as_u16(),
            body: response.text().await?,
            uploaded_at: chrono::Utc::now(),
        })
    }

    /// Rendered plot of a recording.
    ///
    /// The backend answers `ok` while it queues the render job and a JSON
    /// object with a base64 PNG once the image exists.
    pub async fn ecg_image(&self, user_key: &str, ecg_name: &str) -> ClientResult<EcgImage> {
        let body = self
            .fetcher
            .fetch_text(
                &self.routes.ecg_image(user_key, ecg_name),
                &RequestOptions::default(),
                self.config.list_retries,
            )
            .await?;

        parse_image_body(&body)
    }
}

#[derive(Deserialize)]
struct ImagePayload {
    image: String,
}

fn parse_image_body(body: &str) -> ClientResult<EcgImage> {
    if body.trim() == "ok" {
        return Ok(EcgImage::Pending);
    }
    let payload: ImagePayload = serde_json::from_str(body)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.image.trim())?;
    Ok(EcgImage::Ready(bytes))
}

#[async_trait]
impl KeyIssuer for WatchClient {
    async fn issue_key(&self) -> Result<String, ClientError> {
        self.issue_user_key().await
    }
}

#[async_trait]
impl EcgSource for WatchClient {
    async fn list_ecgs(&self, user_key: &UserKey) -> Result<Vec<EcgRecord>, ClientError> {
        WatchClient::list_ecgs(self, user_key.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_route, flaky_route, serve};
    use axum::{extract::Multipart, routing::post, Router};
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    fn test_config(base_url: String) -> ClientConfig {
        ClientConfig {
            base_url,
            retry_policy: RetryPolicy::Fixed(Duration::ZERO),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://test.marc-julian.de");
        assert_eq!(config.list_retries, 0);
        assert_eq!(config.issue_retries, 3);
    }

    #[test]
    fn test_parse_image_body() {
        assert_eq!(parse_image_body("ok").unwrap(), EcgImage::Pending);
        assert_eq!(
            parse_image_body(r#"{"image": "iVBORw=="}"#).unwrap(),
            EcgImage::Ready(vec![0x89, 0x50, 0x4e, 0x47])
        );
        assert!(matches!(
            parse_image_body(r#"{"image": "***"}"#),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(parse_image_body("<html>"), Err(ClientError::Parse(_))));
    }

    #[tokio::test]
    async fn test_list_ecgs_does_not_retry_by_default() {
        let (router, hits) = failing_route("/api/ecgs/:key", axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let client = WatchClient::new(test_config(serve(router).await)).unwrap();

        let result = client.list_ecgs("k").await;

        assert!(matches!(result, Err(ClientError::Http { status: 500, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_ecgs_parses_records() {
        let (router, _hits) = flaky_route(
            "/api/ecgs/:key",
            0,
            r#"[{"name": "a", "date": "2024-01-01", "values": [1]}, {"name": "b", "date": "2024-01-02", "values": []}]"#,
        );
        let client = WatchClient::new(test_config(serve(router).await)).unwrap();

        let records = client.list_ecgs("k").await.unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_issue_user_key_retries() {
        let (router, hits) = flaky_route("/api/userkey", 2, "\"freshkey\"");
        let client = WatchClient::new(test_config(serve(router).await)).unwrap();

        let body = client.issue_user_key().await.unwrap();

        assert_eq!(body, "\"freshkey\"");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_upload_sends_file_field() {
        let received: Arc<Mutex<Vec<(String, String, Vec<u8>)>>> = Arc::default();
        let sink = Arc::clone(&received);

        let router = Router::new().route(
            "/api/upload/ecgs/:key",
            post(move |mut multipart: Multipart| {
                let sink = Arc::clone(&sink);
                async move {
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        let file = field.file_name().unwrap_or_default().to_string();
                        let data = field.bytes().await.unwrap().to_vec();
                        sink.lock().unwrap().push((name, file, data));
                    }
                    "ok"
                }
            }),
        );
        let client = WatchClient::new(test_config(serve(router).await)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.zip");
        std::fs::write(&path, b"zipdata").unwrap();

        let receipt = client.upload_ecg("k", &path).await.unwrap();

        assert_eq!(receipt.status, 200);
        assert_eq!(receipt.body, "ok");
        assert_eq!(receipt.file_name, "export.zip");

        let fields = received.lock().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "file");
        assert_eq!(fields[0].1, "export.zip");
        assert_eq!(fields[0].2, b"zipdata");
    }

    /// Read one HTTP request off `socket`, honouring Content-Length.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        use tokio::io::AsyncReadExt;

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_upload_truncated_response_is_network_error() {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nshort")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });
        let client = WatchClient::new(test_config(base)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.zip");
        std::fs::write(&path, b"zipdata").unwrap();

        let result = client.upload_ecg("k", &path).await;

        assert!(matches!(result, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let client = WatchClient::new(test_config("http://127.0.0.1:9".to_string())).unwrap();
        let result = client
            .upload_ecg("k", Path::new("/definitely/not/here.zip"))
            .await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
