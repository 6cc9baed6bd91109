//! Remote page store — the single wire contract persistence depends on.
//!
//! `PUT {api_base}/pages/{id}` with `{ "blocks": [...] }` replaces the page's
//! whole block list. Any 2xx response with a parsable JSON body counts as
//! success; the body itself is ignored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use folio_store::Snapshot;
use folio_types::{Block, PageId};
use parking_lot::Mutex;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;

use crate::config::{ConfigError, SyncConfig};

/// Errors from a persistence call.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote store returned HTTP {status} for page {page_id}")]
    Status { status: u16, page_id: PageId },
    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("api base cannot hold a path: {0}")]
    InvalidBase(Url),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Injected by [`MemoryRemoteStore`].
    #[error("simulated failure: {0}")]
    Simulated(String),
}

/// Request body of `PUT /pages/{id}`.
#[derive(Debug, Serialize)]
pub struct PersistBody<'a> {
    pub blocks: &'a Snapshot,
}

/// Something that can durably store a page's block list.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Replace the page's blocks with `blocks`.
    async fn put_page(&self, page_id: &PageId, blocks: &Snapshot) -> Result<(), RemoteError>;
}

// ============================================================================
// HTTP
// ============================================================================

/// `reqwest`-backed remote store.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    api_base: Url,
}

impl HttpRemoteStore {
    pub fn new(config: &SyncConfig) -> Result<Self, RemoteError> {
        let api_base = config.api_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, api_base })
    }

    /// `{api_base}/pages/{id}`, with the id percent-encoded as one segment.
    pub fn page_url(&self, page_id: &PageId) -> Result<Url, RemoteError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidBase(self.api_base.clone()))?
            .pop_if_empty()
            .push("pages")
            .push(page_id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn put_page(&self, page_id: &PageId, blocks: &Snapshot) -> Result<(), RemoteError> {
        let url = self.page_url(page_id)?;
        let response = self
            .client
            .put(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&PersistBody { blocks })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                page_id: page_id.clone(),
            });
        }

        let body = response.bytes().await?;
        let _: serde_json::Value = serde_json::from_slice(&body)?;
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// In-memory remote store for tests and `--dry-run`.
///
/// Records every call in order and keeps the last write per page. Can be told
/// to fail and to take a fixed amount of (tokio) time per call.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    calls: Mutex<Vec<(PageId, Vec<Block>)>>,
    pages: Mutex<HashMap<PageId, Vec<Block>>>,
    failing: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay each call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Every successful call, in arrival order.
    pub fn calls(&self) -> Vec<(PageId, Vec<Block>)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// What the store currently holds for a page.
    pub fn page(&self, page_id: &PageId) -> Option<Vec<Block>> {
        self.pages.lock().get(page_id).cloned()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn put_page(&self, page_id: &PageId, blocks: &Snapshot) -> Result<(), RemoteError> {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Simulated(format!("put {page_id} rejected")));
        }
        let blocks = blocks.to_vec();
        self.calls.lock().push((page_id.clone(), blocks.clone()));
        self.pages.lock().insert(page_id.clone(), blocks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{BlockId, BlockTag};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn page_id(s: &str) -> PageId {
        PageId::parse(s).unwrap()
    }

    fn store_for(base: &str) -> HttpRemoteStore {
        let config = SyncConfig {
            api_base: base.to_string(),
            ..SyncConfig::default()
        };
        HttpRemoteStore::new(&config).unwrap()
    }

    #[test]
    fn test_page_url() {
        let store = store_for("http://localhost:8080");
        assert_eq!(
            store.page_url(&page_id("abc123")).unwrap().as_str(),
            "http://localhost:8080/pages/abc123"
        );
    }

    #[test]
    fn test_page_url_keeps_base_path() {
        let store = store_for("https://example.com/api/");
        assert_eq!(
            store.page_url(&page_id("p1")).unwrap().as_str(),
            "https://example.com/api/pages/p1"
        );
    }

    #[test]
    fn test_page_url_encodes_id() {
        let store = store_for("http://localhost");
        let url = store.page_url(&page_id("a/b?c")).unwrap();
        assert_eq!(url.path(), "/pages/a%2Fb%3Fc");
    }

    #[test]
    fn test_persist_body_shape() {
        let snap = Snapshot::from_blocks(vec![Block::with_id(
            BlockId::parse("b1").unwrap(),
            BlockTag::Heading1,
            "Title",
        )])
        .unwrap();
        let json = serde_json::to_value(PersistBody { blocks: &snap }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "blocks": [{ "id": "b1", "tag": "h1", "content": "Title" }] })
        );
    }

    /// Accept one connection, read the whole request, answer with `status`
    /// and `body`. Resolves to the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let task = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8(request).unwrap()
        });
        (base, task)
    }

    /// Headers received and `content-length` bytes of body after them.
    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + len
    }

    fn title_page() -> Snapshot {
        Snapshot::from_blocks(vec![Block::with_id(
            BlockId::parse("b1").unwrap(),
            BlockTag::Heading1,
            "Title",
        )])
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_sends_json_to_page_url() {
        let (base, server) = serve_once("200 OK", r#"{"ok":true}"#).await;
        let store = store_for(&base);

        store.put_page(&page_id("p1"), &title_page()).await.unwrap();

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let head = head.to_ascii_lowercase();
        assert!(head.starts_with("put /pages/p1 http/1.1\r\n"), "request line: {head}");
        assert!(head.contains("\r\naccept: application/json"));
        assert!(head.contains("\r\ncontent-type: application/json"));

        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "blocks": [{ "id": "b1", "tag": "h1", "content": "Title" }] })
        );
    }

    #[tokio::test]
    async fn test_put_accepts_any_2xx_json() {
        let (base, server) = serve_once("201 Created", "{}").await;
        let store = store_for(&base);
        assert!(store.put_page(&page_id("p1"), &title_page()).await.is_ok());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_put_error_status() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let store = store_for(&base);

        let result = store.put_page(&page_id("p1"), &title_page()).await;
        assert!(
            matches!(&result, Err(RemoteError::Status { status: 500, page_id }) if page_id.as_str() == "p1"),
            "got {result:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_put_non_json_body() {
        let (base, server) = serve_once("200 OK", "<html>ok</html>").await;
        let store = store_for(&base);

        let result = store.put_page(&page_id("p1"), &title_page()).await;
        assert!(matches!(result, Err(RemoteError::Decode(_))), "got {result:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_records_calls() {
        let store = MemoryRemoteStore::new();
        let snap = Snapshot::from_blocks(vec![Block::new(BlockTag::Paragraph, "x")]).unwrap();

        store.put_page(&page_id("p"), &snap).await.unwrap();
        assert_eq!(store.call_count(), 1);
        assert_eq!(store.page(&page_id("p")).unwrap(), snap.to_vec());
    }

    #[tokio::test]
    async fn test_memory_store_failure() {
        let store = MemoryRemoteStore::new();
        store.set_failing(true);
        let result = store.put_page(&page_id("p"), &Snapshot::empty()).await;
        assert!(matches!(result, Err(RemoteError::Simulated(_))));
        assert_eq!(store.call_count(), 0);
        assert!(store.page(&page_id("p")).is_none());
    }
}
