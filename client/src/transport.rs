//! Executes the plain-data requests built by `dia-core`.

use async_trait::async_trait;
use dia_core::{DiaError, HttpRequest, HttpResponse};

type Result<T> = std::result::Result<T, DiaError>;

/// One HTTP round-trip. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response.
    ///
    /// Any HTTP status is returned as data; only network-level failures
    /// are errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport with the library's default timeouts.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DiaError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Reuse an existing connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut req = self.client.post(&request.url);
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = req
            .body(request.body)
            .send()
            .await
            .map_err(|e| DiaError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| DiaError::Transport(e.to_string()))?;

        Ok(HttpResponse::new(status, body))
    }
}
