use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use predict_protocol::{PredictRequest, PredictResponse};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use super::{PredictTransport, TransportError};
use crate::config::EndpointConfig;

const LOG_BODY_LIMIT: usize = 512;
static HTTP_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn join_base_path(base: &str, path: &str) -> Result<String, String> {
    if base.trim().is_empty() {
        return Err("base_url is empty".to_string());
    }
    let normalized_base = base.trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

/// JSON-over-HTTP transport for `POST /predict`.
pub(crate) struct HttpTransport {
    client: Client,
    url: String,
    request_timeout: Option<Duration>,
}

impl HttpTransport {
    pub(crate) fn new(endpoint: &EndpointConfig) -> Result<Self, TransportError> {
        let url = endpoint.url().map_err(TransportError::Request)?;
        let client = Client::builder()
            .connect_timeout(endpoint.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            url,
            request_timeout: endpoint.request_timeout(),
        })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PredictTransport for HttpTransport {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let payload =
            serde_json::to_vec(request).map_err(|err| TransportError::Request(err.to_string()))?;
        tracing::debug!(
            request_id,
            url = %self.url,
            body_len = payload.len(),
            "predict http POST start"
        );

        let mut builder = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| {
            tracing::debug!(
                request_id,
                timeout = err.is_timeout(),
                connect = err.is_connect(),
                error = ?err,
                "predict http POST send error"
            );
            TransportError::from(err)
        })?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            request_id,
            status = status.as_u16(),
            body_len = body.len(),
            body = %escape_log_body(&String::from_utf8_lossy(&body)),
            "predict http POST response"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: escape_log_body(&String::from_utf8_lossy(&body)),
            });
        }
        PredictResponse::from_slice(&body).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

fn escape_log_body(body: &str) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let escaped = body.replace('\n', "\\n").replace('\r', "\\r");
    if escaped.chars().count() <= LOG_BODY_LIMIT {
        return escaped;
    }
    let mut out: String = escaped.chars().take(LOG_BODY_LIMIT).collect();
    out.push_str("...");
    out
}
