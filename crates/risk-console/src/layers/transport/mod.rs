mod error;
mod http;

use async_trait::async_trait;
use predict_protocol::{PredictRequest, PredictResponse};

pub(crate) use error::TransportError;
pub(crate) use http::{join_base_path, HttpTransport};

#[cfg(test)]
pub(crate) use http::stub;

/// Carries one prediction request to the backend.
#[async_trait]
pub(crate) trait PredictTransport: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError>;
}
