use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::model::AnalysisResult;

/// The external analysis capability: raw image bytes in, an
/// [`AnalysisResult`] or a failure message out.
#[async_trait]
pub trait SkinAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, AnalysisError>;
}

#[derive(Serialize)]
struct AnalyzeRequest {
    /// Base64 of the uploaded bytes
    image: String,
}

/// Analyzer backed by a model server reachable over HTTP.
///
/// The image is posted as `{"image": "<base64>"}` and the reply is decoded
/// as an [`AnalysisResult`]. Requests carry no timeout and are not retried.
pub struct RemoteAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteAnalyzer {
    pub fn new(endpoint: &str) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().build()?;

        Ok(RemoteAnalyzer {
            client,
            endpoint: endpoint.to_owned(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SkinAnalyzer for RemoteAnalyzer {
    async fn analyze(&self, image: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        debug!("Posting {} bytes to {}", image.len(), self.endpoint);

        let payload = AnalyzeRequest {
            image: base64::encode(image),
        };

        let resp = self.client.post(&self.endpoint).json(&payload).send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).trim().to_owned();
            return Err(if text.is_empty() {
                AnalysisError::new(format!("analysis backend returned {}", status))
            } else {
                AnalysisError::new(text)
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
