use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;

/// Uploads JSON documents to a content-addressed pinning service.
#[derive(Debug, Clone)]
pub struct PinningClient {
    http: reqwest::Client,
    api_url: String,
    jwt: Option<String>,
    gateway_url: String,
}

#[derive(Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinningClient {
    pub fn new(api_url: impl Into<String>, jwt: Option<String>, gateway_url: impl Into<String>) -> Self {
        Self {
            http: super::http_client(),
            api_url: api_url.into(),
            jwt,
            gateway_url: gateway_url.into(),
        }
    }

    /// Pin `content` and return its content identifier.
    #[tracing::instrument(skip(self, content))]
    pub async fn pin_json(&self, name: &str, content: &Value) -> Result<String, AppError> {
        let url = format!("{}/pinning/pinJSONToIPFS", self.api_url.trim_end_matches('/'));
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": { "name": name },
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(jwt) = &self.jwt {
            request = request.bearer_auth(jwt);
        }

        let response = super::ensure_success("pinning service", request.send().await?).await?;
        let pinned: PinResponse = response.json().await?;
        if pinned.ipfs_hash.trim().is_empty() {
            return Err(AppError::UpstreamError("pinning service returned an empty CID".to_string()));
        }

        tracing::info!("Pinned {} as {}", name, pinned.ipfs_hash);
        Ok(pinned.ipfs_hash)
    }

    pub fn gateway_url(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url.trim_end_matches('/'), cid)
    }
}
