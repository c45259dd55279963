use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;

/// License attached to a registered IP asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseTerms {
    pub commercial_use: bool,
    /// Percent of derivative revenue owed to the asset owner
    pub commercial_rev_share: f64,
    /// Fee, in the chain's native token, to mint a license
    pub minting_fee: f64,
}

impl Default for LicenseTerms {
    fn default() -> Self {
        Self {
            commercial_use: true,
            commercial_rev_share: 10.0,
            minting_fee: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRegistrationRequest {
    pub metadata_uri: String,
    pub metadata: Value,
    pub license_terms: LicenseTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpRegistration {
    pub ip_id: String,
    pub contract_address: String,
    pub chain_id: i64,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// Client for the IP-asset registration service.
#[derive(Debug, Clone)]
pub struct IpRegistryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl IpRegistryClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: super::http_client(),
            base_url: base_url.into(),
            api_key,
        }
    }

    #[tracing::instrument(skip(self, request), fields(metadata_uri = %request.metadata_uri))]
    pub async fn register(&self, request: &IpRegistrationRequest) -> Result<IpRegistration, AppError> {
        let url = format!("{}/ip-assets", self.base_url.trim_end_matches('/'));

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = super::ensure_success("IP registry", builder.send().await?).await?;
        let registration: IpRegistration = response.json().await?;
        tracing::info!(
            "Registered IP asset {} on chain {}",
            registration.ip_id,
            registration.chain_id
        );
        Ok(registration)
    }
}
