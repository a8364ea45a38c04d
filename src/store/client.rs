//! Record store client bootstrap.

use std::time::Duration;
use thiserror::Error;

/// Result type for store client bootstrap.
pub type Result<T> = std::result::Result<T, StoreClientError>;

/// Errors returned while creating a record store client.
#[derive(Debug, Error)]
pub enum StoreClientError {
    #[error("store deployment URL is not configured; set `sync.deployment_url` or pass --store-url")]
    MissingDeploymentUrl,
    #[error("store deployment URL must start with http:// or https:// (got `{0}`)")]
    InvalidDeploymentUrl(String),
    #[error("failed to initialize HTTP client: {0}")]
    Http(reqwest::Error),
}

/// HTTP client bound to one store deployment.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    deployment_url: String,
}

/// Builds a store client for the configured deployment URL.
pub fn create_client(deployment_url: Option<&str>) -> Result<StoreClient> {
    let url = deployment_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(StoreClientError::MissingDeploymentUrl)?;

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(StoreClientError::InvalidDeploymentUrl(url.to_owned()));
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(StoreClientError::Http)?;

    Ok(StoreClient {
        http,
        deployment_url: url.trim_end_matches('/').to_owned(),
    })
}

impl StoreClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Endpoint URL for a hosted function kind (`query` or `mutation`).
    pub fn function_url(&self, kind: &str) -> String {
        format!("{}/api/{kind}", self.deployment_url)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreClientError, create_client};

    #[test]
    fn missing_url_is_a_configuration_error() {
        let error = create_client(None).unwrap_err();
        assert!(matches!(error, StoreClientError::MissingDeploymentUrl));

        let error = create_client(Some("   ")).unwrap_err();
        assert!(matches!(error, StoreClientError::MissingDeploymentUrl));
    }

    #[test]
    fn scheme_is_validated() {
        let error = create_client(Some("ftp://example.invalid")).unwrap_err();
        assert!(matches!(error, StoreClientError::InvalidDeploymentUrl(_)));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = create_client(Some("https://pad.example.convex.cloud/")).unwrap();
        assert_eq!(
            client.function_url("query"),
            "https://pad.example.convex.cloud/api/query"
        );
    }
}
