//! Shared HTTP plumbing.

use crate::error::{CatalogError, Result};
use crate::types::ApiErrorBody;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Build the HTTP client used by both API clients.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Tunedeck/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(CatalogError::Request)
}

/// Validate and normalize a base URL (no trailing slash).
pub(crate) fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed).map_err(|e| CatalogError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Decode a successful response, or turn an error status into `CatalogError::Api`.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);

        Err(CatalogError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
