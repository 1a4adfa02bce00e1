// Shared reqwest plumbing for the Docs API and the OAuth token endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::core::docs::DocsError;

/// Builds a client with a fixed per-request timeout. A call that hangs past
/// it surfaces as a transport error; nothing is retried.
pub fn build_client(timeout: Duration) -> Result<Client, DocsError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(transport_error)
}

pub fn transport_error(err: reqwest::Error) -> DocsError {
    DocsError::Transport(err.to_string())
}

/// Checks the status and decodes the JSON body. Non-2xx responses become
/// `DocsError::Http` with the raw body attached; an empty 2xx body decodes as `{}`.
pub async fn read_json<T: DeserializeOwned>(
    method: &str,
    url: &str,
    response: Response,
) -> Result<T, DocsError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(DocsError::Http {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let raw = if body.trim().is_empty() { "{}" } else { body.as_str() };
    Ok(serde_json::from_str(raw)?)
}
