//! Shared HTTP plumbing for providers

use std::time::Duration;

use nextcrm_core::LlmError;
use serde::de::DeserializeOwned;

pub(crate) fn build_client(provider: &str, timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::network(provider, format!("failed to build HTTP client: {}", e)))
}

pub(crate) fn map_transport_error(provider: &str, err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        LlmError::network(provider, err.to_string())
    }
}

/// Send a bearer-authenticated JSON POST and return the raw body of a 2xx reply
pub(crate) async fn post_json<B: serde::Serialize + ?Sized>(
    client: &reqwest::Client,
    provider: &str,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<String, LlmError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| map_transport_error(provider, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| map_transport_error(provider, e))?;

    if !status.is_success() {
        return Err(LlmError::Api {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}

pub(crate) fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, LlmError> {
    serde_json::from_str(body).map_err(|e| LlmError::invalid_response(provider, e.to_string()))
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
