use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::FetchError;

/// Client presenting itself as an ordinary browser, with the configured timeout
pub fn create_client(api: &ApiConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_str(&api.accept)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&api.accept_language)?);
    headers.insert(REFERER, HeaderValue::from_str(&api.referer)?);

    let client = ClientBuilder::new()
        .user_agent(api.user_agent.as_str())
        .default_headers(headers)
        .timeout(api.timeout())
        .build()?;

    Ok(client)
}

/// Single-attempt GET decoding a JSON body. Non-2xx responses are failures.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let final_url = response.url().to_string();
    debug!("GET {} -> {}", final_url, status);

    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: final_url,
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        url: final_url,
        source,
    })
}
