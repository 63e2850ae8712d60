//! Shared HTTP plumbing for the backends

use parking_lot::Mutex;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::REQUEST_TIMEOUT;
use crate::error::{ProviderError, Result};

/// Connection pool created on first use and dropped by [`LazyClient::close`]
#[derive(Debug, Default)]
pub(crate) struct LazyClient {
    inner: Mutex<Option<Client>>,
}

impl LazyClient {
    /// Returns the pooled client, building it if needed
    pub(crate) fn get(&self) -> Result<Client> {
        let mut guard = self.inner.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        *guard = Some(client.clone());
        Ok(client)
    }

    pub(crate) fn close(&self) {
        self.inner.lock().take();
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }
}

/// Checks the status code and deserializes a JSON body
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ProviderError::api_error(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse JSON response: {}", e)))
}
