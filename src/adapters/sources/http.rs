//! Shared HTTP plumbing for the source adapters.
//!
//! Thin wrapper over `reqwest` that owns a base URL and a per-request
//! timeout, maps every transport, status, and decode failure into
//! `SourceError::Unavailable`, and keeps response-body context in the
//! error message so a failed source renders with its raw reason.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::SourceError;

/// HTTP client bound to one source's base URL.
#[derive(Debug, Clone)]
pub(crate) struct SourceHttp {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl SourceHttp {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Join the base URL and a path without doubling slashes.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `path` (plus optional query pairs) and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let mut request = self.http.get(&url).timeout(self.timeout);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|err| transport_error(&url, &err))?;
        decode_json(&url, response).await
    }

    /// POST a JSON body to `path` and decode a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| transport_error(&url, &err))?;
        decode_json(&url, response).await
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Unavailable(format!("request to {url} timed out"))
    } else {
        SourceError::Unavailable(format!("request to {url} failed: {err}"))
    }
}

async fn decode_json<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Unavailable(format!(
            "{url} returned {status}: {body}"
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| SourceError::Unavailable(format!("decoding response from {url}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let http = SourceHttp::new(
            Client::new(),
            "https://api.example.com/",
            Duration::from_secs(1),
        );
        assert_eq!(http.url("/tokens"), "https://api.example.com/tokens");
        assert_eq!(http.url("tokens"), "https://api.example.com/tokens");
    }
}
