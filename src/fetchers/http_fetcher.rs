use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::Fetcher;
use crate::http::FetchedResponse;
use crate::ViewResult;

const DEFAULT_USER_AGENT: &str = concat!("pollview/", env!("CARGO_PKG_VERSION"));
const ACCEPT_JSON: &str = "application/json";

/// Fetches view endpoints over HTTP. Every call builds its own request; only
/// the connection pool inside the client is shared.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> ViewResult<Self> {
        Self::with_headers(timeout, &[])
    }

    pub fn with_headers(timeout: Duration, headers: &[(String, String)]) -> ViewResult<Self> {
        let mut header_map = header::HeaderMap::new();
        header_map.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(DEFAULT_USER_AGENT),
        );

        for (key, value) in headers {
            let name = header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                crate::ViewError::ConfigError(format!("invalid header name {:?}: {}", key, e))
            })?;
            let value = header::HeaderValue::from_str(value).map_err(|e| {
                crate::ViewError::ConfigError(format!("invalid header value for {}: {}", key, e))
            })?;
            header_map.insert(name, value);
        }

        let client = ClientBuilder::new()
            .default_headers(header_map)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_single(&self, url: Url) -> ViewResult<FetchedResponse> {
        let start_time = Utc::now();
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, ACCEPT_JSON)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);
        let body = response.text().await?;

        Ok(FetchedResponse {
            url,
            status,
            headers,
            body,
            elapsed: Utc::now() - start_time,
        })
    }

    fn box_clone(&self) -> Box<dyn Fetcher> {
        Box::new(self.clone())
    }
}
