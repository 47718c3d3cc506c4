use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::sleep;
use url::Url;

use super::Fetcher;
use crate::http::FetchedResponse;
use crate::ViewResult;

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<std::time::Duration>,
    /// When set, the call fails as if the connection was refused.
    pub error: Option<String>,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
            error: None,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            error: Some(message.into()),
            ..Self::ok("")
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Replays scripted responses in order, wrapping around at the end.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Vec<MockResponse>>,
    calls: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "MockFetcher needs at least one response");
        Self {
            responses: Arc::new(responses),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_single(&self, url: Url) -> ViewResult<FetchedResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let response = &self.responses[index % self.responses.len()];
        let start_time = Utc::now();

        if let Some(delay) = response.delay {
            sleep(delay).await;
        }

        if let Some(message) = &response.error {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, message.clone()).into());
        }

        Ok(FetchedResponse {
            url,
            status: response.status,
            headers: HashMap::new(),
            body: response.body.clone(),
            elapsed: Utc::now() - start_time,
        })
    }

    fn box_clone(&self) -> Box<dyn Fetcher> {
        Box::new(self.clone())
    }
}
