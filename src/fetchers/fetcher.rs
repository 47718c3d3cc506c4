use crate::http::FetchedResponse;
use crate::{ViewError, ViewResult};
use async_trait::async_trait;
use log::debug;
use url::Url;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues one GET and returns whatever came back, whatever the status.
    async fn fetch_single(&self, url: Url) -> ViewResult<FetchedResponse>;
    fn box_clone(&self) -> Box<dyn Fetcher>;

    /// Issues one GET and rejects anything but a 2xx response.
    async fn fetch(&self, url: Url) -> ViewResult<FetchedResponse> {
        let response = self.fetch_single(url).await?;
        debug!(
            "Received response: url={}, status={}, content_type={}, body_length={}, elapsed={}ms",
            response.url,
            response.status,
            response.content_type().unwrap_or("-"),
            response.body.len(),
            response.elapsed.num_milliseconds()
        );

        if !response.is_success() {
            return Err(ViewError::StatusError {
                status: response.status,
                url: response.url.to_string(),
            });
        }

        Ok(response)
    }
}

impl Clone for Box<dyn Fetcher> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
