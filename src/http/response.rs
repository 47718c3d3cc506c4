use std::collections::HashMap;
use url::Url;

/// Raw result of one GET against a view endpoint, before it is parsed into a record.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub url: Url,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub elapsed: chrono::Duration,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}
