use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    StatusError { status: u16, url: String },

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
