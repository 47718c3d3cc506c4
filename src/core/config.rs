use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::view::{CommandView, ProxyView};
use crate::{ViewError, ViewResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandInfo {
    pub id: String,
    pub description: String,
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyEntry {
    pub id: String,
    pub description: String,
    pub url: String,
}

/// On-disk shape of the configuration file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    base_url: Option<String>,
    interval_milliseconds: Option<u64>,
    request_timeout_milliseconds: Option<u64>,
    auto_refresh: Option<bool>,
    discard_stale: Option<bool>,
    #[serde(default)]
    headers: Vec<(String, String)>,
    #[serde(default)]
    output_files: Vec<PathBuf>,
    #[serde(default)]
    commands: Vec<CommandInfo>,
    #[serde(default)]
    proxies: Vec<ProxyEntry>,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub base_url: Url,
    pub interval: Duration,
    pub request_timeout: Duration,
    pub auto_refresh: bool,
    pub discard_stale: bool,
    pub headers: Vec<(String, String)>,
    pub output_files: Vec<PathBuf>,
    pub commands: Vec<CommandInfo>,
    pub proxies: Vec<ProxyEntry>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            auto_refresh: true,
            discard_stale: true,
            headers: Vec::new(),
            output_files: Vec::new(),
            commands: Vec::new(),
            proxies: Vec::new(),
        }
    }
}

/// A view picked by name, either `commands/<id>` or `proxies/<id>`.
#[derive(Debug, Clone)]
pub enum SelectedView {
    Command(CommandView),
    Proxy(ProxyView),
}

impl ViewerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ViewResult<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_json(&source)
    }

    pub fn from_json(source: &str) -> ViewResult<Self> {
        let file: ConfigFile = serde_json::from_str(source)?;
        let defaults = Self::default();

        let base_url = match file.base_url {
            Some(url) => Url::parse(&url)?,
            None => defaults.base_url,
        };

        let config = Self {
            base_url,
            interval: file
                .interval_milliseconds
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            request_timeout: file
                .request_timeout_milliseconds
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            auto_refresh: file.auto_refresh.unwrap_or(defaults.auto_refresh),
            discard_stale: file.discard_stale.unwrap_or(defaults.discard_stale),
            headers: file.headers,
            output_files: file.output_files,
            commands: file.commands,
            proxies: file.proxies,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ViewResult<()> {
        if self.interval.is_zero() {
            return Err(ViewError::ConfigError(
                "intervalMilliseconds must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ViewError::ConfigError(
                "requestTimeoutMilliseconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_auto_refresh(mut self, auto_refresh: bool) -> Self {
        self.auto_refresh = auto_refresh;
        self
    }

    pub fn with_discard_stale(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn command_view(&self, id: &str) -> ViewResult<CommandView> {
        self.commands
            .iter()
            .find(|c| c.id == id)
            .map(|c| CommandView::new(&c.id, &c.command, &c.args))
            .ok_or_else(|| ViewError::UnknownView(format!("commands/{}", id)))
    }

    pub fn proxy_view(&self, id: &str) -> ViewResult<ProxyView> {
        self.proxies
            .iter()
            .find(|p| p.id == id)
            .map(|p| ProxyView::new(&p.id, &p.url))
            .ok_or_else(|| ViewError::UnknownView(format!("proxies/{}", id)))
    }

    pub fn select_view(&self, name: &str) -> ViewResult<SelectedView> {
        match name.split_once('/') {
            Some(("commands", id)) => self.command_view(id).map(SelectedView::Command),
            Some(("proxies", id)) => self.proxy_view(id).map(SelectedView::Proxy),
            _ => Err(ViewError::UnknownView(name.to_string())),
        }
    }

    /// Full URL for a view's API path. A path prefix on the base URL is kept.
    pub fn endpoint(&self, api_path: &str) -> ViewResult<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(api_path.trim_start_matches('/'))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::View;

    const SAMPLE: &str = r#"{
        "baseUrl": "http://pi.local:8080",
        "intervalMilliseconds": 2000,
        "outputFiles": ["/tmp/status.txt"],
        "commands": [
            {"id": "df", "description": "disk usage", "command": "df", "args": ["-h"]}
        ],
        "proxies": [
            {"id": "ip", "description": "public ip", "url": "https://ifconfig.me"}
        ]
    }"#;

    #[test]
    fn test_load_with_defaults() {
        let config = ViewerConfig::from_json(SAMPLE).unwrap();

        assert_eq!(config.base_url.as_str(), "http://pi.local:8080/");
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.auto_refresh);
        assert!(config.discard_stale);
        assert_eq!(config.output_files, vec![PathBuf::from("/tmp/status.txt")]);
    }

    #[test]
    fn test_select_views() {
        let config = ViewerConfig::from_json(SAMPLE).unwrap();

        match config.select_view("commands/df").unwrap() {
            SelectedView::Command(view) => {
                assert_eq!(view.command_text(), "df -h");
                assert_eq!(
                    config.endpoint(&view.api_path()).unwrap().as_str(),
                    "http://pi.local:8080/api/commands/df"
                );
            }
            other => panic!("unexpected view {:?}", other),
        }

        match config.select_view("proxies/ip").unwrap() {
            SelectedView::Proxy(view) => assert_eq!(view.request_text(), "GET https://ifconfig.me"),
            other => panic!("unexpected view {:?}", other),
        }

        assert!(matches!(
            config.select_view("commands/nope"),
            Err(ViewError::UnknownView(_))
        ));
        assert!(matches!(
            config.select_view("df"),
            Err(ViewError::UnknownView(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let config = ViewerConfig::default()
            .with_base_url(Url::parse("https://example.com/pi").unwrap());

        assert_eq!(
            config.endpoint("/api/proxies/ip").unwrap().as_str(),
            "https://example.com/pi/api/proxies/ip"
        );
    }

    #[test]
    fn test_builder_timeout_and_headers() {
        let config = ViewerConfig::default()
            .with_timeout(Duration::from_millis(250))
            .with_headers(vec![("x-pollview-token", "abc"), ("accept-language", "en")]);

        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(
            config.headers,
            vec![
                ("x-pollview-token".to_string(), "abc".to_string()),
                ("accept-language".to_string(), "en".to_string()),
            ]
        );
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.with_timeout(Duration::ZERO).validate(),
            Err(ViewError::ConfigError(_))
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ViewerConfig::from_json(r#"{"intervalMilliseconds": 0}"#);
        assert!(matches!(result, Err(ViewError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ViewerConfig::from_json("{"),
            Err(ViewError::JsonError(_))
        ));
    }
}
