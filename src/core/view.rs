use serde::de::DeserializeOwned;

use crate::http::{CommandRecord, ProxyRecord};

/// One kind of status page: knows its endpoint, its placeholder, and how to
/// turn a fetched record into the text block shown to the user.
pub trait View: Send + Sync + 'static {
    type Record: DeserializeOwned + Send;

    fn name(&self) -> String;
    fn api_path(&self) -> String;
    fn placeholder(&self) -> String;
    fn format(&self, record: &Self::Record) -> String;
}

#[derive(Debug, Clone)]
pub struct CommandView {
    id: String,
    command_text: String,
}

impl CommandView {
    pub fn new(id: impl Into<String>, command: &str, args: &[String]) -> Self {
        Self {
            id: id.into(),
            command_text: join_command(command, args),
        }
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }
}

fn join_command<S: AsRef<str>>(command: &str, args: &[S]) -> String {
    let mut text = command.to_string();
    for arg in args {
        text.push(' ');
        text.push_str(arg.as_ref());
    }
    text
}

impl View for CommandView {
    type Record = CommandRecord;

    fn name(&self) -> String {
        format!("commands/{}", self.id)
    }

    fn api_path(&self) -> String {
        format!("/api/commands/{}", self.id)
    }

    fn placeholder(&self) -> String {
        format!("Now:\n\nCommand Duration:\n\n$ {}", self.command_text)
    }

    fn format(&self, record: &CommandRecord) -> String {
        let args = record.args.as_deref().unwrap_or_default();

        let mut text = format!("Now: {}\n\n", record.now);
        if let Some(duration) = &record.command_duration {
            text.push_str(&format!("Command Duration: {}\n\n", duration));
        }
        text.push_str(&format!("$ {}\n\n", join_command(&record.command, args)));
        text.push_str(&record.command_output);
        text
    }
}

#[derive(Debug, Clone)]
pub struct ProxyView {
    id: String,
    request_text: String,
}

impl ProxyView {
    pub fn new(id: impl Into<String>, url: &str) -> Self {
        Self {
            id: id.into(),
            request_text: format!("GET {}", url),
        }
    }

    pub fn request_text(&self) -> &str {
        &self.request_text
    }
}

impl View for ProxyView {
    type Record = ProxyRecord;

    fn name(&self) -> String {
        format!("proxies/{}", self.id)
    }

    fn api_path(&self) -> String {
        format!("/api/proxies/{}", self.id)
    }

    fn placeholder(&self) -> String {
        format!(
            "Now:\n\nProxy Duration:\n\n{}\n\nResponse Status:\n\nResponse Headers:",
            self.request_text
        )
    }

    fn format(&self, record: &ProxyRecord) -> String {
        let mut text = format!("Now: {}\n\n", record.now);
        if let Some(duration) = &record.proxy_duration {
            text.push_str(&format!("Proxy Duration: {}\n\n", duration));
        }
        text.push_str(&format!("GET {}\n\n", record.proxy_info.url));
        text.push_str(&format!("Response Status: {}\n\n", record.proxy_status));
        if let Some(headers) = &record.proxy_resp_headers {
            let pretty = serde_json::to_string_pretty(headers).unwrap_or_default();
            text.push_str(&format!("Response Headers:\n{}\n\n", pretty));
        }
        text.push_str(&record.proxy_output);
        text
    }
}
