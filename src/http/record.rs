use serde::Deserialize;
use std::collections::BTreeMap;

/// Result of one command run, as served by `/api/commands/<id>`.
///
/// The command description is flattened into the top level of the payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandRecord {
    pub id: String,
    pub description: String,
    pub command: String,
    pub args: Option<Vec<String>>,
    pub now: String,
    pub command_duration: Option<String>,
    pub command_output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyInfo {
    pub id: String,
    pub description: String,
    pub url: String,
}

/// Result of one proxied GET, as served by `/api/proxies/<id>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyRecord {
    pub proxy_info: ProxyInfo,
    pub now: String,
    pub proxy_duration: Option<String>,
    pub proxy_status: String,
    pub proxy_resp_headers: Option<BTreeMap<String, Vec<String>>>,
    pub proxy_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_record_missing_fields_default_to_empty() {
        let record: CommandRecord =
            serde_json::from_value(json!({"command": "uptime", "unknown": 1})).unwrap();

        assert_eq!(record.command, "uptime");
        assert_eq!(record.args, None);
        assert_eq!(record.now, "");
        assert_eq!(record.command_duration, None);
        assert_eq!(record.command_output, "");
    }

    #[test]
    fn test_proxy_record_nested_info() {
        let record: ProxyRecord = serde_json::from_value(json!({
            "proxyInfo": {"id": "ip", "description": "Public IP", "url": "https://ifconfig.me"},
            "now": "T2",
            "proxyStatus": "200 OK",
            "proxyRespHeaders": {"Content-Type": ["text/plain"]},
            "proxyOutput": "1.2.3.4"
        }))
        .unwrap();

        assert_eq!(record.proxy_info.url, "https://ifconfig.me");
        assert_eq!(record.proxy_status, "200 OK");
        assert_eq!(
            record
                .proxy_resp_headers
                .as_ref()
                .and_then(|h| h.get("Content-Type"))
                .map(|v| v.as_slice()),
            Some(&["text/plain".to_string()][..])
        );
    }

    #[test]
    fn test_null_args_are_absent() {
        let record: CommandRecord =
            serde_json::from_value(json!({"command": "ls", "args": null})).unwrap();
        assert_eq!(record.args, None);
    }
}
