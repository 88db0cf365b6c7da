use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extra detail the booking server attaches to a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing)]
    pub debug: Option<String>,
}

/// The `error` member of a JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("rpc error {code}: {}", failure_detail(.message, .data))]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<RpcErrorData>,
}

impl RpcFailure {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The most specific human-readable message available.
    pub fn detail(&self) -> &str {
        failure_detail(&self.message, &self.data)
    }
}

fn failure_detail<'a>(message: &'a str, data: &'a Option<RpcErrorData>) -> &'a str {
    data.as_ref()
        .and_then(|data| data.message.as_deref())
        .filter(|detail| !detail.is_empty())
        .unwrap_or(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_server_data_message() {
        let failure: RpcFailure = serde_json::from_str(
            r#"{"code":200,"message":"Server Error","data":{"name":"builtins.ValueError","message":"invalid literal for int()","debug":"Traceback..."}}"#,
        )
        .expect("failure");
        assert_eq!(failure.detail(), "invalid literal for int()");
        assert_eq!(
            failure.to_string(),
            "rpc error 200: invalid literal for int()"
        );
    }

    #[test]
    fn detail_falls_back_to_top_level_message() {
        let failure = RpcFailure::new(404, "not found");
        assert_eq!(failure.detail(), "not found");
    }
}
