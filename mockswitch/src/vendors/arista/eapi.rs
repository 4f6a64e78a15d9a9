//! The Arista eAPI adapter boundary.
//!
//! eAPI is JSON-RPC 2.0 at `/command-api`: a `runCmds` call carries a
//! list of CLI commands executed in order against an enabled session.
//! The HTTP server lives outside this crate; the adapter decodes the
//! request, drives the same EOS processors the interactive CLI uses, and
//! packages per-command results. A failing command aborts the batch with
//! error 1002 and the results collected so far.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::modes::{AristaDefault, AristaEnabled};
use super::show;
use crate::config::SharedConfig;
use crate::engine::{
    Action, CommandProcessor, Context, OutputBuffer, Resolution, SessionState, resolve,
};

/// A decoded eAPI request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EapiRequest {
    /// Always `"2.0"`.
    pub jsonrpc: String,

    /// Only `runCmds` is supported.
    pub method: String,

    /// Command batch.
    pub params: EapiParams,

    /// Request id, echoed back verbatim.
    pub id: Value,
}

/// `runCmds` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EapiParams {
    /// Protocol version; `1` is the only one that exists.
    #[serde(default = "default_version")]
    pub version: u32,

    /// CLI commands to execute in order.
    pub cmds: Vec<String>,

    /// `json` (default) or `text`.
    #[serde(default)]
    pub format: Option<String>,
}

fn default_version() -> u32 {
    1
}

/// An eAPI response, already in wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EapiResponse {
    /// Always `"2.0"`.
    pub jsonrpc: String,

    /// Request id.
    pub id: Value,

    /// Per-command results, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Value>>,

    /// JSON-RPC error, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EapiError>,
}

/// The JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EapiError {
    /// eAPI uses 1002 for CLI command failures.
    pub code: i64,

    /// Human-readable failure description.
    pub message: String,

    /// Results for the commands that succeeded before the failure.
    pub data: Vec<Value>,
}

/// The eAPI adapter for one switch.
pub struct EapiAdapter {
    config: SharedConfig,
}

impl EapiAdapter {
    /// Create an adapter over the shared switch configuration.
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Handle a raw request body; always returns a JSON string.
    pub async fn handle_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<EapiRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(err) => EapiResponse {
                jsonrpc: "2.0".to_string(),
                id: Value::Null,
                result: None,
                error: Some(EapiError {
                    code: -32700,
                    message: format!("Parse error: {err}"),
                    data: Vec::new(),
                }),
            },
        };
        serde_json::to_string(&response).expect("eAPI responses always serialize")
    }

    /// Handle a decoded request.
    pub async fn handle(&self, request: EapiRequest) -> EapiResponse {
        let id = request.id.clone();

        if request.method != "runCmds" {
            return EapiResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(EapiError {
                    code: -32601,
                    message: format!("Method not found: {}", request.method),
                    data: Vec::new(),
                }),
            };
        }

        let json_format = request.params.format.as_deref() != Some("text");
        let total = request.params.cmds.len();

        // Commands run against an enabled session; the whole batch holds
        // the config lock, like one interactive session typing quickly.
        let mut config = self.config.lock().await;
        let mut stack: Vec<Box<dyn CommandProcessor>> =
            vec![Box::new(AristaDefault), Box::new(AristaEnabled)];
        let mut state = SessionState::default();

        let mut results: Vec<Value> = Vec::new();
        for (index, command) in request.params.cmds.iter().enumerate() {
            // Structured rendering for the commands eAPI models; text
            // otherwise.
            if json_format && is_show_vlan(command) {
                results.push(show::vlan_json(&config));
                continue;
            }

            let mut output = OutputBuffer::default();
            let mut failed = false;
            {
                let mut ctx = Context {
                    config: &mut config,
                    output: &mut output,
                    state: &mut state,
                };
                let top = stack.last_mut().expect("eAPI stack is never empty");
                match top.process(&mut ctx, command) {
                    Action::Handled => {}
                    Action::Unhandled => {
                        top.unknown_command(&mut ctx, command);
                        failed = true;
                    }
                    Action::Push(child) => stack.push(child),
                    Action::Replace(successor) => {
                        stack.pop();
                        stack.push(successor);
                    }
                    Action::Pop | Action::Terminate => {
                        stack.pop();
                    }
                }
            }
            let text = output.take().join("\n");

            if failed {
                return EapiResponse {
                    jsonrpc: "2.0".to_string(),
                    id,
                    result: None,
                    error: Some(EapiError {
                        code: 1002,
                        message: format!(
                            "CLI command {} of {} '{}' failed: invalid command",
                            index + 1,
                            total,
                            command
                        ),
                        data: results,
                    }),
                };
            }

            results.push(json!({ "output": text }));
        }

        EapiResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(results),
            error: None,
        }
    }
}

/// Whether a command is `show vlan` (allowing the usual abbreviations).
fn is_show_vlan(command: &str) -> bool {
    let mut words = command.split_whitespace();
    let (Some(first), Some(second), None) = (words.next(), words.next(), words.next()) else {
        return false;
    };
    matches!(resolve(&["show"], first), Resolution::Match(_))
        && matches!(resolve(&["vlan"], second), Resolution::Match(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::SwitchConfiguration;

    fn adapter() -> EapiAdapter {
        let mut config = SwitchConfiguration::new("eos");
        config.seed_ports(vec![crate::config::Port::physical("Ethernet1")]);
        EapiAdapter::new(Arc::new(tokio::sync::Mutex::new(config)))
    }

    fn request(cmds: &[&str], format: Option<&str>) -> EapiRequest {
        EapiRequest {
            jsonrpc: "2.0".to_string(),
            method: "runCmds".to_string(),
            params: EapiParams {
                version: 1,
                cmds: cmds.iter().map(|c| c.to_string()).collect(),
                format: format.map(|f| f.to_string()),
            },
            id: json!(1),
        }
    }

    #[tokio::test]
    async fn test_configure_then_show_vlan() {
        let adapter = adapter();
        let response = adapter
            .handle(request(
                &["configure", "vlan 123", "name shizzle", "exit", "exit", "show vlan"],
                None,
            ))
            .await;

        assert!(response.error.is_none());
        let results = response.result.unwrap();
        assert_eq!(results.len(), 6);
        assert_eq!(results[5]["vlans"]["123"]["name"], "shizzle");
    }

    #[tokio::test]
    async fn test_failing_command_reports_1002() {
        let adapter = adapter();
        let response = adapter
            .handle(request(&["show running-config", "frobnicate"], Some("text")))
            .await;

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, 1002);
        assert_eq!(
            error.message,
            "CLI command 2 of 2 'frobnicate' failed: invalid command"
        );
        // The first command's result survives in the error data.
        assert_eq!(error.data.len(), 1);
        assert!(
            error.data[0]["output"]
                .as_str()
                .unwrap()
                .contains("hostname eos")
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let adapter = adapter();
        let body = adapter.handle_json("{not json").await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let adapter = adapter();
        let mut req = request(&[], None);
        req.method = "runScript".to_string();
        let response = adapter.handle(req).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
