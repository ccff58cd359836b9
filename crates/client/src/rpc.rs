//! NEAR JSON-RPC chain client.
//!
//! View calls go through the `query` method with
//! `request_type = "call_function"`. Arguments travel base64-encoded and
//! the contract's return value comes back as a byte array holding JSON.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;

use crate::chain::ChainClient;
use crate::error::ClientError;

/// Chain client talking to a NEAR RPC node.
pub struct RpcChainClient {
    rpc_url: String,
}

impl RpcChainClient {
    pub fn new(rpc_url: &str) -> Self {
        RpcChainClient {
            rpc_url: rpc_url.to_string(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Build the JSON-RPC body for a view call at final finality.
    pub fn build_view_request(
        contract_id: &str,
        method: &str,
        args: &serde_json::Value,
    ) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": "query",
            "params": {
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract_id,
                "method_name": method,
                "args_base64": BASE64.encode(args.to_string()),
            }
        })
    }

    /// Extract the contract's JSON return value from a JSON-RPC response.
    pub fn decode_view_response(
        contract_id: &str,
        method: &str,
        response: &serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        if let Some(err) = response.get("error") {
            return Err(ClientError::Rpc {
                code: err.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
                message: rpc_error_message(err),
            });
        }

        let result = response.get("result").ok_or_else(|| ClientError::Decode {
            what: "rpc response".to_string(),
            message: "neither 'result' nor 'error' present".to_string(),
        })?;

        // Failed view calls come back as a successful RPC with an error string.
        if let Some(message) = result.get("error").and_then(|e| e.as_str()) {
            return Err(ClientError::Contract {
                contract_id: contract_id.to_string(),
                method: method.to_string(),
                message: message.to_string(),
            });
        }

        let bytes: Vec<u8> = result
            .get("result")
            .and_then(|r| r.as_array())
            .ok_or_else(|| ClientError::Decode {
                what: format!("{} result", method),
                message: "missing result bytes".to_string(),
            })?
            .iter()
            .map(|b| {
                b.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| ClientError::Decode {
                        what: format!("{} result", method),
                        message: format!("invalid byte {}", b),
                    })
            })
            .collect::<Result<_, _>>()?;

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            what: format!("{} result", method),
            message: e.to_string(),
        })
    }
}

fn rpc_error_message(err: &serde_json::Value) -> String {
    let message = err
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("unknown error");
    match err.get("data") {
        Some(serde_json::Value::String(data)) => format!("{}: {}", message, data),
        Some(data) if !data.is_null() => format!("{}: {}", message, data),
        _ => message.to_string(),
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        let body = Self::build_view_request(contract_id, method, &args);
        let url = self.rpc_url.clone();
        debug!("view {}.{} via {}", contract_id, method, url);

        let response = tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            let response = agent
                .post(&url)
                .header("content-type", "application/json")
                .send_json(&body)
                .map_err(|e| ClientError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            response
                .into_body()
                .read_json::<serde_json::Value>()
                .map_err(|e| ClientError::Decode {
                    what: "rpc response".to_string(),
                    message: format!("failed to parse response as JSON: {}", e),
                })
        })
        .await
        .map_err(|e| ClientError::Join(e.to_string()))??;

        Self::decode_view_response(contract_id, method, &response)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes_of(value: &serde_json::Value) -> serde_json::Value {
        value.to_string().into_bytes().into_iter().collect()
    }

    #[test]
    fn request_encodes_args_as_base64() {
        let req = RpcChainClient::build_view_request(
            "streaming.r-v2.near",
            "get_stream",
            &json!({"stream_id": "abc"}),
        );
        assert_eq!(req["method"], "query");
        assert_eq!(req["params"]["request_type"], "call_function");
        assert_eq!(req["params"]["account_id"], "streaming.r-v2.near");
        assert_eq!(req["params"]["method_name"], "get_stream");
        let decoded = BASE64
            .decode(req["params"]["args_base64"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, br#"{"stream_id":"abc"}"#);
    }

    #[test]
    fn decodes_result_bytes() {
        let payload = json!({"id": "abc", "balance": "10"});
        let response = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "result": { "result": bytes_of(&payload), "logs": [], "block_height": 1 }
        });
        let value = RpcChainClient::decode_view_response("c", "get_stream", &response).unwrap();
        assert_eq!(value, payload);
    }

    #[test]
    fn contract_failure_is_surfaced() {
        let response = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "result": { "error": "wasm execution failed with error: stream not found", "logs": [] }
        });
        let err = RpcChainClient::decode_view_response("c", "get_stream", &response).unwrap_err();
        match err {
            ClientError::Contract { method, message, .. } => {
                assert_eq!(method, "get_stream");
                assert!(message.contains("stream not found"));
            }
            other => panic!("expected Contract error, got {:?}", other),
        }
    }

    #[test]
    fn rpc_error_is_surfaced() {
        let response = json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "error": { "code": -32000, "message": "Server error", "data": "account does not exist" }
        });
        let err = RpcChainClient::decode_view_response("c", "m", &response).unwrap_err();
        match err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "Server error: account does not exist");
            }
            other => panic!("expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_bytes_are_a_decode_error() {
        let response = json!({"result": {"result": [300]}});
        assert!(matches!(
            RpcChainClient::decode_view_response("c", "m", &response),
            Err(ClientError::Decode { .. })
        ));
        let response = json!({"result": {"result": []}});
        assert!(RpcChainClient::decode_view_response("c", "m", &response).is_err());
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_error() {
        let client = RpcChainClient::new("http://127.0.0.1:9");
        let result = client.view("c", "m", json!({})).await;
        assert!(matches!(result, Err(ClientError::Transport { .. })));
    }
}
