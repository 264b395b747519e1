//! Shared utilities for integration testing: a programmable JSON-RPC node.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use alloy::primitives::{keccak256, Bytes};

// Anvil accounts 0 and 1.
pub const KEY_0: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const ADDR_0: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const ADDR_1: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// What the node answers to one call.
#[allow(dead_code)]
pub enum RpcReply {
    Result(Value),
    Error(i64, String),
    /// Never answer.
    Hang,
}

/// A running mock node.
pub struct MockNode {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of calls received for `method`.
    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|m| *m == method).count()
    }
}

/// Default answers of a healthy node on `chain_id`.
#[allow(dead_code)]
pub fn healthy_reply(chain_id: u64, method: &str, params: &Value) -> RpcReply {
    match method {
        "eth_chainId" => RpcReply::Result(json!(format!("{:#x}", chain_id))),
        "eth_getTransactionCount" => RpcReply::Result(json!("0x0")),
        "eth_gasPrice" => RpcReply::Result(json!("0x3b9aca00")),
        "eth_sendRawTransaction" => {
            let raw: Bytes = serde_json::from_value(params[0].clone()).unwrap();
            RpcReply::Result(json!(keccak256(&raw)))
        }
        other => RpcReply::Error(-32601, format!("method {} not found", other)),
    }
}

/// Start a node that answers every JSON-RPC call with `handler`.
pub async fn start_mock_node<F>(handler: F) -> MockNode
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = calls.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        serve_connection(socket, handler, recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockNode { addr, calls }
}

/// A local address nothing listens on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve_connection<F>(mut socket: TcpStream, handler: Arc<F>, calls: Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    while let Some(body) = read_request(&mut socket).await {
        let request: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(_) => return,
        };
        let method = request["method"].as_str().unwrap_or_default().to_string();
        calls.lock().unwrap().push(method.clone());

        let reply = handler(&method, &request["params"]);
        let response = match reply {
            RpcReply::Result(result) => {
                json!({"jsonrpc": "2.0", "id": request["id"], "result": result})
            }
            RpcReply::Error(code, message) => json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": {"code": code, "message": message}
            }),
            RpcReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return;
            }
        };

        let payload = response.to_string();
        let http = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            payload.len(),
            payload
        );
        if socket.write_all(http.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Read one HTTP request and return its body.
async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[body_start..body_start + content_length].to_vec())
}
