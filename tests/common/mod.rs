//! Shared utilities for integration testing against a mock ledger.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use blz_client::{ClientConfig, Wallet};

// Well-known test private key (Anvil's first account)
#[allow(dead_code)]
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A request as seen by the mock ledger.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Requests received so far, in arrival order.
pub type Log = Arc<Mutex<Vec<Recorded>>>;

/// Start a programmable mock ledger on an ephemeral port. The handler gets
/// each request and answers with a status code and body.
#[allow(dead_code)]
pub async fn start_mock_ledger<F, Fut>(f: F) -> (SocketAddr, Log)
where
    F: Fn(Recorded) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        requests.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

async fn read_request(socket: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = buf[header_end..].to_vec();
    Some(Recorded { method, path, body })
}

/// Client config pointing at a mock ledger, with no retry backoff.
#[allow(dead_code)]
pub fn test_config(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig {
        endpoint: format!("http://{}", addr),
        uuid: "testdb".into(),
        address: "bluzelle1test".into(),
        request_timeout_secs: 5,
        ..ClientConfig::default()
    };
    config.broadcast.retry_interval_ms = 0;
    config
}

#[allow(dead_code)]
pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

/// Account body in the ledger's `{"result":{"value":..}}` shape.
#[allow(dead_code)]
pub fn account_body(account_number: u64, sequence: u64) -> String {
    format!(
        r#"{{"result":{{"value":{{"address":"bluzelle1test","account_number":"{}","sequence":"{}"}}}}}}"#,
        account_number, sequence
    )
}

/// Validate-endpoint template echoing a single message of `msg_type`.
#[allow(dead_code)]
pub fn template_body(msg_type: &str, gas: u64) -> String {
    format!(
        r#"{{"type":"cosmos-sdk/StdTx","value":{{"fee":{{"amount":[{{"amount":"0","denom":"ubnt"}}],"gas":"{}"}},"memo":"","msg":[{{"type":"{}","value":{{"Key":"k","Owner":"bluzelle1test","UUID":"testdb","Value":"v"}}}}],"signatures":null}}}}"#,
        gas, msg_type
    )
}

#[allow(dead_code)]
pub const SEQUENCE_MISMATCH_LOG: &str =
    "unauthorized: signature verification failed; verify correct account sequence and chain-id";

#[allow(dead_code)]
pub fn broadcast_body(code: i64, raw_log: &str, data: &str) -> String {
    serde_json::json!({
        "height": "12",
        "txhash": "ABCDEF",
        "code": code,
        "raw_log": raw_log,
        "data": data,
    })
    .to_string()
}
