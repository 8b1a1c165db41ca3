//! Shared utilities for integration testing.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use bond_gateway::blockchain::{BlockchainClient, Wallet};
use bond_gateway::config::GatewayConfig;
use bond_gateway::http::HttpServer;

/// Anvil's first well-known account key; safe for tests only.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Hash the mock node assigns to every broadcast transaction.
pub const MOCK_TX_HASH: &str =
    "0x1111111111111111111111111111111111111111111111111111111111111111";

/// Address the mock node's `eth_call` returns, ABI-encoded as a single word.
pub const MOCK_BOND_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Start a mock upstream that always answers with the given status and body.
pub async fn start_mock_upstream(addr: SocketAddr, status: u16, body: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
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
}

/// Start a mock Ethereum JSON-RPC node that answers the five methods the
/// submit pipeline issues. `receipt_status` picks the receipt's outcome
/// ("0x1" or "0x0"); `None` leaves every transaction pending forever.
pub async fn start_mock_rpc(addr: SocketAddr, receipt_status: Option<&'static str>) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(serve_rpc_connection(socket, receipt_status));
                }
                Err(_) => break,
            }
        }
    });
}

/// Serve JSON-RPC requests on one keep-alive connection until the peer hangs up.
async fn serve_rpc_connection(mut socket: TcpStream, receipt_status: Option<&'static str>) {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        let request = match read_json_request(&mut socket, &mut buf).await {
            Some(request) => request,
            None => return,
        };
        let method = request["method"].as_str().unwrap_or_default().to_string();
        let body = json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": rpc_result(&method, receipt_status),
        })
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        if socket.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Read one HTTP request off the socket and parse its JSON body. `buf`
/// carries bytes of the next pipelined request between calls.
async fn read_json_request(socket: &mut TcpStream, buf: &mut Vec<u8>) -> Option<Value> {
    loop {
        if let Some(header_end) = find_subslice(buf, b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())?;
            let body_start = header_end + 4;
            if buf.len() >= body_start + content_length {
                let request =
                    serde_json::from_slice(&buf[body_start..body_start + content_length]).ok()?;
                buf.drain(..body_start + content_length);
                return Some(request);
            }
        }
        let mut chunk = [0u8; 4096];
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rpc_result(method: &str, receipt_status: Option<&'static str>) -> Value {
    match method {
        "eth_chainId" => json!("0x4268"),
        "eth_blockNumber" => json!("0x10"),
        "eth_getTransactionCount" => json!("0x0"),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_sendRawTransaction" => json!(MOCK_TX_HASH),
        "eth_call" => json!(format!(
            "0x000000000000000000000000{}",
            MOCK_BOND_ADDRESS[2..].to_lowercase()
        )),
        "eth_getTransactionReceipt" => match receipt_status {
            Some(status) => json!({
                "type": "0x0",
                "status": status,
                "cumulativeGasUsed": "0x5208",
                "logs": [],
                "logsBloom": format!("0x{}", "0".repeat(512)),
                "transactionHash": MOCK_TX_HASH,
                "transactionIndex": "0x0",
                "blockHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "blockNumber": "0x1",
                "gasUsed": "0x5208",
                "effectiveGasPrice": "0x3b9aca00",
                "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "to": "0x0000000000000000000000000000000000000001",
                "contractAddress": null,
            }),
            None => Value::Null,
        },
        _ => Value::Null,
    }
}

/// Gateway config pointing at an unreachable RPC endpoint and the given
/// upstream, with short timeouts so failures surface quickly.
pub fn test_config(bind: SocketAddr, bonds_url: String) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind.to_string();
    config.blockchain.rpc_url = "http://127.0.0.1:1".to_string();
    config.blockchain.rpc_timeout_secs = 1;
    config.blockchain.receipt_timeout_secs = 2;
    config.contracts.identity_token = "0x0000000000000000000000000000000000000001".to_string();
    config.contracts.bond_factory = "0x0000000000000000000000000000000000000002".to_string();
    config.bonds_api.url = bonds_url;
    config.bonds_api.timeout_secs = 2;
    config.timeouts.request_secs = 10;
    config
}

/// Spin up the gateway on `bind` and return once it accepts connections.
pub async fn start_gateway(config: GatewayConfig) {
    let bind = config.listener.bind_address.clone();
    let client = BlockchainClient::new(config.blockchain.clone()).unwrap();
    let identity_minter = Wallet::from_private_key(TEST_PRIVATE_KEY, "identity-minter").unwrap();
    let bond_issuer = Wallet::from_private_key(TEST_PRIVATE_KEY, "bond-issuer").unwrap();

    let listener = TcpListener::bind(&bind).await.unwrap();
    let server = HttpServer::new(config, client, identity_minter, bond_issuer).unwrap();
    tokio::spawn(async move {
        server.run(listener).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
}
