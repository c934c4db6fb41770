//! In-process mock servers.
//!
//! [`MockServer`] records every request it receives: `/created` answers 201
//! with a JSON body, `/missing` answers 404 with a body that must never be
//! printed, anything else answers 200 `ok`. [`raw_server`] and
//! [`tls_server`] answer one connection with canned bytes.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Router;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};

pub const CREATED_BODY: &str = r#"{"id":7,"name":"morpheus"}"#;
pub const MISSING_BODY: &str = "<html>no such page</html>";

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

type Log = Arc<Mutex<Vec<Captured>>>;

pub struct MockServer {
    addr: SocketAddr,
    log: Log,
}

impl MockServer {
    /// Binds a random port and serves on a background thread.
    pub fn start() -> Self {
        let std_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(Arc::clone(&log));

        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                axum::serve(listener, app).await
            })
            .unwrap();
        });

        Self { addr, log }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.log.lock().unwrap().clone()
    }

    /// Exactly one request must have arrived.
    pub fn only_request(&self) -> Captured {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {requests:?}");
        requests.into_iter().next().unwrap()
    }
}

async fn record(State(log): State<Log>, req: Request) -> (StatusCode, String) {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    log.lock().unwrap().push(Captured {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    match parts.uri.path() {
        "/created" => (StatusCode::CREATED, CREATED_BODY.to_string()),
        "/missing" => (StatusCode::NOT_FOUND, MISSING_BODY.to_string()),
        _ => (StatusCode::OK, "ok".to_string()),
    }
}

/// Returns a URL on a port that nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

/// Serves one connection with a canned response. The handle yields the
/// request head exactly as it arrived on the socket.
pub fn raw_server(response: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let head = read_head(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        head
    });

    (format!("http://{addr}/raw"), handle)
}

/// Same as [`raw_server`] but behind TLS with a freshly generated
/// self-signed certificate that no client trusts.
pub fn tls_server(response: &'static str) -> (String, JoinHandle<String>) {
    let params = rcgen::CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let cert = params.self_signed(&key_pair).unwrap();

    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    let config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![cert.der().clone()], key)
    .unwrap();
    let config = Arc::new(config);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (tcp, _) = listener.accept().unwrap();
        let conn = ServerConnection::new(config).unwrap();
        let mut tls = StreamOwned::new(conn, tcp);
        let head = read_head(&mut tls);
        tls.write_all(response.as_bytes()).unwrap();
        tls.conn.send_close_notify();
        let _ = tls.flush();
        head
    });

    (format!("https://{addr}/secure"), handle)
}

fn read_head(stream: &mut impl Read) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Lower-cased header names from a raw request head, `host` left out.
pub fn header_names(head: &str) -> BTreeSet<String> {
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, _)| name.trim().to_ascii_lowercase())
        .filter(|name| name != "host")
        .collect()
}
