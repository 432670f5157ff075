//! HTTP transport abstraction
//!
//! The fetch layer only needs "GET this URL with these query pairs and give
//! me status + body". Real traffic goes through blocking reqwest; tests plug
//! in `FakeTransport` with canned routes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Status and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),
}

/// Anything that can perform a GET request
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError>;
}

/// Blocking reqwest transport
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("umls-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url).query(query).send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout_secs)
            } else {
                TransportError::Http(format!("{}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Http(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

/// One request seen by `FakeTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory transport for tests
///
/// Routes are matched by URL suffix, so tests can register
/// `/content/current/source/SNOMEDCT_US/9468002/parents` without caring about
/// the base URL. Unrouted requests get a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Result<RawResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply 200 with the given JSON document
    pub fn with_json(self, path: &str, body: serde_json::Value) -> Self {
        self.route(path, Ok(RawResponse::new(200, body.to_string())))
    }

    /// Reply with an arbitrary status and raw body
    pub fn with_status(self, path: &str, status: u16, body: &str) -> Self {
        self.route(path, Ok(RawResponse::new(status, body)))
    }

    /// Fail below HTTP
    pub fn with_transport_error(self, path: &str, error: TransportError) -> Self {
        self.route(path, Err(error))
    }

    fn route(self, path: &str, reply: Result<RawResponse, TransportError>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), reply);
        self
    }

    /// Every request made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of requests whose URL ends with `path`
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.url.ends_with(path))
            .count()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                url: url.to_string(),
                query: query.to_vec(),
            });

        let routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        // Longest matching suffix wins so "/X1/parents" beats "/parents"
        let reply = routes
            .iter()
            .filter(|(path, _)| url.ends_with(path.as_str()))
            .max_by_key(|(path, _)| path.len())
            .map(|(_, reply)| reply.clone());

        reply.unwrap_or_else(|| Ok(RawResponse::new(404, "Not Found")))
    }
}
