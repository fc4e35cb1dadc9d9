//! http::mock
//!
//! In-memory transport for deterministic tests.
//!
//! # Example
//!
//! ```
//! use ngsiwork::http::mock::MockTransport;
//! use ngsiwork::http::transport::{HttpRequest, HttpTransport, Method};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mock = MockTransport::new();
//! mock.respond(200, r#"{"applications":[]}"#);
//!
//! let response = mock
//!     .send(HttpRequest {
//!         method: Method::Get,
//!         url: "http://localhost:3000/v1/applications".into(),
//!         headers: vec![],
//!         body: None,
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Replays queued responses in order and records every request.
///
/// Clones share state, so a test can keep one handle while the run owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<HttpRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .responses
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: TransportError) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(Err(error));
    }

    /// Requests sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().responses.len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no response queued".into())))
    }
}
