//! http::transport
//!
//! The seam between request construction and the network.
//!
//! # Architecture
//!
//! [`HttpTransport`] takes a fully built [`HttpRequest`] and returns the
//! status and body. [`ReqwestTransport`] is the production implementation;
//! [`MockTransport`](super::mock::MockTransport) replays canned responses in
//! tests. Status codes are never interpreted here.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from sending a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    #[error("illegal url: {0}")]
    InvalidUrl(String),

    /// Connection, TLS or timeout failure.
    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        let reason = reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        format!("{} {}", self.status, reason).trim_end().to_string()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] over a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout.
    ///
    /// `insecure` disables certificate verification.
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .user_agent(concat!("ngsi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{} ({})", request.url, e)))?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn status_line_includes_reason() {
        assert_eq!(HttpResponse::new(404, "").status_line(), "404 Not Found");
        assert_eq!(HttpResponse::new(201, "").status_line(), "201 Created");
        assert_eq!(HttpResponse::new(599, "").status_line(), "599");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: Method::Get,
            url: "http://localhost/".into(),
            headers: vec![("X-Auth-Token".into(), "t".into())],
            body: None,
        };
        assert_eq!(request.header("x-auth-token"), Some("t"));
        assert_eq!(request.header("Authorization"), None);
    }

    #[tokio::test]
    async fn reqwest_transport_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/applications"))
            .and(header("X-Auth-Token", "secret"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"application":{"id":"A"}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5), false).unwrap();
        let response = transport
            .send(HttpRequest {
                method: Method::Post,
                url: format!("{}/v1/applications", server.uri()),
                headers: vec![("X-Auth-Token".into(), "secret".into())],
                body: Some(br#"{"application":{"name":"x"}}"#.to_vec()),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body_text(), r#"{"application":{"id":"A"}}"#);
    }

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let transport = ReqwestTransport::new(Duration::from_secs(5), false).unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::Get,
                url: "not a url".into(),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
