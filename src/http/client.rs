//! http::client
//!
//! A client bound to one server: base URL, default headers, transport.

use std::sync::Arc;

use tracing::debug;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::core::errors::{ErrorKind, NgsiError};

/// Issues requests relative to a base URL with a fixed set of headers.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    server_type: Option<String>,
    headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("server_type", &self.server_type)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            server_type: None,
            headers: Vec::new(),
            transport,
        }
    }

    pub fn with_server_type(mut self, server_type: Option<String>) -> Self {
        self.server_type = server_type;
        self
    }

    /// Add or replace a default header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn server_type(&self) -> Option<&str> {
        self.server_type.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, NgsiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NgsiError> {
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NgsiError> {
        self.request(Method::Put, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, NgsiError> {
        self.request(Method::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse, NgsiError> {
        self.request(Method::Delete, path, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, NgsiError> {
        const FUNC: &str = "http_request";

        let mut headers = self.headers.clone();
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        let request = HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        };

        debug!("{} {}", request.method, request.url);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))?;
        debug!("status {}", response.status);

        Ok(response)
    }
}
