//! http
//!
//! HTTP access for command handlers.
//!
//! # Modules
//!
//! - [`transport`] - The [`HttpTransport`] trait and its `reqwest` implementation
//! - [`client`] - A [`Client`] bound to one server's URL and headers
//! - [`mock`] - In-memory transport for tests

pub mod client;
pub mod mock;
pub mod transport;

pub use client::Client;
pub use mock::MockTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportError};
