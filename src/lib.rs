//! ngsiwork - a command-line client for FIWARE Open APIs
//!
//! The binary `ngsi` is a thin shell over a declarative command-dispatch
//! engine: commands and flags are described as data, compiled into a
//! registry, and every invocation is parsed, validated and resolved to an
//! HTTP client before a command handler runs.
//!
//! # Architecture
//!
//! - [`cli`] - Command tree, parser, binder, validator, resolver, dispatcher
//! - [`core`] - Error model and the profile store
//! - [`http`] - HTTP transport abstraction and client
//! - [`keyrock`] - Keyrock application commands
//! - [`management`] - Local profile commands
//! - [`ngsi`] - Per-run process state
//! - [`ui`] - Help text and output formatting
//!
//! # Invariants
//!
//! 1. The registry is immutable once built and shared by reference
//! 2. No handler runs unless parsing and validation succeeded
//! 3. Every failure carries a function name and errno through its chain

pub mod app;
pub mod cli;
pub mod core;
pub mod http;
pub mod keyrock;
pub mod logging;
pub mod management;
pub mod ngsi;
pub mod ui;

use std::io::{Read, Write};
use std::sync::Arc;

use http::HttpTransport;
use ngsi::Ngsi;

/// Run the tool with `args` (argv without the program name).
///
/// Returns the exit status.
pub fn run(
    args: &[String],
    stdin: Box<dyn Read + Send>,
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
) -> i32 {
    run_with_transport(args, stdin, stdout, stderr, None)
}

/// [`run`], sending HTTP requests through `transport` when given.
pub fn run_with_transport(
    args: &[String],
    stdin: Box<dyn Read + Send>,
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
    transport: Option<Arc<dyn HttpTransport>>,
) -> i32 {
    let mut ngsi = Ngsi::new(stdin, stdout);
    if let Some(transport) = transport {
        ngsi = ngsi.with_transport(transport);
    }
    cli::dispatch::execute(&app::new_app(), args, ngsi, stderr)
}
