//! ui::output
//!
//! Output formatting for command results.
//!
//! # Modes
//!
//! Read commands print in one of three modes:
//! - summary (default): one identifying field per line, chosen by the handler
//! - `--verbose`: the response body as received, plus a newline
//! - `--pretty`: the response body indented with two spaces, plus a newline
//!
//! Indentation re-serializes the parsed body with `preserve_order` and
//! `arbitrary_precision` enabled, so keys keep their order and numbers keep
//! their text.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::cli::context::Context;
use crate::core::errors::{ErrorKind, NgsiError};

/// How a read command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Summary,
    Verbose,
    Pretty,
}

impl OutputMode {
    /// `--pretty` wins over `--verbose`.
    pub fn from_context(c: &Context<'_>) -> Self {
        if c.bool("pretty") {
            OutputMode::Pretty
        } else if c.bool("verbose") {
            OutputMode::Verbose
        } else {
            OutputMode::Summary
        }
    }
}

/// Re-indent a JSON document with two spaces.
pub fn indent_json(body: &[u8]) -> Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    to_pretty_string(&value)
}

/// Serialize `value` with two-space indentation.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Print a response body in verbose or pretty mode.
///
/// Summary mode is handled by the caller, which knows which field to show.
pub fn print_body(out: &mut dyn Write, body: &[u8], mode: OutputMode) -> Result<(), NgsiError> {
    const FUNC: &str = "print_body";

    let written = match mode {
        OutputMode::Pretty => {
            let text = indent_json(body)
                .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))?;
            writeln!(out, "{}", text)
        }
        OutputMode::Verbose | OutputMode::Summary => {
            out.write_all(body).and_then(|_| writeln!(out))
        }
    };
    written.map_err(|e| NgsiError::from_source(FUNC, 2, ErrorKind::Action, e))
}

/// Print one line.
pub fn print_line(out: &mut dyn Write, line: &str) -> Result<(), NgsiError> {
    const FUNC: &str = "print_line";

    writeln!(out, "{}", line).map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))
}

/// An in-memory writer whose clones share one buffer.
///
/// Hand one clone to a run as stdout or stderr and read the other after it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
