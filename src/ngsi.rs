//! ngsi
//!
//! Process state handed to every action: standard streams, the profile
//! store, transport settings and the HTTP transport.
//!
//! # Design
//!
//! Nothing here is global. The binary builds one [`Ngsi`] over the real
//! streams; tests build one over in-memory buffers and a
//! [`MockTransport`](crate::http::MockTransport).

use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::context::Context;
use crate::core::config::Config;
use crate::core::errors::{ErrorKind, NgsiError};
use crate::http::{HttpTransport, ReqwestTransport};

/// Transport tuning taken from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub timeout: Duration,
    /// Seconds before token expiry at which a token counts as expired.
    pub margin: i64,
    /// Page size for list requests.
    pub max_count: i64,
    pub insecure_skip_verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            margin: 180,
            max_count: 100,
            insecure_skip_verify: false,
        }
    }
}

impl Settings {
    /// Read the global flags, replacing out-of-range values with defaults.
    pub fn from_context(c: &Context<'_>) -> Self {
        let defaults = Settings::default();

        let timeout = clamp_or(c.int64("timeout"), 10, 600, defaults.timeout.as_secs() as i64);
        Self {
            timeout: Duration::from_secs(timeout as u64),
            margin: clamp_or(c.int64("margin"), 10, 600, defaults.margin),
            max_count: clamp_or(c.int64("maxCount"), 1, 3000, defaults.max_count),
            insecure_skip_verify: c.bool("insecureSkipVerify"),
        }
    }
}

fn clamp_or(value: i64, min: i64, max: i64, default: i64) -> i64 {
    if (min..=max).contains(&value) {
        value
    } else {
        default
    }
}

/// Process state for one run.
pub struct Ngsi {
    stdin: Box<dyn Read + Send>,
    stdout: BufWriter<Box<dyn Write + Send>>,
    config: Config,
    config_loaded: bool,
    settings: Settings,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl std::fmt::Debug for Ngsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ngsi")
            .field("config", &self.config)
            .field("settings", &self.settings)
            .field("has_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

impl Ngsi {
    pub fn new(stdin: Box<dyn Read + Send>, stdout: Box<dyn Write + Send>) -> Self {
        Self {
            stdin,
            stdout: BufWriter::new(stdout),
            config: Config::default(),
            config_loaded: false,
            settings: Settings::default(),
            transport: None,
        }
    }

    /// Use `transport` instead of building a `reqwest` one.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use `config` instead of loading the profile store.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self.config_loaded = true;
        self
    }

    /// Apply the global flags and load the profile store.
    pub fn init(&mut self, c: &Context<'_>) -> Result<(), NgsiError> {
        const FUNC: &str = "ngsi_init";

        self.settings = Settings::from_context(c);

        if !self.config_loaded {
            let explicit: Option<PathBuf> = c.string_if_set("config").map(PathBuf::from);
            self.config = Config::load(explicit.as_deref())
                .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Config, e))?;
            self.config_loaded = true;
        }
        if let Some(path) = self.config.loaded_from() {
            info!("config: {}", path.display());
        }

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The HTTP transport, built on first use.
    pub fn transport(&mut self) -> Result<Arc<dyn HttpTransport>, NgsiError> {
        const FUNC: &str = "transport";

        if let Some(transport) = &self.transport {
            return Ok(Arc::clone(transport));
        }
        let transport: Arc<dyn HttpTransport> = Arc::new(
            ReqwestTransport::new(self.settings.timeout, self.settings.insecure_skip_verify)
                .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))?,
        );
        self.transport = Some(Arc::clone(&transport));
        Ok(transport)
    }

    pub fn stdout(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    /// Resolve a `--data` style argument to bytes.
    ///
    /// - `stdin` or `@-` reads standard input
    /// - `@FILE` reads a file
    /// - anything else is the data itself
    pub fn read_all(&mut self, s: &str) -> Result<Vec<u8>, NgsiError> {
        const FUNC: &str = "read_all";

        if s.is_empty() {
            return Err(NgsiError::action(FUNC, 1, "data is empty"));
        }

        if s == "stdin" || s == "@-" {
            let mut buf = Vec::new();
            self.stdin
                .read_to_end(&mut buf)
                .map_err(|e| NgsiError::from_source(FUNC, 2, ErrorKind::Action, e))?;
            return Ok(buf);
        }

        if let Some(name) = s.strip_prefix('@') {
            if name.is_empty() {
                return Err(NgsiError::action(FUNC, 5, "file name error"));
            }
            let path = std::path::absolute(Path::new(name))
                .map_err(|e| NgsiError::from_source(FUNC, 3, ErrorKind::Action, e))?;
            return std::fs::read(&path)
                .map_err(|e| NgsiError::from_source(FUNC, 4, ErrorKind::Action, e));
        }

        Ok(s.as_bytes().to_vec())
    }
}
