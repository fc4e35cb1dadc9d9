//! core::config::schema
//!
//! Profile store schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the server type and NGSI flavour are
//! closed sets, and every profile must name a host. A host that is not an
//! `http(s)` URL is taken as a reference to another alias and is checked when
//! the host is resolved, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Server types a profile may declare.
pub const SERVER_TYPES: &[&str] = &[
    "broker",
    "keyrock",
    "perseo",
    "cygnus",
    "wirecloud",
    "iota",
    "comet",
    "quantumleap",
    "regproxy",
    "queryproxy",
    "tokenproxy",
];

/// NGSI flavours a broker profile may declare.
pub const NGSI_TYPES: &[&str] = &["v2", "ld"];

/// The whole profile store.
///
/// # Example
///
/// ```toml
/// [servers.keyrock]
/// server_type = "keyrock"
/// server_host = "http://localhost:3000"
/// token = "00000000-1111-2222-3333-444444444444"
///
/// [servers.orion]
/// server_type = "broker"
/// server_host = "http://localhost:1026"
/// ngsi_type = "v2"
/// tenant = "openiot"
/// scope = "/"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileFile {
    /// Server profiles keyed by alias.
    pub servers: BTreeMap<String, ServerEntry>,
}

impl ProfileFile {
    /// Validate every profile.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending alias.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (alias, entry) in &self.servers {
            if alias.is_empty() {
                return Err(ConfigError::InvalidValue("empty server alias".into()));
            }
            entry.validate(alias)?;
        }
        Ok(())
    }
}

/// One server profile as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerEntry {
    /// One of [`SERVER_TYPES`]. May be omitted when `server_host` names
    /// another alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,

    /// Base URL, or the alias of another profile.
    pub server_host: String,

    /// `v2` or `ld`, brokers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngsi_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Default access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ServerEntry {
    /// Validate this profile.
    pub fn validate(&self, alias: &str) -> Result<(), ConfigError> {
        if self.server_host.is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "server '{}': server_host is empty",
                alias
            )));
        }

        if let Some(server_type) = &self.server_type {
            if !SERVER_TYPES.contains(&server_type.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "server '{}': invalid server_type '{}', must be one of: {}",
                    alias,
                    server_type,
                    SERVER_TYPES.join(", ")
                )));
            }
        }

        if let Some(ngsi_type) = &self.ngsi_type {
            if !NGSI_TYPES.contains(&ngsi_type.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "server '{}': invalid ngsi_type '{}', must be one of: {}",
                    alias,
                    ngsi_type,
                    NGSI_TYPES.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Whether `server_host` is a URL rather than an alias reference.
    pub fn has_url(&self) -> bool {
        is_url(&self.server_host)
    }
}

/// Whether `s` looks like an `http` or `https` URL.
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
