//! management::server
//!
//! `server list` and `server get`: read-only views of the profile store.

use async_trait::async_trait;

use crate::cli::command::Action;
use crate::cli::context::Context;
use crate::core::errors::{ErrorKind, NgsiError};
use crate::http::Client;
use crate::ngsi::Ngsi;
use crate::ui::output::{print_line, to_pretty_string};

/// `server list`
pub struct ServerList;

#[async_trait]
impl Action for ServerList {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        _client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "server_list";

        if c.bool("json") {
            let servers = &ngsi.config().file.servers;
            let text = if c.bool("pretty") {
                to_pretty_string(servers)
            } else {
                serde_json::to_string(servers)
            }
            .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))?;
            return print_line(ngsi.stdout(), &text).map_err(|e| NgsiError::wrap(FUNC, 2, e));
        }

        let aliases: Vec<String> = ngsi.config().aliases().iter().map(|a| a.to_string()).collect();
        if aliases.is_empty() {
            return Err(NgsiError::action(FUNC, 3, "server not found"));
        }
        print_line(ngsi.stdout(), &aliases.join(" ")).map_err(|e| NgsiError::wrap(FUNC, 4, e))
    }
}

/// `server get`
pub struct ServerGet;

#[async_trait]
impl Action for ServerGet {
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        _client: Option<&Client>,
    ) -> Result<(), NgsiError> {
        const FUNC: &str = "server_get";

        let host = c.string("host");
        let Some(entry) = ngsi.config().server(&host).cloned() else {
            return Err(NgsiError::new(
                FUNC,
                1,
                format!("{} not found", host),
                ErrorKind::UnknownHost,
            ));
        };

        if c.bool("json") {
            let text = if c.bool("pretty") {
                to_pretty_string(&entry)
            } else {
                serde_json::to_string(&entry)
            }
            .map_err(|e| NgsiError::from_source(FUNC, 2, ErrorKind::Action, e))?;
            return print_line(ngsi.stdout(), &text).map_err(|e| NgsiError::wrap(FUNC, 3, e));
        }

        let mut lines = vec![format!("serverHost {}", entry.server_host)];
        if let Some(v) = &entry.server_type {
            lines.push(format!("serverType {}", v));
        }
        if let Some(v) = &entry.ngsi_type {
            lines.push(format!("ngsiType {}", v));
        }
        if let Some(v) = &entry.tenant {
            lines.push(format!("FIWARE-Service {}", v));
        }
        if let Some(v) = &entry.scope {
            lines.push(format!("FIWARE-ServicePath {}", v));
        }
        if entry.token.is_some() {
            lines.push("token ********".to_string());
        }

        for line in lines {
            print_line(ngsi.stdout(), &line).map_err(|e| NgsiError::wrap(FUNC, 4, e))?;
        }
        Ok(())
    }
}
