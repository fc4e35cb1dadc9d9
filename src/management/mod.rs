//! management
//!
//! Commands that manage local configuration and never contact a server.

pub mod server;

use crate::cli::command::Command;
use crate::cli::common_flags::{HOST, JSON, PRETTY};
use server::{ServerGet, ServerList};

/// The `server` command tree.
pub fn server_command() -> Command {
    Command::new("server", "manage config for servers")
        .category("MANAGEMENT")
        .subcommand(
            Command::new("list", "list servers")
                .flags(vec![&JSON, &PRETTY])
                .action(ServerList),
        )
        .subcommand(
            Command::new("get", "get server")
                .flags(vec![&HOST, &JSON, &PRETTY])
                .required_flags(vec!["host"])
                .action(ServerGet),
        )
}
