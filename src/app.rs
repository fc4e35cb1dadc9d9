//! app
//!
//! The `ngsi` command tree.

use crate::cli::command::App;
use crate::cli::common_flags::global_flags;
use crate::keyrock::applications_command;
use crate::management::server_command;

pub const NAME: &str = "ngsi";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Every command the binary knows, under the global flags.
pub fn new_app() -> App {
    App::new(NAME, "command-line tool for FIWARE Open APIs", VERSION)
        .flags(global_flags())
        .command(applications_command())
        .command(server_command())
}
