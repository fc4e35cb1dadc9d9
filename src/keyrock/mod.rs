//! keyrock
//!
//! Commands for the Keyrock identity manager.
//!
//! # Commands
//!
//! ```text
//! ngsi applications list   --host ALIAS [--verbose | --pretty]
//! ngsi applications get    --host ALIAS --aid ID [--pretty]
//! ngsi applications create --host ALIAS (--data DATA | --name NAME [...])
//! ngsi applications update --host ALIAS --aid ID [--data DATA | --name NAME ...]
//! ngsi applications delete --host ALIAS --aid ID
//! ```

pub mod applications;
pub mod flags;

use crate::cli::command::{Command, OptionRule};
use crate::cli::common_flags::{HOST_R, OAUTH_TOKEN, PRETTY, VERBOSE};
use applications::{
    ApplicationsCreate, ApplicationsDelete, ApplicationsGet, ApplicationsList, ApplicationsUpdate,
};

/// Server kinds the application commands accept.
pub const SERVER_KINDS: &[&str] = &["keyrock"];

/// The `applications` command tree.
pub fn applications_command() -> Command {
    let mut create_flags = flags::body_flags();
    create_flags.extend([&VERBOSE, &PRETTY]);

    let mut update_flags = vec![&flags::AID];
    update_flags.extend(flags::body_flags());
    update_flags.extend([&VERBOSE, &PRETTY]);

    Command::new("applications", "manage applications for Keyrock")
        .category("Keyrock")
        .flags(vec![&HOST_R, &OAUTH_TOKEN])
        .server_kinds(SERVER_KINDS)
        .subcommand(
            Command::new("list", "list applications")
                .flags(vec![&VERBOSE, &PRETTY])
                .action(ApplicationsList),
        )
        .subcommand(
            Command::new("get", "get application")
                .flags(vec![&flags::AID, &VERBOSE, &PRETTY])
                .required_flags(vec!["aid"])
                .action(ApplicationsGet),
        )
        .subcommand(
            Command::new("create", "create application")
                .flags(create_flags)
                .option_group(OptionRule::xnor(&["data", "name"]))
                .action(ApplicationsCreate),
        )
        .subcommand(
            Command::new("update", "update application")
                .flags(update_flags)
                .required_flags(vec!["aid"])
                .option_group(OptionRule::nand(&["data", "name"]))
                .action(ApplicationsUpdate),
        )
        .subcommand(
            Command::new("delete", "delete application")
                .flags(vec![&flags::AID])
                .required_flags(vec!["aid"])
                .action(ApplicationsDelete),
        )
}
