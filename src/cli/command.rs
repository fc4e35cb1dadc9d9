//! cli::command
//!
//! Declarative command tree: commands, option groups and the action seam.
//!
//! # Architecture
//!
//! A [`Command`] is plain data plus an optional boxed [`Action`]. Inner
//! nodes carry subcommands and no action; leaves carry an action. The tree
//! is owned by an [`App`] and compiled once into a
//! [`Registry`](super::registry::Registry), which never changes afterwards.
//!
//! # Example
//!
//! ```
//! use ngsiwork::cli::command::{App, Command, OptionRule};
//! use ngsiwork::cli::common_flags::HOST_R;
//!
//! let app = App::new("ngsi", "command-line tool for FIWARE Open APIs", "0.1.0").command(
//!     Command::new("applications", "manage applications")
//!         .category("Keyrock")
//!         .flags(vec![&HOST_R])
//!         .subcommand(Command::new("list", "list applications"))
//!         .subcommand(
//!             Command::new("create", "create an application")
//!                 .option_group(OptionRule::xnor(&["data", "name"])),
//!         ),
//! );
//!
//! assert_eq!(app.commands[0].subcommands.len(), 2);
//! ```

use std::fmt;

use async_trait::async_trait;

use super::context::Context;
use super::flag::FlagSpec;
use crate::core::errors::NgsiError;
use crate::http::Client;
use crate::ngsi::Ngsi;

/// The domain callback invoked for a matched leaf command.
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the command.
    ///
    /// `client` is present when the command sees an `init_client` flag that
    /// was set, i.e. when a `--host` was resolved.
    async fn run(
        &self,
        c: &Context<'_>,
        ngsi: &mut Ngsi,
        client: Option<&Client>,
    ) -> Result<(), NgsiError>;
}

/// How an option group constrains its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMode {
    /// Exactly one flag is set.
    Xnor,
    /// At most one flag is set.
    Nand,
    /// Every flag is set.
    And,
    /// At least one flag is set.
    Or,
}

/// A constraint over a group of flags of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRule {
    pub mode: OptionMode,
    pub flags: &'static [&'static str],
}

impl OptionRule {
    pub const fn xnor(flags: &'static [&'static str]) -> Self {
        Self {
            mode: OptionMode::Xnor,
            flags,
        }
    }

    pub const fn nand(flags: &'static [&'static str]) -> Self {
        Self {
            mode: OptionMode::Nand,
            flags,
        }
    }

    pub const fn and(flags: &'static [&'static str]) -> Self {
        Self {
            mode: OptionMode::And,
            flags,
        }
    }

    pub const fn or(flags: &'static [&'static str]) -> Self {
        Self {
            mode: OptionMode::Or,
            flags,
        }
    }

    /// Whether `set_count` flags out of the group satisfy the rule.
    pub fn accepts(&self, set_count: usize) -> bool {
        match self.mode {
            OptionMode::Xnor => set_count == 1,
            OptionMode::Nand => set_count <= 1,
            OptionMode::And => set_count == self.flags.len(),
            OptionMode::Or => set_count >= 1,
        }
    }

    /// The failure message for this rule.
    pub fn describe(&self) -> String {
        let names: Vec<String> = self.flags.iter().map(|f| format!("--{}", f)).collect();
        let list = join_with_or(&names);
        match self.mode {
            OptionMode::Xnor => format!("specify either {}", list),
            OptionMode::Nand => format!("specify at most one of {}", list),
            OptionMode::And => format!("specify all of {}", names.join(", ")),
            OptionMode::Or => format!("specify at least one of {}", list),
        }
    }
}

fn join_with_or(names: &[String]) -> String {
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// One node of the command tree.
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    /// Help grouping, e.g. `Keyrock` or `MANAGEMENT`.
    pub category: &'static str,
    pub flags: Vec<&'static FlagSpec>,
    /// Flags that must be set, in addition to flags marked `required`.
    pub required_flags: Vec<&'static str>,
    pub option_group: Option<OptionRule>,
    /// Profile kinds this command accepts for `--host`; `None` accepts any.
    pub server_kinds: Option<&'static [&'static str]>,
    pub hidden: bool,
    pub subcommands: Vec<Command>,
    pub action: Option<Box<dyn Action>>,
}

impl Command {
    pub fn new(name: &'static str, usage: &'static str) -> Self {
        Self {
            name,
            usage,
            category: "",
            flags: Vec::new(),
            required_flags: Vec::new(),
            option_group: None,
            server_kinds: None,
            hidden: false,
            subcommands: Vec::new(),
            action: None,
        }
    }

    pub fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    pub fn flags(mut self, flags: Vec<&'static FlagSpec>) -> Self {
        self.flags = flags;
        self
    }

    pub fn required_flags(mut self, names: Vec<&'static str>) -> Self {
        self.required_flags = names;
        self
    }

    pub fn option_group(mut self, rule: OptionRule) -> Self {
        self.option_group = Some(rule);
        self
    }

    pub fn server_kinds(mut self, kinds: &'static [&'static str]) -> Self {
        self.server_kinds = Some(kinds);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("category", &self.category)
            .field(
                "flags",
                &self.flags.iter().map(|flag| flag.name).collect::<Vec<_>>(),
            )
            .field("required_flags", &self.required_flags)
            .field("option_group", &self.option_group)
            .field("server_kinds", &self.server_kinds)
            .field("subcommands", &self.subcommands)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// The root of the command tree.
#[derive(Debug)]
pub struct App {
    pub name: &'static str,
    pub usage: &'static str,
    pub version: &'static str,
    /// Flags visible to every command.
    pub flags: Vec<&'static FlagSpec>,
    pub commands: Vec<Command>,
}

impl App {
    pub fn new(name: &'static str, usage: &'static str, version: &'static str) -> Self {
        Self {
            name,
            usage,
            version,
            flags: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn flags(mut self, flags: Vec<&'static FlagSpec>) -> Self {
        self.flags = flags;
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}
