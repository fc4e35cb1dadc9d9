//! ui::help
//!
//! Application and command help text.

use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::flag::FlagSpec;
use crate::cli::registry::{NodeId, Registry};
use crate::core::errors::{ErrorKind, NgsiError};

const HELP_LINE: (&str, &str) = ("help, h", "Shows a list of commands or help for one command");

/// Help for the root (application help) or for one command.
pub fn help_text(registry: &Registry<'_>, node: NodeId) -> String {
    if node.is_root() {
        app_help(registry)
    } else {
        command_help(registry, node)
    }
}

/// Write [`help_text`] to `out`.
pub fn print_help(out: &mut dyn Write, registry: &Registry<'_>, node: NodeId) -> Result<(), NgsiError> {
    const FUNC: &str = "print_help";

    out.write_all(help_text(registry, node).as_bytes())
        .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))
}

fn app_help(registry: &Registry<'_>) -> String {
    let app = registry.app();
    let mut msg = String::new();
    msg.push_str(&format!("NAME:\n   {} - {}\n\n", app.name, app.usage));
    msg.push_str(&format!(
        "USAGE:\n   {} [global options] command [options] [arguments...]\n\n",
        app.name
    ));
    msg.push_str(&format!("VERSION:\n   {} version {}\n\n", app.name, app.version));

    msg.push_str("COMMANDS:\n");
    msg.push_str(&format!("   {}  {}\n", HELP_LINE.0, HELP_LINE.1));

    let mut categories: BTreeMap<String, Vec<(&str, &str)>> = BTreeMap::new();
    for child in registry.children(NodeId::ROOT) {
        if let Some(cmd) = registry.command(*child).filter(|c| !c.hidden) {
            categories
                .entry(cmd.category.to_string())
                .or_default()
                .push((cmd.name, cmd.usage));
        }
    }
    let mut names: Vec<&String> = categories.keys().collect();
    names.sort_by_key(|name| name.to_lowercase());
    for name in names {
        let commands = &categories[name];
        if !name.is_empty() {
            msg.push_str(&format!("   {}:\n", name));
        }
        let width = commands.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (cmd, usage) in commands {
            msg.push_str(&format!("     {:<width$}  {}\n", cmd, usage, width = width));
        }
    }
    msg.push('\n');

    msg.push_str(&flag_section("GLOBAL OPTIONS", &global_flags(registry, NodeId::ROOT)));
    msg
}

fn command_help(registry: &Registry<'_>, node: NodeId) -> String {
    let app = registry.app();
    let path = registry.path(node);
    let names = registry.names(node).join(" ");
    let mut msg = String::new();

    let (usage, category) = match (path.last(), path.first()) {
        (Some(cmd), Some(top)) => (cmd.usage, top.category),
        _ => ("", ""),
    };

    msg.push_str(&format!("NAME:\n   {} {} - {}\n\n", app.name, names, usage));
    let tail = if registry.has_children(node) {
        "[options] [command] [arguments...]"
    } else {
        "[options] [arguments...]"
    };
    msg.push_str(&format!(
        "USAGE:\n   {} [global options] {} {}\n\n",
        app.name, names, tail
    ));
    msg.push_str(&format!("CATEGORY:\n   {}\n\n", category));

    if registry.has_children(node) {
        let subcommands: Vec<(&str, &str)> = registry
            .children(node)
            .iter()
            .filter_map(|id| registry.command(*id))
            .filter(|c| !c.hidden)
            .map(|c| (c.name, c.usage))
            .chain(std::iter::once(HELP_LINE))
            .collect();
        let width = subcommands.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        msg.push_str("COMMANDS:\n");
        for (name, usage) in subcommands {
            msg.push_str(&format!("   {:<width$}  {}\n", name, usage, width = width));
        }
        msg.push('\n');
    }

    let table = registry.table(node);
    let own: Vec<&'static FlagSpec> = table
        .iter()
        .filter(|(slot, _)| !registry.is_global_slot(node, *slot))
        .map(|(_, spec)| spec)
        .collect();
    msg.push_str(&flag_section("OPTIONS", &own));
    msg.push_str(&flag_section("GLOBAL OPTIONS", &global_flags(registry, node)));
    msg
}

fn global_flags(registry: &Registry<'_>, node: NodeId) -> Vec<&'static FlagSpec> {
    registry
        .table(node)
        .iter()
        .filter(|(slot, _)| registry.is_global_slot(node, *slot))
        .map(|(_, spec)| spec)
        .collect()
}

fn flag_section(title: &str, flags: &[&'static FlagSpec]) -> String {
    let visible: Vec<(String, String)> = flags
        .iter()
        .filter(|f| !f.hidden)
        .map(|f| (f.help_names(), f.usage_text()))
        .collect();
    if visible.is_empty() {
        return String::new();
    }

    let width = visible.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut msg = format!("{}:\n", title);
    for (names, usage) in visible {
        msg.push_str(&format!("   {:<width$}  {}\n", names, usage, width = width));
    }
    msg.push('\n');
    msg
}
