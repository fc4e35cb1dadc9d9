//! cli::registry
//!
//! The compiled, immutable view of an [`App`]'s command tree.
//!
//! # Design
//!
//! Every node gets a [`FlagTable`] of the flags visible at that depth:
//! global flags, then each ancestor's flags, then its own. A child's table
//! therefore extends its parent's, and a slot index bound while descending
//! stays valid all the way to the leaf. Name and alias lookups go through
//! maps computed here, once, so per-invocation lookups never scan.
//!
//! Construction checks the tree:
//! - names and aliases are unique among the flags visible to each node
//! - required-flag names and option-group members name visible flags
//! - every leaf has an action

use std::collections::HashMap;

use super::command::{App, Command};
use super::flag::FlagSpec;
use crate::core::errors::{ErrorKind, NgsiError};

/// Index of a node in the registry. The root is the app itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

/// Flags visible at one node, with name and alias indexes.
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    flags: Vec<&'static FlagSpec>,
    by_name: HashMap<&'static str, usize>,
    by_alias: HashMap<&'static str, usize>,
}

impl FlagTable {
    fn extended(&self, own: &[&'static FlagSpec], path: &str) -> Result<FlagTable, NgsiError> {
        const FUNC: &str = "flag_table";

        let mut table = self.clone();
        for &flag in own {
            if table.by_name.contains_key(flag.name) {
                return Err(NgsiError::new(
                    FUNC,
                    1,
                    format!("duplicate flag --{} visible to '{}'", flag.name, path),
                    ErrorKind::Definition,
                ));
            }
            let slot = table.flags.len();
            table.by_name.insert(flag.name, slot);
            for &alias in flag.aliases {
                if table.by_alias.insert(alias, slot).is_some() {
                    return Err(NgsiError::new(
                        FUNC,
                        2,
                        format!("duplicate alias -{} visible to '{}'", alias, path),
                        ErrorKind::Definition,
                    ));
                }
            }
            table.flags.push(flag);
        }
        Ok(table)
    }

    pub fn by_name(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn by_alias(&self, alias: &str) -> Option<usize> {
        self.by_alias.get(alias).copied()
    }

    pub fn spec(&self, slot: usize) -> &'static FlagSpec {
        self.flags[slot]
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'static FlagSpec)> + '_ {
        self.flags.iter().copied().enumerate()
    }
}

#[derive(Debug)]
struct Node<'a> {
    command: Option<&'a Command>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    table: FlagTable,
    global_len: usize,
}

/// Compiled command tree.
#[derive(Debug)]
pub struct Registry<'a> {
    app: &'a App,
    nodes: Vec<Node<'a>>,
}

impl<'a> Registry<'a> {
    /// Compile the tree of `app`.
    ///
    /// # Errors
    ///
    /// Returns a `Definition` error if the tree breaks any construction rule.
    pub fn new(app: &'a App) -> Result<Registry<'a>, NgsiError> {
        const FUNC: &str = "registry_new";

        let global = FlagTable::default()
            .extended(&app.flags, app.name)
            .map_err(|e| NgsiError::wrap(FUNC, 1, e))?;
        let global_len = global.len();

        let mut registry = Registry {
            app,
            nodes: vec![Node {
                command: None,
                parent: None,
                children: Vec::new(),
                table: global,
                global_len,
            }],
        };

        let mut seen = std::collections::HashSet::new();
        for command in &app.commands {
            if !seen.insert(command.name) {
                return Err(NgsiError::new(
                    FUNC,
                    2,
                    format!("duplicate command '{}'", command.name),
                    ErrorKind::Definition,
                ));
            }
            registry
                .add(NodeId::ROOT, command)
                .map_err(|e| NgsiError::wrap(FUNC, 3, e))?;
        }

        Ok(registry)
    }

    fn add(&mut self, parent: NodeId, command: &'a Command) -> Result<NodeId, NgsiError> {
        const FUNC: &str = "registry_add";

        let id = NodeId(self.nodes.len());
        let path = {
            let mut names = self.names(parent);
            names.push(command.name);
            names.join(" ")
        };

        let table = self.nodes[parent.0].table.extended(&command.flags, &path)?;

        for name in &command.required_flags {
            if table.by_name(name).is_none() {
                return Err(NgsiError::new(
                    FUNC,
                    1,
                    format!("required flag --{} is not visible to '{}'", name, path),
                    ErrorKind::Definition,
                ));
            }
        }
        if let Some(rule) = &command.option_group {
            if let Some(name) = rule.flags.iter().find(|f| table.by_name(f).is_none()) {
                return Err(NgsiError::new(
                    FUNC,
                    2,
                    format!("option group flag --{} is not visible to '{}'", name, path),
                    ErrorKind::Definition,
                ));
            }
        }
        if !command.has_subcommands() && command.action.is_none() {
            return Err(NgsiError::new(
                FUNC,
                3,
                format!("'{}' has neither subcommands nor an action", path),
                ErrorKind::Definition,
            ));
        }

        let global_len = self.nodes[parent.0].global_len;
        self.nodes.push(Node {
            command: Some(command),
            parent: Some(parent),
            children: Vec::new(),
            table,
            global_len,
        });
        self.nodes[parent.0].children.push(id);

        let mut seen = std::collections::HashSet::new();
        for sub in &command.subcommands {
            if !seen.insert(sub.name) {
                return Err(NgsiError::new(
                    FUNC,
                    4,
                    format!("duplicate subcommand '{}' under '{}'", sub.name, path),
                    ErrorKind::Definition,
                ));
            }
            self.add(id, sub)?;
        }

        Ok(id)
    }

    pub fn app(&self) -> &'a App {
        self.app
    }

    /// The command at `node`; `None` for the root.
    pub fn command(&self, node: NodeId) -> Option<&'a Command> {
        self.nodes[node.0].command
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        !self.nodes[node.0].children.is_empty()
    }

    /// The child of `node` named `name`.
    pub fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .find(|id| self.command(*id).is_some_and(|c| c.name == name))
    }

    /// Flags visible at `node`.
    pub fn table(&self, node: NodeId) -> &FlagTable {
        &self.nodes[node.0].table
    }

    /// Whether `slot` of `node`'s table holds a global flag.
    pub fn is_global_slot(&self, node: NodeId, slot: usize) -> bool {
        slot < self.nodes[node.0].global_len
    }

    /// Commands from the top-level command down to `node`.
    pub fn path(&self, node: NodeId) -> Vec<&'a Command> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(command) = self.command(id) {
                path.push(command);
            }
            current = self.parent(id);
        }
        path.reverse();
        path
    }

    /// Command names from the top-level command down to `node`.
    pub fn names(&self, node: NodeId) -> Vec<&'static str> {
        self.path(node).iter().map(|c| c.name).collect()
    }

    /// Descend from the root while the next token names a child.
    ///
    /// Returns the deepest matched node and the tokens after it. Flag
    /// tokens are not interpreted; see [`parse`](super::parse::parse) for
    /// the full grammar.
    pub fn resolve_path<'t>(
        &self,
        tokens: &'t [String],
    ) -> Result<(NodeId, &'t [String]), NgsiError> {
        const FUNC: &str = "resolve_path";

        let mut node = NodeId::ROOT;
        let mut rest = tokens;
        while let Some((head, tail)) = rest.split_first() {
            if !self.has_children(node) {
                break;
            }
            match self.child(node, head) {
                Some(child) => {
                    node = child;
                    rest = tail;
                }
                None => return Err(unknown_command(FUNC, 1, self, node, head)),
            }
        }
        Ok((node, rest))
    }
}

/// The error for a token that names no child of `node`.
pub(crate) fn unknown_command(
    function: &'static str,
    errno: u32,
    registry: &Registry<'_>,
    node: NodeId,
    token: &str,
) -> NgsiError {
    let message = if node.is_root() {
        format!("unknown command: {}", token)
    } else {
        format!(
            "unknown command: {} {}",
            registry.names(node).join(" "),
            token
        )
    };
    NgsiError::new(function, errno, message, ErrorKind::UnknownCommand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{Action, OptionRule};
    use crate::cli::context::Context;
    use crate::http::Client;
    use crate::ngsi::Ngsi;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        async fn run(
            &self,
            _c: &Context<'_>,
            _ngsi: &mut Ngsi,
            _client: Option<&Client>,
        ) -> Result<(), NgsiError> {
            Ok(())
        }
    }

    static GLOBAL: FlagSpec = FlagSpec::string("config");
    static HOST: FlagSpec = FlagSpec::string("host").aliases(&["h"]);
    static AID: FlagSpec = FlagSpec::string("aid").aliases(&["i"]);
    static OTHER_H: FlagSpec = FlagSpec::string("hint").aliases(&["h"]);

    fn app() -> App {
        App::new("ngsi", "test", "0.0.0")
            .flags(vec![&GLOBAL])
            .command(
                Command::new("applications", "apps")
                    .flags(vec![&HOST])
                    .subcommand(Command::new("list", "list").action(Noop))
                    .subcommand(
                        Command::new("get", "get")
                            .flags(vec![&AID])
                            .required_flags(vec!["aid"])
                            .action(Noop),
                    ),
            )
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tables_extend_parent_tables() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let args = strings(&["applications", "get", "--aid", "x"]);
        let (get, rest) = registry.resolve_path(&args).unwrap();
        assert!(rest.len() == 2);

        let table = registry.table(get);
        assert_eq!(table.by_name("config"), Some(0));
        assert_eq!(table.by_name("host"), Some(1));
        assert_eq!(table.by_alias("i"), Some(2));
        assert!(registry.is_global_slot(get, 0));
        assert!(!registry.is_global_slot(get, 1));
        assert_eq!(registry.names(get), vec!["applications", "get"]);
    }

    #[test]
    fn resolve_path_stops_at_leaf() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let args = strings(&["applications", "list", "get"]);
        let (node, rest) = registry.resolve_path(&args).unwrap();
        assert_eq!(registry.command(node).map(|c| c.name), Some("list"));
        assert_eq!(rest, &args[2..]);
    }

    #[test]
    fn resolve_path_unknown_command() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let err = registry.resolve_path(&strings(&["nosuch"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
        assert_eq!(err.message(), "unknown command: nosuch");

        let err = registry
            .resolve_path(&strings(&["applications", "nosuch"]))
            .unwrap_err();
        assert_eq!(err.message(), "unknown command: applications nosuch");
    }

    #[test]
    fn duplicate_alias_rejected() {
        let app = App::new("ngsi", "test", "0.0.0").command(
            Command::new("applications", "apps")
                .flags(vec![&HOST])
                .subcommand(Command::new("list", "list").flags(vec![&OTHER_H]).action(Noop)),
        );

        let err = Registry::new(&app).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert!(err.message().contains("-h"));
    }

    #[test]
    fn duplicate_name_across_levels_rejected() {
        let app = App::new("ngsi", "test", "0.0.0")
            .flags(vec![&HOST])
            .command(Command::new("server", "s").flags(vec![&HOST]).action(Noop));

        let err = Registry::new(&app).unwrap_err();
        assert!(err.message().contains("duplicate flag --host"));
    }

    #[test]
    fn dangling_references_rejected() {
        let app = App::new("ngsi", "test", "0.0.0").command(
            Command::new("create", "c")
                .option_group(OptionRule::xnor(&["data", "name"]))
                .action(Noop),
        );
        assert!(Registry::new(&app).is_err());

        let app = App::new("ngsi", "test", "0.0.0")
            .command(Command::new("get", "g").required_flags(vec!["aid"]).action(Noop));
        assert!(Registry::new(&app).is_err());
    }

    #[test]
    fn leaf_without_action_rejected() {
        let app = App::new("ngsi", "test", "0.0.0").command(Command::new("empty", "e"));
        let err = Registry::new(&app).unwrap_err();
        assert!(err.message().contains("neither subcommands nor an action"));
    }
}
