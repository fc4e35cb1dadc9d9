//! cli::context
//!
//! The bound view of one invocation, handed to the validator, the resolver
//! and the action.
//!
//! Lookups take the canonical flag name, as in `c.string("aid")`, and go
//! through the matched node's name index. Asking for a flag the command
//! cannot see yields the zero value, so handlers shared between commands
//! can probe optional flags freely.

use super::bind::BoundContext;
use super::command::Command;
use super::flag::{FlagSpec, FlagValue};
use super::parse::Invocation;
use super::registry::{FlagTable, NodeId, Registry};

#[derive(Debug)]
pub struct Context<'r> {
    registry: &'r Registry<'r>,
    node: NodeId,
    bound: BoundContext,
    positionals: Vec<String>,
}

impl<'r> Context<'r> {
    pub fn new(registry: &'r Registry<'r>, invocation: Invocation) -> Self {
        Self {
            registry,
            node: invocation.node,
            bound: invocation.bound,
            positionals: invocation.positionals,
        }
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.table().by_name(name)
    }

    pub fn registry(&self) -> &'r Registry<'r> {
        self.registry
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn table(&self) -> &'r FlagTable {
        self.registry.table(self.node)
    }

    pub fn bound(&self) -> &BoundContext {
        &self.bound
    }

    /// The matched leaf command.
    pub fn command(&self) -> Option<&'r Command> {
        self.registry.command(self.node)
    }

    /// Commands from the top level down to the matched leaf.
    pub fn path(&self) -> Vec<&'r Command> {
        self.registry.path(self.node)
    }

    /// e.g. `applications list`
    pub fn command_line(&self) -> String {
        self.registry.names(self.node).join(" ")
    }

    /// Whether the command can see a flag named `name`.
    pub fn has_flag(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    pub fn spec(&self, name: &str) -> Option<&'static FlagSpec> {
        self.slot(name).map(|slot| self.table().spec(slot))
    }

    /// Whether `name` was explicitly set on the command line.
    pub fn is_set(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| self.bound.is_set(slot))
    }

    /// How many of `names` were explicitly set.
    pub fn count_set(&self, names: &[&str]) -> usize {
        names.iter().filter(|n| self.is_set(n)).count()
    }

    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.slot(name).map(|slot| self.bound.value(slot))
    }

    /// String value of `name`; other kinds are rendered as text.
    pub fn string(&self, name: &str) -> String {
        self.value(name).map(FlagValue::to_text).unwrap_or_default()
    }

    /// String value of `name` only when explicitly set.
    pub fn string_if_set(&self, name: &str) -> Option<String> {
        self.is_set(name).then(|| self.string(name))
    }

    pub fn bool(&self, name: &str) -> bool {
        matches!(self.value(name), Some(FlagValue::Bool(true)))
    }

    pub fn int64(&self, name: &str) -> i64 {
        match self.value(name) {
            Some(FlagValue::Int64(n)) => *n,
            _ => 0,
        }
    }

    /// Words left after the leaf command.
    pub fn args(&self) -> &[String] {
        &self.positionals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{Action, App};
    use crate::cli::flag::FlagDefault;
    use crate::cli::parse::{parse, ParseOutcome};
    use crate::core::errors::NgsiError;
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

    static NAME: FlagSpec = FlagSpec::string("name").aliases(&["n"]);
    static PRETTY: FlagSpec = FlagSpec::bool("pretty");
    static COUNT: FlagSpec = FlagSpec::int64("maxCount").default_value(FlagDefault::Int64(100));

    fn with_context(argv: &[&str], check: impl FnOnce(&Context<'_>)) {
        let app = App::new("ngsi", "test", "0.0.0").command(
            Command::new("create", "create")
                .flags(vec![&NAME, &PRETTY, &COUNT])
                .action(Noop),
        );
        let registry = Registry::new(&app).unwrap();
        let args: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        let ParseOutcome::Run(inv) = parse(&registry, &args).unwrap() else {
            panic!("expected a runnable invocation");
        };
        let c = Context::new(&registry, inv);
        check(&c);
    }

    #[test]
    fn typed_lookups() {
        with_context(&["create", "-n", "app", "--pretty", "--maxCount", "7"], |c| {
            assert_eq!(c.string("name"), "app");
            assert!(c.bool("pretty"));
            assert_eq!(c.int64("maxCount"), 7);
            assert_eq!(c.string("maxCount"), "7");
            assert_eq!(c.command_line(), "create");
        });
    }

    #[test]
    fn defaults_are_not_set() {
        with_context(&["create"], |c| {
            assert_eq!(c.int64("maxCount"), 100);
            assert!(!c.is_set("maxCount"));
            assert!(!c.bool("pretty"));
            assert_eq!(c.string_if_set("name"), None);
        });
    }

    #[test]
    fn invisible_flags_read_as_zero() {
        with_context(&["create"], |c| {
            assert!(!c.has_flag("aid"));
            assert_eq!(c.string("aid"), "");
            assert!(!c.is_set("aid"));
            assert_eq!(c.count_set(&["name", "aid"]), 0);
        });
    }

    #[test]
    fn positionals_are_kept() {
        with_context(&["create", "one", "two"], |c| {
            assert_eq!(c.args(), &["one".to_string(), "two".to_string()]);
        });
    }
}
