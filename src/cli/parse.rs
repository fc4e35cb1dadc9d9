//! cli::parse
//!
//! Turns argv into a [`ParseOutcome`] against a compiled [`Registry`].
//!
//! # Grammar
//!
//! ```text
//! ngsi [--version | -v]
//! ngsi [flag...] [help | h]
//! ngsi [flag...] command [flag...] [subcommand [flag...]]... [positional | flag]...
//! ```
//!
//! Words are command names while the current node has subcommands, and
//! positionals once a leaf is reached. Flags are bound against the table
//! of the node reached so far, so a subcommand's flags are unknown before
//! its name appears. `--help` anywhere stops parsing and asks for help on
//! the current node.

use super::bind::{bind_flag, BoundContext};
use super::registry::{unknown_command, NodeId, Registry};
use super::token::{Token, Tokens};
use crate::core::errors::NgsiError;

/// A matched leaf command with its bound flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub node: NodeId,
    pub bound: BoundContext,
    /// Words left over after the leaf. Never bound to flags.
    pub positionals: Vec<String>,
}

/// What argv asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Run the action of a leaf command.
    Run(Invocation),
    /// Print help for a node; the root means application help.
    Help { node: NodeId, bound: BoundContext },
    Version,
}

impl ParseOutcome {
    /// The flags bound so far, if any were parsed.
    pub fn bound(&self) -> Option<(NodeId, &BoundContext)> {
        match self {
            ParseOutcome::Run(inv) => Some((inv.node, &inv.bound)),
            ParseOutcome::Help { node, bound } => Some((*node, bound)),
            ParseOutcome::Version => None,
        }
    }
}

/// A parse failure with the flags bound before it.
///
/// Global flags seen ahead of the failing token still apply, so the caller
/// can honour `--stderr` while reporting the error.
#[derive(Debug)]
pub struct ParseFailure {
    pub node: NodeId,
    pub bound: BoundContext,
    pub error: NgsiError,
}

impl From<ParseFailure> for NgsiError {
    fn from(failure: ParseFailure) -> Self {
        failure.error
    }
}

/// Parse `args` (argv without the program name).
pub fn parse(registry: &Registry<'_>, args: &[String]) -> Result<ParseOutcome, NgsiError> {
    Ok(parse_partial(registry, args)?)
}

/// Like [`parse`], but a failure keeps the partially bound context.
pub fn parse_partial(
    registry: &Registry<'_>,
    args: &[String],
) -> Result<ParseOutcome, ParseFailure> {
    const FUNC: &str = "parse";

    let mut tokens = Tokens::new(args);
    if matches!(tokens.peek(), Some("--version" | "-v")) {
        return Ok(ParseOutcome::Version);
    }

    let mut node = NodeId::ROOT;
    let mut bound = BoundContext::new(registry.table(node));
    let mut positionals = Vec::new();

    while let Some(raw) = tokens.advance() {
        match Token::classify(raw) {
            Token::Name("help") => return Ok(ParseOutcome::Help { node, bound }),
            token @ (Token::Name(_) | Token::Alias(_)) => {
                if let Err(e) = bind_flag(registry.table(node), &mut bound, token, &mut tokens) {
                    let error = NgsiError::wrap(FUNC, 1, e);
                    return Err(ParseFailure { node, bound, error });
                }
            }
            Token::Word(word) if registry.has_children(node) => {
                if word == "help" || word == "h" {
                    return Ok(ParseOutcome::Help { node, bound });
                }
                let Some(child) = registry.child(node, word) else {
                    let error = unknown_command(FUNC, 2, registry, node, word);
                    return Err(ParseFailure { node, bound, error });
                };
                node = child;
                bound.extend_to(registry.table(node));
            }
            Token::Word(word) => positionals.push(word.to_string()),
        }
    }

    if node.is_root() || registry.has_children(node) {
        return Ok(ParseOutcome::Help { node, bound });
    }

    Ok(ParseOutcome::Run(Invocation {
        node,
        bound,
        positionals,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::{Action, App, Command};
    use crate::cli::context::Context;
    use crate::cli::flag::{FlagSpec, FlagValue};
    use crate::core::errors::ErrorKind;
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

    static STDERR: FlagSpec = FlagSpec::string("stderr");
    static HOST: FlagSpec = FlagSpec::string("host").aliases(&["h"]);
    static AID: FlagSpec = FlagSpec::string("aid").aliases(&["i"]);
    static VERBOSE: FlagSpec = FlagSpec::bool("verbose").aliases(&["v"]);

    fn app() -> App {
        App::new("ngsi", "test", "0.0.0").flags(vec![&STDERR]).command(
            Command::new("applications", "apps")
                .flags(vec![&HOST])
                .subcommand(
                    Command::new("list", "list")
                        .flags(vec![&VERBOSE])
                        .action(Noop),
                )
                .subcommand(Command::new("get", "get").flags(vec![&AID]).action(Noop)),
        )
    }

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn run(registry: &Registry<'_>, v: &[&str]) -> Invocation {
        match parse(registry, &args(v)).unwrap() {
            ParseOutcome::Run(inv) => inv,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn flags_between_command_names() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let inv = run(
            &registry,
            &["--stderr", "info", "applications", "--host", "k", "get", "-i", "A"],
        );
        assert_eq!(registry.names(inv.node), vec!["applications", "get"]);
        let table = registry.table(inv.node);
        assert_eq!(
            inv.bound.value(table.by_name("host").unwrap()),
            &FlagValue::String("k".into())
        );
        assert_eq!(
            inv.bound.value(table.by_name("aid").unwrap()),
            &FlagValue::String("A".into())
        );
        assert!(inv.positionals.is_empty());
    }

    #[test]
    fn global_flags_after_command() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let inv = run(&registry, &["applications", "list", "--stderr", "debug"]);
        let slot = registry.table(inv.node).by_name("stderr").unwrap();
        assert!(inv.bound.is_set(slot));
    }

    #[test]
    fn subcommand_flag_before_subcommand_is_unknown() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let err = parse(&registry, &args(&["applications", "--aid", "A", "get"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFlag);
    }

    #[test]
    fn bool_lookahead() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let inv = run(&registry, &["applications", "list", "-v", "false"]);
        let slot = registry.table(inv.node).by_name("verbose").unwrap();
        assert_eq!(inv.bound.value(slot), &FlagValue::Bool(false));
        assert!(inv.positionals.is_empty());

        let inv = run(&registry, &["applications", "list", "-v", "extra"]);
        assert_eq!(inv.bound.value(slot), &FlagValue::Bool(true));
        assert_eq!(inv.positionals, vec!["extra".to_string()]);
    }

    #[test]
    fn version_only_as_first_token() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        assert_eq!(
            parse(&registry, &args(&["--version"])).unwrap(),
            ParseOutcome::Version
        );
        assert_eq!(parse(&registry, &args(&["-v"])).unwrap(), ParseOutcome::Version);
        assert!(parse(&registry, &args(&["--stderr", "info", "-v"])).is_err());
    }

    #[test]
    fn help_outcomes() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        for argv in [&[][..], &["help"][..], &["h"][..], &["--help"][..]] {
            match parse(&registry, &args(argv)).unwrap() {
                ParseOutcome::Help { node, .. } => assert!(node.is_root()),
                other => panic!("expected help, got {:?}", other),
            }
        }

        let apps = registry.child(NodeId::ROOT, "applications").unwrap();
        for argv in [
            &["applications"][..],
            &["applications", "help"][..],
            &["applications", "get", "--help"][..],
        ] {
            match parse(&registry, &args(argv)).unwrap() {
                ParseOutcome::Help { node, .. } => {
                    assert!(node == apps || registry.parent(node) == Some(apps))
                }
                other => panic!("expected help, got {:?}", other),
            }
        }
    }

    #[test]
    fn unknown_commands() {
        let app = app();
        let registry = Registry::new(&app).unwrap();

        let err = parse(&registry, &args(&["entities"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
        assert_eq!(err.message(), "unknown command: entities");

        let err = parse(&registry, &args(&["applications", "nosuch"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
    }

    #[test]
    fn failure_keeps_flags_bound_so_far() {
        let app = app();
        let registry = Registry::new(&app).unwrap();
        let argv = args(&["--stderr", "info", "applications", "list", "--bogus"]);

        let failure = parse_partial(&registry, &argv).unwrap_err();
        assert_eq!(failure.error.kind(), ErrorKind::UnknownFlag);
        assert_eq!(registry.names(failure.node), vec!["applications", "list"]);
        let slot = registry.table(failure.node).by_name("stderr").unwrap();
        assert_eq!(failure.bound.value(slot), &FlagValue::String("info".into()));

        let failure = parse_partial(&registry, &args(&["--stderr", "debug", "nope"])).unwrap_err();
        assert!(failure.node.is_root());
        assert_eq!(failure.error.kind(), ErrorKind::UnknownCommand);
        let slot = registry.table(NodeId::ROOT).by_name("stderr").unwrap();
        assert!(failure.bound.is_set(slot));
    }

    #[test]
    fn parse_is_deterministic() {
        let app = app();
        let registry = Registry::new(&app).unwrap();
        let argv = args(&["applications", "-h", "k", "get", "--aid", "A", "--aid", "B"]);

        assert_eq!(
            parse(&registry, &argv).unwrap(),
            parse(&registry, &argv).unwrap()
        );
    }
}
