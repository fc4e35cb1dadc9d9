//! cli::dispatch
//!
//! One run of the tool: parse, validate, resolve, act, report.
//!
//! # Design
//!
//! The registry is built once per run and borrowed by everything downstream.
//! Logging is installed with a scoped default subscriber so runs in the same
//! process never share a log level or error stream. The action future is
//! driven on a current-thread runtime; nothing is spawned.
//!
//! # Flow
//!
//! ```text
//! argv ─► parse ─► check_flags ─► Ngsi::init ─► check_server_kind
//!                                                     │
//!                   report ◄─ Action::run ◄─ resolve_client
//! ```

use std::io::Write;

use tracing::{debug, error, info};

use super::bind::BoundContext;
use super::command::App;
use super::context::Context;
use super::parse::{parse_partial, ParseOutcome};
use super::registry::{NodeId, Registry};
use super::resolve::{host_flag, resolve_client};
use super::validate::{check_flags, check_server_kind};
use crate::core::errors::{ErrorKind, NgsiError};
use crate::logging::{self, LogLevel};
use crate::ngsi::Ngsi;
use crate::ui::help::print_help;
use crate::ui::output::print_line;

/// Run `args` (argv without the program name) against `app`.
///
/// Returns the process exit status: 0 on success, 1 on any error.
pub fn execute(app: &App, args: &[String], mut ngsi: Ngsi, stderr: Box<dyn Write + Send>) -> i32 {
    let registry = match Registry::new(app) {
        Ok(registry) => registry,
        Err(err) => {
            let subscriber = logging::subscriber(LogLevel::default(), stderr);
            return tracing::subscriber::with_default(subscriber, || {
                error!("{}", err.trail_line());
                1
            });
        }
    };

    let parsed = parse_partial(&registry, args);
    let level = match &parsed {
        Ok(outcome) => outcome
            .bound()
            .map(|(node, bound)| log_level(&registry, node, bound))
            .unwrap_or_default(),
        Err(failure) => log_level(&registry, failure.node, &failure.bound),
    };

    tracing::subscriber::with_default(logging::subscriber(level, stderr), || {
        info!("{} version {}", app.name, app.version);
        let result = parsed
            .map_err(NgsiError::from)
            .and_then(|outcome| block_on(dispatch(&registry, outcome, &mut ngsi)));
        report(result, &mut ngsi)
    })
}

/// The level asked for by `--stderr`, or the default when unset or invalid.
///
/// An invalid value is reported later by the choice check.
fn log_level(registry: &Registry<'_>, node: NodeId, bound: &BoundContext) -> LogLevel {
    registry
        .table(node)
        .by_name("stderr")
        .filter(|slot| *slot < bound.len() && bound.is_set(*slot))
        .and_then(|slot| bound.value(slot).to_text().parse().ok())
        .unwrap_or_default()
}

fn block_on<F>(future: F) -> Result<(), NgsiError>
where
    F: std::future::Future<Output = Result<(), NgsiError>>,
{
    const FUNC: &str = "block_on";

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| NgsiError::from_source(FUNC, 1, ErrorKind::Action, e))?;
    runtime.block_on(future)
}

async fn dispatch(
    registry: &Registry<'_>,
    outcome: ParseOutcome,
    ngsi: &mut Ngsi,
) -> Result<(), NgsiError> {
    const FUNC: &str = "dispatch";

    let invocation = match outcome {
        ParseOutcome::Version => {
            let app = registry.app();
            return print_line(ngsi.stdout(), &format!("{} version {}", app.name, app.version))
                .map_err(|e| NgsiError::wrap(FUNC, 1, e));
        }
        ParseOutcome::Help { node, .. } => {
            return print_help(ngsi.stdout(), registry, node).map_err(|e| NgsiError::wrap(FUNC, 2, e));
        }
        ParseOutcome::Run(invocation) => invocation,
    };

    let c = Context::new(registry, invocation);
    debug!("command: {}", c.command_line());

    check_flags(&c).map_err(|e| NgsiError::wrap(FUNC, 3, e))?;
    ngsi.init(&c).map_err(|e| NgsiError::wrap(FUNC, 4, e))?;
    check_server_kind(&c, ngsi.config()).map_err(|e| NgsiError::wrap(FUNC, 5, e))?;

    let client = if host_flag(&c).is_some_and(|spec| c.is_set(spec.name)) {
        let transport = ngsi.transport().map_err(|e| NgsiError::wrap(FUNC, 6, e))?;
        resolve_client(&c, ngsi.config(), transport).map_err(|e| NgsiError::wrap(FUNC, 7, e))?
    } else {
        None
    };

    let Some(action) = c.command().and_then(|cmd| cmd.action.as_deref()) else {
        return Err(NgsiError::new(
            FUNC,
            8,
            format!("no action for {}", c.command_line()),
            ErrorKind::Definition,
        ));
    };
    action
        .run(&c, ngsi, client.as_ref())
        .await
        .map_err(|e| NgsiError::wrap(FUNC, 9, e))
}

fn report(result: Result<(), NgsiError>, ngsi: &mut Ngsi) -> i32 {
    const FUNC: &str = "run";

    let flushed = ngsi
        .flush()
        .map_err(|e| NgsiError::from_source(FUNC, 2, ErrorKind::Action, e));

    match result.map_err(|e| NgsiError::wrap(FUNC, 1, e)).and(flushed) {
        Ok(()) => {
            info!("normal termination");
            0
        }
        Err(err) => {
            error!("{}", err.trail_line());
            for cause in err.chain().skip(1) {
                match cause.downcast_ref::<NgsiError>() {
                    Some(inner) => {
                        info!("{}", inner.trail_line());
                        debug!("kind: {:?}", inner.kind());
                    }
                    None => info!("{}", cause.to_string().trim_end_matches('\n')),
                }
            }
            info!("abnormal termination");
            1
        }
    }
}
