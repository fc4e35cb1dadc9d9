//! cli::common_flags
//!
//! Flags shared by many commands.

use super::flag::{FlagDefault, FlagSpec};
use crate::logging::LOG_LEVELS;

// Global flags, visible to every command.

pub static STDERR: FlagSpec = FlagSpec::string("stderr")
    .usage("specify log level `LEVEL` (off, err, info, debug)")
    .choices(LOG_LEVELS);

pub static CONFIG: FlagSpec = FlagSpec::string("config").usage("specify configuration `FILE`");

pub static INSECURE_SKIP_VERIFY: FlagSpec =
    FlagSpec::bool("insecureSkipVerify").usage("TLS/SSL skip certificate verification");

pub static TIMEOUT: FlagSpec = FlagSpec::int64("timeout")
    .usage("specify request timeout in seconds `VALUE`")
    .default_value(FlagDefault::Int64(60))
    .hidden();

pub static MARGIN: FlagSpec = FlagSpec::int64("margin")
    .usage("I/O time out (second) `VALUE`")
    .default_value(FlagDefault::Int64(180))
    .hidden();

pub static MAX_COUNT: FlagSpec = FlagSpec::int64("maxCount")
    .usage("maximum number of items per request `VALUE`")
    .default_value(FlagDefault::Int64(100))
    .hidden();

/// The global flag set, in help order.
pub fn global_flags() -> Vec<&'static FlagSpec> {
    vec![
        &STDERR,
        &CONFIG,
        &INSECURE_SKIP_VERIFY,
        &TIMEOUT,
        &MARGIN,
        &MAX_COUNT,
    ]
}

// Server-scoped flags.

/// `--host` that builds a client.
pub static HOST_R: FlagSpec = FlagSpec::string("host")
    .aliases(&["h"])
    .usage("specify host or alias `VALUE`")
    .required()
    .init_client();

/// `--host` read as a profile alias only.
pub static HOST: FlagSpec = FlagSpec::string("host")
    .aliases(&["h"])
    .usage("specify host or alias `VALUE`");

pub static OAUTH_TOKEN: FlagSpec = FlagSpec::string("oAuthToken")
    .usage("specify oauth token `VALUE`")
    .hidden()
    .allow_empty();

// Output flags.

pub static VERBOSE: FlagSpec = FlagSpec::bool("verbose")
    .aliases(&["v"])
    .usage("verbose");

pub static PRETTY: FlagSpec = FlagSpec::bool("pretty")
    .aliases(&["P"])
    .usage("pretty format");

pub static JSON: FlagSpec = FlagSpec::bool("json").aliases(&["j"]).usage("JSON format");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_have_no_aliases() {
        // Aliases are reserved for command flags.
        assert!(global_flags().iter().all(|f| f.aliases.is_empty()));
    }

    #[test]
    fn tuning_flags_are_hidden() {
        assert!(TIMEOUT.hidden && MARGIN.hidden && MAX_COUNT.hidden);
        assert!(!STDERR.hidden);
    }

    #[test]
    fn host_variants() {
        assert!(HOST_R.required && HOST_R.init_client);
        assert!(!HOST.required && !HOST.init_client);
        assert!(OAUTH_TOKEN.allow_empty);
    }
}
