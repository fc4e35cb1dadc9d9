//! cli::validate
//!
//! Checks a bound invocation against its command's rules.
//!
//! # Order
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. required flags, and no leftover positionals
//! 2. no empty string unless the flag allows it
//! 3. the command's option group
//! 4. closed value sets
//! 5. server kind of the `--host` profile
//!
//! Steps 1 to 4 only read the context. Step 5 also reads the profile store,
//! which the dispatcher loads between the two halves.

use super::context::Context;
use super::flag::FlagKind;
use super::resolve::{host_flag, lookup_profile};
use crate::core::config::Config;
use crate::core::errors::{ErrorKind, NgsiError};

/// Run every check.
pub fn validate(c: &Context<'_>, config: &Config) -> Result<(), NgsiError> {
    check_flags(c)?;
    check_server_kind(c, config)
}

/// Steps 1 to 4.
pub fn check_flags(c: &Context<'_>) -> Result<(), NgsiError> {
    check_required(c)?;
    check_empty(c)?;
    check_option_group(c)?;
    check_choices(c)
}

/// Every required flag along the path is set, and nothing is left over.
pub fn check_required(c: &Context<'_>) -> Result<(), NgsiError> {
    const FUNC: &str = "check_required";

    let mut required: Vec<&str> = Vec::new();
    for command in c.path() {
        for name in &command.required_flags {
            if !required.contains(name) {
                required.push(*name);
            }
        }
    }
    for (_, spec) in c.table().iter() {
        if spec.required && !required.contains(&spec.name) {
            required.push(spec.name);
        }
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !c.is_set(name))
        .map(|name| format!("--{}", name))
        .collect();

    if !missing.is_empty() {
        let noun = if missing.len() == 1 { "flag" } else { "flags" };
        return Err(NgsiError::new(
            FUNC,
            1,
            format!("missing required {}: {}", noun, missing.join(", ")),
            ErrorKind::MissingRequiredFlags,
        ));
    }

    if !c.args().is_empty() {
        return Err(NgsiError::new(
            FUNC,
            2,
            format!("unexpected argument: {}", c.args().join(" ")),
            ErrorKind::MissingRequiredFlags,
        ));
    }

    Ok(())
}

/// Explicitly set string flags are non-empty unless they allow it.
pub fn check_empty(c: &Context<'_>) -> Result<(), NgsiError> {
    const FUNC: &str = "check_empty";

    for (slot, spec) in c.table().iter() {
        if spec.kind != FlagKind::String || spec.allow_empty || !c.bound().is_set(slot) {
            continue;
        }
        if c.string(spec.name).is_empty() {
            return Err(NgsiError::new(
                FUNC,
                1,
                format!("specify a value to --{}", spec.name),
                ErrorKind::EmptyValue,
            ));
        }
    }
    Ok(())
}

/// The matched command's option group holds.
pub fn check_option_group(c: &Context<'_>) -> Result<(), NgsiError> {
    const FUNC: &str = "check_option_group";

    let Some(rule) = c.command().and_then(|cmd| cmd.option_group) else {
        return Ok(());
    };
    if rule.accepts(c.count_set(rule.flags)) {
        return Ok(());
    }
    Err(NgsiError::new(
        FUNC,
        1,
        rule.describe(),
        ErrorKind::ValidationFailed,
    ))
}

/// String flags with a closed value set hold a member of it.
pub fn check_choices(c: &Context<'_>) -> Result<(), NgsiError> {
    const FUNC: &str = "check_choices";

    for (slot, spec) in c.table().iter() {
        if spec.choices.is_empty() || !c.bound().is_set(slot) {
            continue;
        }
        let value = c.string(spec.name).to_lowercase();
        if !spec.choices.contains(&value.as_str()) {
            return Err(NgsiError::new(
                FUNC,
                1,
                format!(
                    "specify one of {} to --{}",
                    join_choices(spec.choices),
                    spec.name
                ),
                ErrorKind::InvalidChoice,
            ));
        }
    }
    Ok(())
}

fn join_choices(choices: &[&str]) -> String {
    match choices.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

/// The `--host` profile is of a kind the command accepts.
///
/// Hosts that do not resolve are skipped; the resolver reports them.
pub fn check_server_kind(c: &Context<'_>, config: &Config) -> Result<(), NgsiError> {
    const FUNC: &str = "check_server_kind";

    let Some(kinds) = c.path().iter().rev().find_map(|cmd| cmd.server_kinds) else {
        return Ok(());
    };
    let Some(host) = host_flag(c).filter(|spec| c.is_set(spec.name)) else {
        return Ok(());
    };
    let Ok(profile) = lookup_profile(config, &c.string(host.name)) else {
        return Ok(());
    };

    let kind = profile.kind().unwrap_or_default();
    if kinds.contains(&kind.as_str()) {
        return Ok(());
    }

    let message = match kind.as_str() {
        "brokerld" if kinds.contains(&"brokerv2") => "only available on NGSIv2".to_string(),
        "brokerv2" if kinds.contains(&"brokerld") => "only available on NGSI-LD".to_string(),
        k if k.starts_with("broker") => "not supported by broker".to_string(),
        "" => format!("not supported by {}", profile.base_url),
        _ => format!(
            "not supported by {}",
            profile.server_type.as_deref().unwrap_or_default()
        ),
    };
    Err(NgsiError::new(
        FUNC,
        1,
        message,
        ErrorKind::UnsupportedServerKind,
    ))
}
