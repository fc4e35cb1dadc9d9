//! cli::flag
//!
//! Typed flag declarations and bound flag values.
//!
//! # Design
//!
//! Flags are declared as `static` items with `const fn` builders, so a
//! command tree is plain data that can be shared between commands:
//!
//! ```
//! use ngsiwork::cli::flag::{FlagKind, FlagSpec};
//!
//! static AID: FlagSpec = FlagSpec::string("aid")
//!     .aliases(&["i"])
//!     .usage("application id");
//!
//! assert_eq!(AID.kind, FlagKind::String);
//! assert!(AID.answers_to_alias("i"));
//! ```

use crate::core::errors::{ErrorKind, NgsiError};

/// Declared type of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Bool,
    Int64,
}

/// A bound flag value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagValue {
    String(String),
    Bool(bool),
    Int64(i64),
}

impl FlagValue {
    /// Textual rendering used by string lookups on non-string flags.
    pub fn to_text(&self) -> String {
        match self {
            FlagValue::String(s) => s.clone(),
            FlagValue::Bool(b) => b.to_string(),
            FlagValue::Int64(n) => n.to_string(),
        }
    }
}

/// Default value of a flag. Kept `Copy` so specs can live in statics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDefault {
    Str(&'static str),
    Bool(bool),
    Int64(i64),
}

/// Static declaration of one flag.
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    /// Canonical name, matched as `--name`.
    pub name: &'static str,
    /// Short aliases, matched as `-alias`.
    pub aliases: &'static [&'static str],
    /// Help text. A word wrapped in backticks is the value placeholder.
    pub usage: &'static str,
    pub kind: FlagKind,
    pub default: FlagDefault,
    /// Must be explicitly set on every invocation that can see it.
    pub required: bool,
    /// Omitted from help output.
    pub hidden: bool,
    /// Setting this flag makes the dispatcher build an HTTP client.
    pub init_client: bool,
    /// An explicit empty string is accepted.
    pub allow_empty: bool,
    /// Closed set of accepted lowercase values; empty means any.
    pub choices: &'static [&'static str],
}

impl FlagSpec {
    const fn base(name: &'static str, kind: FlagKind, default: FlagDefault) -> Self {
        Self {
            name,
            aliases: &[],
            usage: "",
            kind,
            default,
            required: false,
            hidden: false,
            init_client: false,
            allow_empty: false,
            choices: &[],
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::base(name, FlagKind::String, FlagDefault::Str(""))
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::base(name, FlagKind::Bool, FlagDefault::Bool(false))
    }

    pub const fn int64(name: &'static str) -> Self {
        Self::base(name, FlagKind::Int64, FlagDefault::Int64(0))
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub const fn init_client(mut self) -> Self {
        self.init_client = true;
        self
    }

    pub const fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    /// Replace the default. The variant should match the flag kind.
    pub const fn default_value(mut self, default: FlagDefault) -> Self {
        self.default = default;
        self
    }

    pub fn answers_to_name(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn answers_to_alias(&self, alias: &str) -> bool {
        self.aliases.contains(&alias)
    }

    /// The value a flag holds before any token binds it.
    pub fn initial_value(&self) -> FlagValue {
        match (self.kind, self.default) {
            (FlagKind::String, FlagDefault::Str(s)) => FlagValue::String(s.to_string()),
            (FlagKind::Bool, FlagDefault::Bool(b)) => FlagValue::Bool(b),
            (FlagKind::Int64, FlagDefault::Int64(n)) => FlagValue::Int64(n),
            (FlagKind::String, _) => FlagValue::String(String::new()),
            (FlagKind::Bool, _) => FlagValue::Bool(false),
            (FlagKind::Int64, _) => FlagValue::Int64(0),
        }
    }

    /// Coerce a raw token to this flag's kind.
    pub fn coerce(&self, raw: &str) -> Result<FlagValue, NgsiError> {
        const FUNC: &str = "coerce";

        match self.kind {
            FlagKind::String => Ok(FlagValue::String(raw.to_string())),
            FlagKind::Int64 => raw.parse::<i64>().map(FlagValue::Int64).map_err(|_| {
                NgsiError::new(
                    FUNC,
                    1,
                    format!("{} is not number", raw),
                    ErrorKind::TypeConversion,
                )
            }),
            FlagKind::Bool => parse_bool(raw).map(FlagValue::Bool).ok_or_else(|| {
                NgsiError::new(
                    FUNC,
                    2,
                    format!("{} is not boolean", raw),
                    ErrorKind::TypeConversion,
                )
            }),
        }
    }

    /// The placeholder word from the usage text, e.g. `VALUE`.
    pub fn placeholder(&self) -> Option<&'static str> {
        let start = self.usage.find('`')?;
        let rest = &self.usage[start + 1..];
        let end = rest.find('`')?;
        Some(&rest[..end])
    }

    /// Usage text without placeholder backticks, plus default or required
    /// annotations.
    pub fn usage_text(&self) -> String {
        let mut text = self.usage.replace('`', "");
        match self.default {
            FlagDefault::Str(s) if !s.is_empty() => text.push_str(&format!(" (default: {})", s)),
            FlagDefault::Bool(true) => text.push_str(" (default: true)"),
            FlagDefault::Int64(n) if n != 0 => text.push_str(&format!(" (default: {})", n)),
            _ => {}
        }
        if self.kind == FlagKind::Bool && !matches!(self.default, FlagDefault::Bool(true)) {
            text.push_str(" (default: false)");
        }
        if self.required {
            text.push_str(" (required)");
        }
        text
    }

    /// Names as shown in help, e.g. `--host VALUE, -h VALUE`.
    pub fn help_names(&self) -> String {
        let suffix = match self.placeholder() {
            Some(p) if self.kind != FlagKind::Bool => format!(" {}", p),
            _ => String::new(),
        };
        let mut names = vec![format!("--{}{}", self.name, suffix)];
        names.extend(self.aliases.iter().map(|a| format!("-{}{}", a, suffix)));
        names.join(", ")
    }
}

/// Parse the bool grammar accepted after a bool flag.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" => Some(true),
        "false" | "off" => Some(false),
        _ => None,
    }
}
