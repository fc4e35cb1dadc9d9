//! cli::bind
//!
//! Binding flag tokens to slots of a [`FlagTable`].

use super::flag::{parse_bool, FlagKind, FlagValue};
use super::registry::FlagTable;
use super::token::{Token, Tokens};
use crate::core::errors::{ErrorKind, NgsiError};

/// Per-invocation flag values, slot-indexed like the matched node's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundContext {
    values: Vec<FlagValue>,
    set_mask: Vec<bool>,
}

impl BoundContext {
    /// Defaults for every slot of `table`.
    pub fn new(table: &FlagTable) -> Self {
        let mut bound = Self {
            values: Vec::with_capacity(table.len()),
            set_mask: Vec::with_capacity(table.len()),
        };
        bound.extend_to(table);
        bound
    }

    /// Add defaults for the slots `table` has beyond the current ones.
    pub fn extend_to(&mut self, table: &FlagTable) {
        for (_, spec) in table.iter().skip(self.values.len()) {
            self.values.push(spec.initial_value());
            self.set_mask.push(false);
        }
    }

    pub fn set(&mut self, slot: usize, value: FlagValue) {
        self.values[slot] = value;
        self.set_mask[slot] = true;
    }

    pub fn value(&self, slot: usize) -> &FlagValue {
        &self.values[slot]
    }

    pub fn is_set(&self, slot: usize) -> bool {
        self.set_mask.get(slot).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind one flag token, consuming its value from `tokens` as needed.
///
/// Name lookups are exact; alias lookups only see aliases. String and
/// integer flags take the next token verbatim. Bool flags take the next
/// token only if it reads as a bool.
pub fn bind_flag(
    table: &FlagTable,
    bound: &mut BoundContext,
    token: Token<'_>,
    tokens: &mut Tokens<'_>,
) -> Result<(), NgsiError> {
    const FUNC: &str = "bind_flag";

    let (slot, shown) = match token {
        Token::Name(name) => (table.by_name(name), format!("--{}", name)),
        Token::Alias(alias) => (table.by_alias(alias), format!("-{}", alias)),
        Token::Word(word) => (None, word.to_string()),
    };
    let Some(slot) = slot else {
        return Err(NgsiError::new(
            FUNC,
            1,
            format!("unknown flag: {}", shown),
            ErrorKind::UnknownFlag,
        ));
    };

    let spec = table.spec(slot);
    let value = match spec.kind {
        FlagKind::Bool => match tokens.peek().and_then(parse_bool) {
            Some(b) => {
                tokens.advance();
                FlagValue::Bool(b)
            }
            None => FlagValue::Bool(true),
        },
        FlagKind::String | FlagKind::Int64 => {
            let Some(raw) = tokens.advance() else {
                return Err(NgsiError::new(
                    FUNC,
                    2,
                    format!("{}: value missing", shown),
                    ErrorKind::MissingValue,
                ));
            };
            spec.coerce(raw).map_err(|e| NgsiError::wrap(FUNC, 3, e))?
        }
    };

    bound.set(slot, value);
    Ok(())
}
