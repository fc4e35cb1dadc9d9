//! cli::token
//!
//! Cursor over argv with one token of lookahead.

/// How a raw token reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--name`
    Name(&'a str),
    /// `-alias`
    Alias(&'a str),
    /// Anything else, including a bare `-` or `--`.
    Word(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix("--") {
            if !name.is_empty() {
                return Token::Name(name);
            }
        } else if let Some(alias) = raw.strip_prefix('-') {
            if !alias.is_empty() {
                return Token::Alias(alias);
            }
        }
        Token::Word(raw)
    }
}

#[derive(Debug)]
pub struct Tokens<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.args.get(self.pos).map(String::as_str)
    }

    pub fn advance(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    pub fn is_first(&self) -> bool {
        self.pos == 0
    }
}
