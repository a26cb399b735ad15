//! Field directive mini-languages
//!
//! Token directives: alternatives separated by `|`, each `type[,value]`, with an optional
//! `*` after the type meaning "match without consuming". The type/value split happens at
//! the first comma, so `op,,` is type `op` with value `,`, and `,null` constrains the value
//! only. An empty directive means "any token".
//!
//! Size directives: `min-max`, `min-`, `-max` or an exact count `n`. A `max` of 0 means
//! unbounded.

use crate::token::Token;
use std::fmt;

/// One alternative of a token constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenMatch {
    pub token_type: Option<String>,
    pub token_value: Option<String>,
    /// Match without consuming
    pub lookahead: bool,
}

impl TokenMatch {
    pub fn of_type(token_type: impl Into<String>) -> Self {
        TokenMatch {
            token_type: Some(token_type.into()),
            token_value: None,
            lookahead: false,
        }
    }

    pub fn of_value(token_type: impl Into<String>, value: impl Into<String>) -> Self {
        TokenMatch {
            token_value: Some(value.into()),
            ..TokenMatch::of_type(token_type)
        }
    }

    /// Whether `token` satisfies this alternative. EOF never does.
    pub fn matches(&self, token: &Token) -> bool {
        !token.is_eof()
            && self
                .token_type
                .as_deref()
                .map_or(true, |t| t == token.token_type())
            && self
                .token_value
                .as_deref()
                .map_or(true, |v| v == token.value())
    }
}

impl fmt::Display for TokenMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.token_type, &self.token_value) {
            (_, Some(value)) => write!(f, "value {value:?}"),
            (Some(token_type), None) => write!(f, "type {token_type}"),
            (None, None) => write!(f, "any token"),
        }
    }
}

/// A disjunction of [`TokenMatch`] alternatives. Empty means "any token".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOptions {
    alternatives: Vec<TokenMatch>,
}

impl TokenOptions {
    pub fn new(alternatives: Vec<TokenMatch>) -> Self {
        TokenOptions { alternatives }
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn alternatives(&self) -> &[TokenMatch] {
        &self.alternatives
    }

    /// The first alternative `token` satisfies.
    pub fn find(&self, token: &Token) -> Option<&TokenMatch> {
        self.alternatives.iter().find(|m| m.matches(token))
    }
}

impl fmt::Display for TokenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alternatives.is_empty() {
            return write!(f, "any token");
        }
        for (i, m) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{m}")?;
            if m.lookahead {
                write!(f, " (lookahead)")?;
            }
        }
        Ok(())
    }
}

/// Repetition bounds. `max == 0` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeOptions {
    pub min: usize,
    pub max: usize,
}

impl SizeOptions {
    /// Whether another repetition may be attempted after `count` matches.
    pub fn allows_more(&self, count: usize) -> bool {
        self.max == 0 || count < self.max
    }
}

impl fmt::Display for SizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            0 => write!(f, "{}..", self.min),
            max => write!(f, "{}..={}", self.min, max),
        }
    }
}

/// Parse a token directive such as `op,[|op,{` or `name*`.
pub fn parse_token_directive(directive: &str) -> Result<TokenOptions, String> {
    let mut alternatives = Vec::new();
    for part in directive.split('|') {
        if part.is_empty() {
            continue;
        }
        let (token_type, token_value) = match part.split_once(',') {
            Some((t, v)) => (t, Some(v)),
            None => (part, None),
        };
        let (token_type, lookahead) = match token_type.strip_suffix('*') {
            Some(t) => (t, true),
            None => (token_type, false),
        };
        let token_value = token_value.filter(|v| !v.is_empty());
        if token_type.is_empty() && token_value.is_none() {
            return Err(format!("'{part}' constrains neither type nor value"));
        }
        alternatives.push(TokenMatch {
            token_type: (!token_type.is_empty()).then(|| token_type.to_string()),
            token_value: token_value.map(str::to_string),
            lookahead,
        });
    }
    Ok(TokenOptions::new(alternatives))
}

/// Parse a size directive such as `1-3`, `2-`, `-4` or `5`.
pub fn parse_size_directive(directive: &str) -> Result<SizeOptions, String> {
    if directive.is_empty() {
        return Ok(SizeOptions::default());
    }
    let bound = |text: &str| -> Result<usize, String> {
        if text.is_empty() {
            return Ok(0);
        }
        text.trim()
            .parse()
            .map_err(|_| format!("'{text}' is not a repetition count"))
    };
    let size = match directive.split_once('-') {
        Some((min, max)) => SizeOptions {
            min: bound(min)?,
            max: bound(max)?,
        },
        None => {
            let exact = bound(directive)?;
            if exact == 0 {
                return Err("an exact count must be at least 1".to_string());
            }
            SizeOptions {
                min: exact,
                max: exact,
            }
        }
    };
    if size.max != 0 && size.min > size.max {
        return Err(format!("minimum {} exceeds maximum {}", size.min, size.max));
    }
    Ok(size)
}
