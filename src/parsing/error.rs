//! Parse errors and furthest-position arbitration
//!
//! Failed attempts along abandoned branches are not thrown away: they are merged, and the
//! error that got furthest into the input survives. Two errors at the same position are
//! combined, so the final diagnostic lists everything that would have been accepted at the
//! deepest point the input reached.

use crate::ruledef::TokenMatch;
use crate::token::Token;
use std::fmt;

/// Why a match failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    Message(String),
    /// The token satisfied none of these constraints
    Expected(Vec<TokenMatch>),
    /// A sequence matched nothing at all
    EmptyMatch,
    UnexpectedEof,
    /// The root rule matched but input remained
    TrailingInput,
}

impl Cause {
    fn constraints(&self) -> Option<&[TokenMatch]> {
        match self {
            Cause::Expected(constraints) => Some(constraints),
            _ => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Message(msg) => write!(f, "{msg}"),
            Cause::Expected(constraints) => {
                write!(f, "expected ")?;
                let mut seen: Vec<&TokenMatch> = Vec::with_capacity(constraints.len());
                for constraint in constraints {
                    // Lookahead is not part of what the input should have contained.
                    if seen.iter().any(|s| {
                        s.token_type == constraint.token_type
                            && s.token_value == constraint.token_value
                    }) {
                        continue;
                    }
                    if !seen.is_empty() {
                        write!(f, " or ")?;
                    }
                    write!(f, "{constraint}")?;
                    seen.push(constraint);
                }
                if seen.is_empty() {
                    write!(f, "any token")?;
                }
                Ok(())
            }
            Cause::EmptyMatch => write!(f, "empty match"),
            Cause::UnexpectedEof => write!(f, "unexpected end of input"),
            Cause::TrailingInput => write!(f, "expected end of input"),
        }
    }
}

/// A positioned parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The offending token
    pub token: Token,
    /// Its index in the token stream
    pub pos: usize,
    pub cause: Cause,
}

impl ParseError {
    pub fn new(token: Token, pos: usize, cause: Cause) -> Self {
        ParseError { token, pos, cause }
    }

    pub fn expected(token: Token, pos: usize, constraints: Vec<TokenMatch>) -> Self {
        ParseError::new(token, pos, Cause::Expected(constraints))
    }

    /// The violated constraints, if this error carries any.
    pub fn constraints(&self) -> &[TokenMatch] {
        self.cause.constraints().unwrap_or(&[])
    }

    /// Combine with a later error: the furthest wins, and at equal positions constraint
    /// sets are concatenated. If only one side carries constraints it is kept; otherwise
    /// the earlier error is.
    pub fn merge(self, other: ParseError) -> ParseError {
        if other.pos > self.pos {
            return other;
        }
        if other.pos < self.pos {
            return self;
        }
        match (self.cause, other.cause) {
            (Cause::Expected(mut constraints), Cause::Expected(more)) => {
                for constraint in more {
                    if !constraints.contains(&constraint) {
                        constraints.push(constraint);
                    }
                }
                ParseError::expected(self.token, self.pos, constraints)
            }
            (cause @ Cause::Expected(_), _) => ParseError::new(self.token, self.pos, cause),
            (_, cause @ Cause::Expected(_)) => ParseError::new(other.token, other.pos, cause),
            (cause, _) => ParseError::new(self.token, self.pos, cause),
        }
    }

    /// Merge into an optional accumulator. An absent error yields `other`.
    pub fn merge_opt(current: Option<ParseError>, other: ParseError) -> ParseError {
        match current {
            Some(current) => current.merge(other),
            None => other,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "token #{} {} with value {:?}: {}",
            self.pos,
            self.token.token_type(),
            self.token.value(),
            self.cause
        )
    }
}

impl std::error::Error for ParseError {}
