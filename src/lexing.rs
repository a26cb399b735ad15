//! Lexing
//!
//!     Lexers sit outside the engine: they turn source text into a [`SliceTokenStream`]
//!     and the engine only ever sees the resulting tokens. Two lexers ship with the crate:
//!
//!         1. The generic [`Tokeniser`]: an ordered table of regex token definitions, with
//!            optional named lexical modes (push/pop) for context-sensitive tokenizing.
//!            See [tokeniser](tokeniser).
//!         2. A logos lexer for JSON, living next to the JSON grammar. See
//!            [json](crate::grammars::json).
//!
//!     Definitions without a name match and discard their text, which is how insignificant
//!     whitespace is usually handled. Grammars that want to see such tokens (and drop them
//!     with a rule-level filter instead) simply give them a name.
//!
//! [`SliceTokenStream`]: crate::token::SliceTokenStream

pub mod tokeniser;

pub use tokeniser::{TokenDef, Tokeniser};

use std::fmt;

/// Errors that can occur while tokenizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A token pattern failed to compile
    Pattern(String),
    /// The tokeniser was built without any token definitions
    NoDefinitions,
    /// A definition pushes a mode no definition belongs to
    UnknownMode(String),
    /// No definition matches the input at this byte offset
    NoMatch { offset: usize },
    /// A definition matched the empty string at this byte offset
    EmptyMatch { offset: usize },
    /// A definition pops the mode stack while it is empty
    NoModeToPop { offset: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Pattern(msg) => write!(f, "invalid token pattern: {msg}"),
            LexError::NoDefinitions => write!(f, "no token definitions"),
            LexError::UnknownMode(mode) => write!(f, "unknown lexical mode '{mode}'"),
            LexError::NoMatch { offset } => write!(f, "invalid input at byte {offset}"),
            LexError::EmptyMatch { offset } => write!(f, "empty token at byte {offset}"),
            LexError::NoModeToPop { offset } => write!(f, "no mode to pop at byte {offset}"),
        }
    }
}

impl std::error::Error for LexError {}
