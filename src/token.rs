//! Core token types shared by the lexers and the parsing engine.
//!
//!     A token is an immutable `(type, value)` pair. The engine never looks inside a token
//!     beyond those two strings: rules constrain tokens by type, by value, or both.
//!
//!     Past the end of input every stream yields the EOF sentinel. It prints as type `EOF`
//!     with value `EOF` but it is not equal to any token a lexer can build, so a grammar can
//!     never accidentally match it.

pub mod stream;

pub use stream::{SliceTokenStream, TokenStream};

use serde::Serialize;
use std::fmt;

const EOF_TEXT: &str = "EOF";

/// A lexical token: its type (e.g. `op`, `number`) and its source text (e.g. `[`, `42`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    token_type: String,
    value: String,
    #[serde(skip)]
    eof: bool,
}

impl Token {
    pub fn new(token_type: impl Into<String>, value: impl Into<String>) -> Self {
        Token {
            token_type: token_type.into(),
            value: value.into(),
            eof: false,
        }
    }

    /// The end-of-stream sentinel.
    pub fn eof() -> Self {
        Token {
            token_type: EOF_TEXT.to_string(),
            value: EOF_TEXT.to_string(),
            eof: true,
        }
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.token_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_distinct_from_lookalike() {
        let lookalike = Token::new("EOF", "EOF");
        assert_ne!(Token::eof(), lookalike);
        assert_eq!(Token::eof().token_type(), lookalike.token_type());
        assert_eq!(Token::eof().value(), lookalike.value());
        assert!(Token::eof().is_eof());
        assert!(!lookalike.is_eof());
    }

    #[test]
    fn test_display_quotes_value() {
        assert_eq!(Token::new("string", "\"a\"").to_string(), r#"string "\"a\"""#);
    }

    #[test]
    fn test_serializes_type_and_value() {
        let json = serde_json::to_string(&Token::new("op", "[")).unwrap();
        assert_eq!(json, r#"{"type":"op","value":"["}"#);
    }
}
