//! JSON tokenization through the logos lexer library.
//!
//! Logos kinds map onto the engine's string token types: `null`, `bool`, `op`, `string`
//! and `number`. Whitespace is skipped.

use crate::lexing::LexError;
use crate::token::{SliceTokenStream, Token};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum JsonToken {
    #[token("null")]
    Null,
    #[token("true")]
    #[token("false")]
    Bool,
    #[regex(r"[{},:\[\]]")]
    Op,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][-+]?[0-9]+)?")]
    Number,
}

impl JsonToken {
    pub fn type_name(self) -> &'static str {
        match self {
            JsonToken::Null => "null",
            JsonToken::Bool => "bool",
            JsonToken::Op => "op",
            JsonToken::String => "string",
            JsonToken::Number => "number",
        }
    }
}

/// Tokenise JSON source text.
pub fn tokenise(source: &str) -> Result<SliceTokenStream, LexError> {
    let mut lexer = JsonToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token::new(kind.type_name(), lexer.slice())),
            Err(()) => {
                return Err(LexError::NoMatch {
                    offset: lexer.span().start,
                })
            }
        }
    }

    Ok(SliceTokenStream::new(tokens))
}
