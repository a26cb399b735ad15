//! JSON grammar
//!
//!     Json     ::= Number | String | Null | Bool | Array | Dict
//!     Array    ::= "[" [Json ("," Json)*] "]"
//!     Dict     ::= "{" [DictItem ("," DictItem)*] "}"
//!     DictItem ::= String ":" Json
//!
//! Parse trees compile into [`serde_json::Value`]s. Numbers compile to floats.

pub mod lexer;

pub use lexer::tokenise;

use super::DocumentError;
use crate::parsing::{parse_with_options, ParseOptions};
use crate::rule::Match;
use crate::token::Token;
use crate::Rule;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(one_of)]
pub struct Json {
    pub number: Option<Number>,
    pub string: Option<Str>,
    pub null: Option<Null>,
    pub boolean: Option<Bool>,
    pub array: Option<Array>,
    pub dict: Option<Dict>,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Number {
    #[rule(tok = "number")]
    pub value: Token,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Str {
    #[rule(tok = "string")]
    pub value: Token,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Null {
    #[rule(tok = "null,null")]
    pub value: Token,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Bool {
    #[rule(tok = "bool")]
    pub value: Token,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Array {
    #[rule(tok = "op,[")]
    pub open: Match,
    #[rule(sep = "op,,")]
    pub items: Vec<Json>,
    #[rule(tok = "op,]")]
    pub close: Match,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Dict {
    #[rule(tok = "op,{")]
    pub open: Match,
    #[rule(sep = "op,,")]
    pub items: Vec<DictItem>,
    #[rule(tok = "op,}")]
    pub close: Match,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct DictItem {
    pub key: Str,
    #[rule(tok = "op,:")]
    pub colon: Match,
    pub value: Json,
}

/// Errors that can occur while compiling a parse tree into a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A number token that is not a valid float
    InvalidNumber(String),
    /// A string token that is not a valid JSON string literal
    InvalidString(String),
    InvalidBool(String),
    /// A `one_of` node with no alternative set
    EmptyNode(&'static str),
    /// The language has no compile step
    Unsupported(&'static str),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::InvalidNumber(text) => write!(f, "invalid number literal {text}"),
            CompileError::InvalidString(text) => write!(f, "invalid string literal {text}"),
            CompileError::InvalidBool(text) => write!(f, "invalid boolean literal {text}"),
            CompileError::EmptyNode(rule) => write!(f, "{rule} node has no alternative set"),
            CompileError::Unsupported(lang) => write!(f, "{lang} has no compile step"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Turn a parse tree into a native value.
pub trait Compile {
    fn compile(&self) -> Result<Value, CompileError>;
}

pub(crate) fn compile_number(token: &Token) -> Result<Value, CompileError> {
    token
        .value()
        .parse::<f64>()
        .map(Value::from)
        .map_err(|_| CompileError::InvalidNumber(token.value().to_string()))
}

pub(crate) fn compile_string(token: &Token) -> Result<String, CompileError> {
    serde_json::from_str(token.value())
        .map_err(|_| CompileError::InvalidString(token.value().to_string()))
}

pub(crate) fn compile_bool(token: &Token) -> Result<Value, CompileError> {
    match token.value() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        other => Err(CompileError::InvalidBool(other.to_string())),
    }
}

impl Compile for Json {
    fn compile(&self) -> Result<Value, CompileError> {
        if let Some(number) = &self.number {
            compile_number(&number.value)
        } else if let Some(string) = &self.string {
            compile_string(&string.value).map(Value::String)
        } else if self.null.is_some() {
            Ok(Value::Null)
        } else if let Some(boolean) = &self.boolean {
            compile_bool(&boolean.value)
        } else if let Some(array) = &self.array {
            array.compile()
        } else if let Some(dict) = &self.dict {
            dict.compile()
        } else {
            Err(CompileError::EmptyNode("Json"))
        }
    }
}

impl Compile for Array {
    fn compile(&self) -> Result<Value, CompileError> {
        self.items
            .iter()
            .map(Compile::compile)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl Compile for Dict {
    fn compile(&self) -> Result<Value, CompileError> {
        let mut map = Map::new();
        for item in &self.items {
            map.insert(compile_string(&item.key.value)?, item.value.compile()?);
        }
        Ok(Value::Object(map))
    }
}

/// Tokenise and parse a complete JSON document.
pub fn parse_str(source: &str) -> Result<Json, DocumentError> {
    let mut tokens = tokenise(source)?;
    let options = ParseOptions {
        complete: true,
        ..ParseOptions::default()
    };
    Ok(parse_with_options(&mut tokens, &options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse, Cause};
    use serde_json::json;

    fn compile(source: &str) -> Value {
        parse_str(source).unwrap().compile().unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(compile("42"), json!(42.0));
        assert_eq!(compile(r#""a\nb""#), json!("a\nb"));
        assert_eq!(compile("null"), Value::Null);
        assert_eq!(compile("false"), json!(false));
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(compile("[]"), json!([]));
        assert_eq!(compile("{}"), json!({}));
    }

    #[test]
    fn test_nested() {
        assert_eq!(
            compile(r#"{"a": [1, {"b": null}], "c": "d"}"#),
            json!({"a": [1.0, {"b": null}], "c": "d"})
        );
    }

    #[test]
    fn test_exactly_one_alternative_is_set() {
        let json = parse_str("[true]").unwrap();
        assert!(json.array.is_some());
        assert!(json.number.is_none() && json.dict.is_none() && json.boolean.is_none());
        let items = &json.array.unwrap().items;
        assert_eq!(items.len(), 1);
        assert!(items[0].boolean.is_some());
    }

    #[test]
    fn test_trailing_separator_is_rejected() {
        let mut tokens = tokenise("[1, ]").unwrap();
        let err = parse::<Json>(&mut tokens).unwrap_err();
        assert_eq!(err.pos, 3);
        assert_eq!(err.token.value(), "]");
        assert_eq!(tokens.tokens().len(), 4);
    }

    #[test]
    fn test_trailing_input() {
        let mut tokens = tokenise("1 2").unwrap();
        let err = crate::parsing::parse_complete::<Json>(&mut tokens).unwrap_err();
        assert_eq!(err.cause, Cause::TrailingInput);
        assert_eq!(err.pos, 1);
    }

    #[test]
    fn test_compile_errors() {
        let bad = Json {
            number: Some(Number {
                value: Token::new("number", "1.2.3"),
            }),
            ..Json::default()
        };
        assert_eq!(
            bad.compile().unwrap_err(),
            CompileError::InvalidNumber("1.2.3".to_string())
        );
        assert_eq!(
            Json::default().compile().unwrap_err(),
            CompileError::EmptyNode("Json")
        );
    }
}
