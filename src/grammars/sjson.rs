//! Simplified JSON
//!
//! Scalars are token leaves stored directly in the alternative, with no wrapper rule per
//! kind. There is no `null`: the tokeniser knows the word but the grammar does not accept it.

use super::json::{compile_bool, compile_number, compile_string, Compile, CompileError};
use crate::lexing::{LexError, TokenDef, Tokeniser};
use crate::rule::Match;
use crate::token::{SliceTokenStream, Token};
use crate::Rule;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(one_of)]
pub struct Sjson {
    #[rule(tok = "number")]
    pub number: Option<Token>,
    #[rule(tok = "string")]
    pub string: Option<Token>,
    #[rule(tok = "bool")]
    pub boolean: Option<Token>,
    pub list: Option<List>,
    pub object: Option<Object>,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct List {
    #[rule(tok = "op,[")]
    pub open: Match,
    #[rule(sep = "op,,")]
    pub items: Vec<Sjson>,
    #[rule(tok = "op,]")]
    pub close: Match,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Object {
    #[rule(tok = "op,{")]
    pub open: Match,
    #[rule(sep = "op,,")]
    pub items: Vec<Pair>,
    #[rule(tok = "op,}")]
    pub close: Match,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq)]
pub struct Pair {
    #[rule(tok = "string")]
    pub key: Token,
    #[rule(tok = "op,:")]
    pub colon: Match,
    pub value: Sjson,
}

static TOKENISER: Lazy<Tokeniser> = Lazy::new(|| {
    Tokeniser::new(vec![
        TokenDef::skip(r"\s+"),
        TokenDef::new("op", r"[\[\]{},:]"),
        TokenDef::new("string", r#""[^"]*""#),
        TokenDef::new("number", r"-?[0-9]+(?:\.[0-9]+)?"),
        TokenDef::new("bool", r"true|false"),
        TokenDef::new("null", r"null"),
    ])
    .unwrap()
});

pub fn tokenise(source: &str) -> Result<SliceTokenStream, LexError> {
    TOKENISER.tokenise(source)
}

impl Compile for Sjson {
    fn compile(&self) -> Result<Value, CompileError> {
        if let Some(number) = &self.number {
            compile_number(number)
        } else if let Some(string) = &self.string {
            compile_string(string).map(Value::String)
        } else if let Some(boolean) = &self.boolean {
            compile_bool(boolean)
        } else if let Some(list) = &self.list {
            list.items
                .iter()
                .map(Compile::compile)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        } else if let Some(object) = &self.object {
            let mut map = Map::new();
            for pair in &object.items {
                map.insert(compile_string(&pair.key)?, pair.value.compile()?);
            }
            Ok(Value::Object(map))
        } else {
            Err(CompileError::EmptyNode("Sjson"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse, parse_complete};
    use serde_json::json;

    #[test]
    fn test_list() {
        let mut tokens = tokenise("[1, 2, 3]").unwrap();
        let value: Sjson = parse_complete(&mut tokens).unwrap();
        let items = &value.list.as_ref().unwrap().items;
        let numbers: Vec<_> = items
            .iter()
            .filter_map(|item| item.number.as_ref().map(Token::value))
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
        assert_eq!(value.compile().unwrap(), json!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_object() {
        let source = r#"
            {
                "name": "Bob",
                "score": 999,
                "awards": ["fast", "blob"],
                "penalties": []
            }
        "#;
        let mut tokens = tokenise(source).unwrap();
        let value: Sjson = parse_complete(&mut tokens).unwrap();
        assert_eq!(
            value.compile().unwrap(),
            json!({"name": "Bob", "score": 999.0, "awards": ["fast", "blob"], "penalties": []})
        );
    }

    #[test]
    fn test_null_is_not_a_value() {
        let mut tokens = tokenise("[null]").unwrap();
        let err = parse::<Sjson>(&mut tokens).unwrap_err();
        assert_eq!(err.pos, 1);
        assert_eq!(err.token.token_type(), "null");
    }
}
