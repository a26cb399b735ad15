//! Bundled grammars
//!
//!     Grammars are plain rule declarations; nothing here extends the engine. They double as
//!     worked examples and as test fixtures:
//!
//!         - [json]: JSON with one wrapper rule per scalar kind, a logos lexer and a compile
//!           step into `serde_json::Value`.
//!         - [sexpr]: S-expressions with comments dropped at the rule level.
//!         - [sjson]: a simplified JSON built from token leaves.
//!
//!     [`Language`] selects one of them by name, the way the CLI does.

pub mod json;
pub mod sexpr;
pub mod sjson;

use crate::formats::pretty::to_pretty_string_with_indent;
use crate::lexing::LexError;
use crate::parsing::{parse_with_options, ParseError, ParseOptions};
use crate::ruledef::{try_descriptor, GrammarError, RuleDescriptor};
use crate::token::SliceTokenStream;
use json::{Compile, CompileError};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Json,
    Sexpr,
    Sjson,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Json, Language::Sexpr, Language::Sjson];

    pub fn name(self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::Sexpr => "sexpr",
            Language::Sjson => "sjson",
        }
    }

    pub fn tokenise(self, source: &str) -> Result<SliceTokenStream, LexError> {
        match self {
            Language::Json => json::tokenise(source),
            Language::Sexpr => sexpr::tokenise(source),
            Language::Sjson => sjson::tokenise(source),
        }
    }

    /// Parse a token stream with this language's root rule.
    pub fn parse(
        self,
        tokens: &mut SliceTokenStream,
        options: &ParseOptions,
    ) -> Result<Document, ParseError> {
        Ok(match self {
            Language::Json => Document::Json(parse_with_options(tokens, options)?),
            Language::Sexpr => Document::Sexpr(parse_with_options(tokens, options)?),
            Language::Sjson => Document::Sjson(parse_with_options(tokens, options)?),
        })
    }

    /// Tokenise and parse source text.
    pub fn parse_str(self, source: &str, options: &ParseOptions) -> Result<Document, DocumentError> {
        let mut tokens = self.tokenise(source)?;
        Ok(self.parse(&mut tokens, options)?)
    }

    /// Descriptors of every rule in the grammar, root first.
    pub fn descriptors(self) -> Result<Vec<&'static RuleDescriptor>, GrammarError> {
        match self {
            Language::Json => Ok(vec![
                try_descriptor::<json::Json>()?,
                try_descriptor::<json::Number>()?,
                try_descriptor::<json::Str>()?,
                try_descriptor::<json::Null>()?,
                try_descriptor::<json::Bool>()?,
                try_descriptor::<json::Array>()?,
                try_descriptor::<json::Dict>()?,
                try_descriptor::<json::DictItem>()?,
            ]),
            Language::Sexpr => Ok(vec![
                try_descriptor::<sexpr::SExpr>()?,
                try_descriptor::<sexpr::List>()?,
            ]),
            Language::Sjson => Ok(vec![
                try_descriptor::<sjson::Sjson>()?,
                try_descriptor::<sjson::List>()?,
                try_descriptor::<sjson::Object>()?,
                try_descriptor::<sjson::Pair>()?,
            ]),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == s)
            .ok_or_else(|| DocumentError::UnknownLanguage(s.to_string()))
    }
}

/// A parsed document of any bundled language.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Json(json::Json),
    Sexpr(sexpr::SExpr),
    Sjson(sjson::Sjson),
}

impl Document {
    pub fn language(&self) -> Language {
        match self {
            Document::Json(_) => Language::Json,
            Document::Sexpr(_) => Language::Sexpr,
            Document::Sjson(_) => Language::Sjson,
        }
    }

    pub fn pretty(&self, indent: usize) -> String {
        match self {
            Document::Json(node) => to_pretty_string_with_indent(node, indent),
            Document::Sexpr(node) => to_pretty_string_with_indent(node, indent),
            Document::Sjson(node) => to_pretty_string_with_indent(node, indent),
        }
    }

    pub fn compile(&self) -> Result<Value, CompileError> {
        match self {
            Document::Json(node) => node.compile(),
            Document::Sexpr(_) => Err(CompileError::Unsupported("sexpr")),
            Document::Sjson(node) => node.compile(),
        }
    }
}

/// Errors from reading a document in one of the bundled languages
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    UnknownLanguage(String),
    Lex(LexError),
    Parse(ParseError),
    Compile(CompileError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::UnknownLanguage(name) => {
                let known: Vec<_> = Language::ALL.iter().map(|l| l.name()).collect();
                write!(f, "unknown language '{name}' (expected {})", known.join(", "))
            }
            DocumentError::Lex(err) => write!(f, "lex error: {err}"),
            DocumentError::Parse(err) => write!(f, "parse error: {err}"),
            DocumentError::Compile(err) => write!(f, "compile error: {err}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::UnknownLanguage(_) => None,
            DocumentError::Lex(err) => Some(err),
            DocumentError::Parse(err) => Some(err),
            DocumentError::Compile(err) => Some(err),
        }
    }
}

impl From<LexError> for DocumentError {
    fn from(err: LexError) -> Self {
        DocumentError::Lex(err)
    }
}

impl From<ParseError> for DocumentError {
    fn from(err: ParseError) -> Self {
        DocumentError::Parse(err)
    }
}

impl From<CompileError> for DocumentError {
    fn from(err: CompileError) -> Self {
        DocumentError::Compile(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.name().parse::<Language>().unwrap(), lang);
        }
        assert!(matches!(
            "toml".parse::<Language>(),
            Err(DocumentError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_every_bundled_grammar_compiles() {
        for lang in Language::ALL {
            let descriptors = lang.descriptors().unwrap();
            assert!(!descriptors.is_empty(), "{lang} has no rules");
        }
    }

    #[test]
    fn test_json_and_sjson_agree() {
        let source = r#"{"xs": [1, 2], "ok": true}"#;
        let options = ParseOptions::default();
        let a = Language::Json.parse_str(source, &options).unwrap();
        let b = Language::Sjson.parse_str(source, &options).unwrap();
        assert_eq!(a.compile().unwrap(), b.compile().unwrap());
        assert_eq!(a.language(), Language::Json);
    }

    #[test]
    fn test_sexpr_has_no_compile_step() {
        let doc = Language::Sexpr
            .parse_str("(a)", &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.compile(), Err(CompileError::Unsupported("sexpr")));
    }

    #[test]
    fn test_errors_are_wrapped() {
        let err = Language::Json
            .parse_str("[1 2]", &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, DocumentError::Parse(ref e) if e.pos == 2));
        assert!(err.to_string().starts_with("parse error: token #2 number"));
    }
}
