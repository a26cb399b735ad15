//! S-expression grammar
//!
//!     SExpr ::= number | string | atom | List
//!     List  ::= "(" SExpr* ")"
//!
//! Comments (`;` to end of line) are real tokens, dropped by the rules themselves.

use crate::lexing::{LexError, TokenDef, Tokeniser};
use crate::rule::Match;
use crate::token::{SliceTokenStream, Token};
use crate::Rule;
use once_cell::sync::Lazy;

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(one_of, drop = "comment")]
pub struct SExpr {
    #[rule(tok = "number")]
    pub number: Option<Token>,
    #[rule(tok = "string")]
    pub string: Option<Token>,
    #[rule(tok = "atom")]
    pub atom: Option<Token>,
    pub list: Option<List>,
}

#[derive(Debug, Default, Clone, PartialEq, Rule)]
#[rule(seq, drop = "comment")]
pub struct List {
    #[rule(tok = "bkt,(")]
    pub open: Match,
    pub items: Vec<SExpr>,
    #[rule(tok = "bkt,)")]
    pub close: Match,
}

static TOKENISER: Lazy<Tokeniser> = Lazy::new(|| {
    Tokeniser::new(vec![
        TokenDef::skip(r"\s+"),
        TokenDef::new("comment", r";[^\n]*"),
        TokenDef::new("bkt", r"[()]"),
        TokenDef::new("string", r#""[^"]*""#),
        TokenDef::new("number", r"-?[0-9]+(?:\.[0-9]+)?"),
        TokenDef::new("atom", r"[a-zA-Z_][a-zA-Z0-9_-]*"),
    ])
    .unwrap()
});

pub fn tokenise(source: &str) -> Result<SliceTokenStream, LexError> {
    TOKENISER.tokenise(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse, parse_complete, Cause};
    use crate::token::TokenStream;

    #[test]
    fn test_nested_lists() {
        let mut tokens = tokenise(r#"(cons a (list 123 "c"))"#).unwrap();
        let sexpr: SExpr = parse_complete(&mut tokens).unwrap();
        let list = sexpr.list.unwrap();
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.items[0].atom, Some(Token::new("atom", "cons")));
        let inner = list.items[2].list.as_ref().unwrap();
        assert_eq!(inner.items[1].number, Some(Token::new("number", "123")));
        assert_eq!(inner.items[2].string, Some(Token::new("string", "\"c\"")));
    }

    #[test]
    fn test_comments_are_dropped() {
        let source = "; leading\n(a ; inside\n b ; before close\n)";
        let mut tokens = tokenise(source).unwrap();
        let sexpr: SExpr = parse(&mut tokens).unwrap();
        let atoms: Vec<_> = sexpr
            .list
            .unwrap()
            .items
            .iter()
            .filter_map(|item| item.atom.as_ref().map(|t| t.value().to_string()))
            .collect();
        assert_eq!(atoms, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_list() {
        let mut tokens = tokenise("()").unwrap();
        let sexpr: SExpr = parse_complete(&mut tokens).unwrap();
        assert!(sexpr.list.unwrap().items.is_empty());
    }

    #[test]
    fn test_trailing_comment_is_not_trailing_input() {
        let mut tokens = tokenise("(a) ; trailing comment").unwrap();
        let sexpr: SExpr = parse_complete(&mut tokens).unwrap();
        assert_eq!(sexpr.list.unwrap().items.len(), 1);
        assert_eq!(tokens.save(), 3);

        let mut tokens = tokenise("(a)\n; end\nb").unwrap();
        let err = parse_complete::<SExpr>(&mut tokens).unwrap_err();
        assert_eq!(err.pos, 4);
        assert_eq!(err.cause, Cause::TrailingInput);
    }

    #[test]
    fn test_unclosed_list_reports_end_of_input() {
        let mut tokens = tokenise("(a (b)").unwrap();
        let err = parse::<SExpr>(&mut tokens).unwrap_err();
        assert_eq!(err.pos, 5);
        assert!(err.token.is_eof());
    }
}
