//! Built-in rules that are not declared as structs.

use super::error::ParseError;
use super::state::ParserState;
use crate::rule::{Match, Rule};
use crate::ruledef::TokenOptions;
use crate::token::Token;

/// Stores the matched token.
impl Rule for Token {
    fn parse(state: &mut ParserState<'_>, opts: &TokenOptions) -> Result<Self, ParseError> {
        state.match_next(opts)
    }
}

impl Rule for Match {
    fn parse(state: &mut ParserState<'_>, opts: &TokenOptions) -> Result<Self, ParseError> {
        state.match_next(opts).map(|_| Match)
    }
}

/// Indirection for recursive grammars.
impl<T: Rule> Rule for Box<T> {
    fn parse(state: &mut ParserState<'_>, opts: &TokenOptions) -> Result<Self, ParseError> {
        T::parse(state, opts).map(Box::new)
    }

    fn drop_filter() -> Option<&'static TokenOptions> {
        T::drop_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruledef::parse_token_directive;
    use crate::token::SliceTokenStream;

    #[test]
    fn test_token_leaf() {
        let mut s: SliceTokenStream = vec![Token::new("number", "7")].into();
        let mut state = ParserState::new(&mut s);
        let opts = parse_token_directive("number").unwrap();
        assert_eq!(Token::parse(&mut state, &opts).unwrap(), Token::new("number", "7"));
    }

    #[test]
    fn test_match_leaf_checks_value() {
        let mut s: SliceTokenStream = vec![Token::new("op", "]")].into();
        let mut state = ParserState::new(&mut s);
        let opts = parse_token_directive("op,[").unwrap();
        assert!(Match::parse(&mut state, &opts).is_err());
        assert_eq!(state.save(), 0);
    }

    #[test]
    fn test_boxed_leaf() {
        let mut s: SliceTokenStream = vec![Token::new("word", "a")].into();
        let mut state = ParserState::new(&mut s);
        let boxed = <Box<Token>>::parse(&mut state, &TokenOptions::default()).unwrap();
        assert_eq!(boxed.value(), "a");
    }
}
