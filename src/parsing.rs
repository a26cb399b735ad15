//! Parsing
//!
//!     The engine interprets compiled rule descriptors against a [`TokenStream`]. It is a
//!     plain recursive descent with full backtracking: no memoization, no left recursion,
//!     and every failed attempt rewinds the stream to where it started.
//!
//! Entry points
//!
//!     [`parse`] matches the root rule at the start of the stream and leaves the rest.
//!     [`parse_complete`] also requires the root rule to consume everything but tokens its
//!     own drop filter would skip. On failure both
//!     report the furthest error reached anywhere during the parse, not just the error of
//!     the last branch tried.
//!
//!     ```rust
//!     use grammar::grammars::json::{self, Json};
//!
//!     let mut tokens = json::tokenise(r#"[1, {"a": null}]"#)?;
//!     let json: Json = grammar::parse_complete(&mut tokens)?;
//!     ```

pub mod engine;
pub mod error;
pub mod leaves;
pub mod state;

pub use error::{Cause, ParseError};
pub use state::ParserState;

use crate::rule::Rule;
use crate::ruledef::TokenOptions;
use crate::token::TokenStream;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Require the root rule to be followed by end of input
    pub complete: bool,
    /// Log rule entry and exit at trace level
    pub trace: bool,
}

/// Parse a root rule from the start of `stream`.
pub fn parse<R: Rule>(stream: &mut dyn TokenStream) -> Result<R, ParseError> {
    parse_with_options(stream, &ParseOptions::default())
}

/// Parse a root rule that must span the whole of `stream`.
pub fn parse_complete<R: Rule>(stream: &mut dyn TokenStream) -> Result<R, ParseError> {
    parse_with_options(
        stream,
        &ParseOptions {
            complete: true,
            ..ParseOptions::default()
        },
    )
}

/// Parse into an existing node, replacing its contents on success.
pub fn parse_into<R: Rule>(dest: &mut R, stream: &mut dyn TokenStream) -> Result<(), ParseError> {
    *dest = parse(stream)?;
    Ok(())
}

/// On failure the stream is rewound to where it was.
pub fn parse_with_options<R: Rule>(
    stream: &mut dyn TokenStream,
    options: &ParseOptions,
) -> Result<R, ParseError> {
    let mut state = ParserState::new(stream).traced(options.trace);
    let start = state.save();
    let result = R::parse(&mut state, &TokenOptions::default()).and_then(|node| {
        if options.complete {
            let pos = state.save();
            if let Some(drop) = R::drop_filter() {
                state.drop_tokens(drop);
            }
            let at = state.save();
            let token = state.next_token();
            if !token.is_eof() {
                return Err(ParseError::new(token, at, Cause::TrailingInput));
            }
            state.restore(pos);
        }
        Ok(node)
    });

    result.map_err(|err| {
        let err = state.take_furthest(err);
        log::debug!("parse failed: {err}");
        state.restore(start);
        err
    })
}
