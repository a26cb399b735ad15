//! Parser state
//!
//! Wraps the token stream for the duration of one parse. Besides forwarding the stream
//! operations it keeps the furthest error seen anywhere in the parse, so a failure inside
//! an abandoned branch (a repetition that ended at a deeper mismatch, say) can still be the
//! diagnostic the caller gets.

use super::error::{Cause, ParseError};
use crate::ruledef::TokenOptions;
use crate::token::{Token, TokenStream};

pub struct ParserState<'s> {
    stream: &'s mut dyn TokenStream,
    furthest: Option<ParseError>,
    depth: usize,
    trace: bool,
}

impl<'s> ParserState<'s> {
    pub fn new(stream: &'s mut dyn TokenStream) -> Self {
        ParserState {
            stream,
            furthest: None,
            depth: 0,
            trace: false,
        }
    }

    /// Log rule entry and exit at trace level.
    pub fn traced(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn save(&self) -> usize {
        self.stream.save()
    }

    pub fn restore(&mut self, pos: usize) {
        self.stream.restore(pos)
    }

    pub fn next_token(&mut self) -> Token {
        self.stream.next()
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> Token {
        let pos = self.save();
        let token = self.next_token();
        self.restore(pos);
        token
    }

    /// Recursion depth of the rule currently being parsed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The furthest error recorded so far.
    pub fn furthest(&self) -> Option<&ParseError> {
        self.furthest.as_ref()
    }

    /// Merge `err` into the furthest error and hand it back.
    pub fn record(&mut self, err: ParseError) -> ParseError {
        self.furthest = Some(ParseError::merge_opt(self.furthest.take(), err.clone()));
        err
    }

    /// The furthest recorded error merged with `fallback`.
    pub fn take_furthest(&mut self, fallback: ParseError) -> ParseError {
        ParseError::merge_opt(self.furthest.take(), fallback)
    }

    /// An error at the next token, which is left unconsumed. Not recorded.
    pub fn error_here(&mut self, cause: Cause) -> ParseError {
        let pos = self.save();
        let token = self.peek();
        ParseError::new(token, pos, cause)
    }

    pub(crate) fn enter(&mut self, rule: &str) {
        if self.trace {
            log::trace!(
                "{:indent$}> {rule} at #{}",
                "",
                self.save(),
                indent = self.depth * 2
            );
        }
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self, rule: &str, matched: bool) {
        self.depth = self.depth.saturating_sub(1);
        if self.trace {
            let outcome = if matched { "matched" } else { "failed" };
            log::trace!(
                "{:indent$}< {rule} {outcome} at #{}",
                "",
                self.save(),
                indent = self.depth * 2
            );
        }
    }

    /// Match one token against `opts`.
    ///
    /// An empty constraint accepts any token except EOF. A lookahead alternative leaves the
    /// token in the stream. On failure nothing is consumed and the error is recorded.
    pub fn match_next(&mut self, opts: &TokenOptions) -> Result<Token, ParseError> {
        let pos = self.save();
        let token = self.next_token();
        if opts.is_empty() {
            if token.is_eof() {
                self.restore(pos);
                return Err(self.record(ParseError::new(token, pos, Cause::UnexpectedEof)));
            }
            return Ok(token);
        }
        match opts.find(&token).map(|m| m.lookahead) {
            Some(lookahead) => {
                if lookahead {
                    self.restore(pos);
                }
                Ok(token)
            }
            None => {
                self.restore(pos);
                let constraints = opts.alternatives().to_vec();
                Err(self.record(ParseError::expected(token, pos, constraints)))
            }
        }
    }

    /// Check that the next token satisfies `opts` without consuming it.
    pub fn check_next(&mut self, opts: &TokenOptions) -> Result<(), ParseError> {
        let pos = self.save();
        let result = self.match_next(opts).map(|_| ());
        self.restore(pos);
        result
    }

    /// Consume tokens for as long as they satisfy `drop`.
    pub fn drop_tokens(&mut self, drop: &TokenOptions) {
        if drop.is_empty() {
            return;
        }
        loop {
            let pos = self.save();
            let token = self.next_token();
            if drop.find(&token).is_none() {
                self.restore(pos);
                return;
            }
        }
    }
}
