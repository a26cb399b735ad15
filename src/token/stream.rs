//! Token streams
//!
//! The engine only needs three operations from a token source: consume the next token,
//! remember the current position and go back to a remembered position. Anything honoring
//! that contract can drive a parse, including sources that tokenize on demand.

use super::Token;

/// A rewindable cursor over a sequence of tokens.
///
/// `restore` must only be given positions previously returned by `save` on the same
/// stream. Implementations may panic otherwise.
pub trait TokenStream {
    /// Consume the next token and return it. Past the end this returns [`Token::eof`].
    fn next(&mut self) -> Token;
    /// The current position.
    fn save(&self) -> usize;
    /// Rewind (or fast-forward) to a saved position.
    fn restore(&mut self, pos: usize);
}

/// A token stream over a pre-materialized vector of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceTokenStream {
    tokens: Vec<Token>,
    current: usize,
}

impl SliceTokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        SliceTokenStream { tokens, current: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for SliceTokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        SliceTokenStream::new(tokens)
    }
}

impl FromIterator<Token> for SliceTokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        SliceTokenStream::new(iter.into_iter().collect())
    }
}

impl TokenStream for SliceTokenStream {
    fn next(&mut self) -> Token {
        match self.tokens.get(self.current) {
            Some(token) => {
                self.current += 1;
                token.clone()
            }
            None => Token::eof(),
        }
    }

    fn save(&self) -> usize {
        self.current
    }

    fn restore(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "restore to unsaved position {pos}");
        self.current = pos;
    }
}
