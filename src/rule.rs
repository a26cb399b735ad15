//! The rule traits
//!
//!     [`Rule`] is anything the engine can parse: tokens, the [`Match`] marker, boxes of rules
//!     and every struct deriving `Rule`. A parse always receives the token constraint of the
//!     field it is being stored into; leaves match a token against it, derived rules use it as
//!     a lookahead guard.
//!
//!     [`Declared`] is the part the derive generates for grammar structs: the raw declaration
//!     handed to the descriptor compiler, and index based access to the fields so the engine
//!     and the printer can work from the compiled descriptor without knowing the struct.

use crate::formats::pretty::PrettyWrite;
use crate::parsing::error::ParseError;
use crate::parsing::state::ParserState;
use crate::ruledef::{Declaration, TokenOptions};

/// A grammar node that can be parsed from a token stream.
pub trait Rule: PrettyWrite + Sized {
    /// Parse one node. On failure the stream is left where it was when `parse` was called.
    fn parse(state: &mut ParserState<'_>, opts: &TokenOptions) -> Result<Self, ParseError>;

    /// Tokens this rule skips between its items, if it has a drop filter.
    fn drop_filter() -> Option<&'static TokenOptions> {
        None
    }
}

/// A rule declared as a struct. Implemented by `#[derive(Rule)]`.
pub trait Declared: Rule + Default + 'static {
    fn declaration() -> Declaration;

    /// Parse the field at `index` and store the result: assign a single field, set an
    /// optional one, push onto a repeated one.
    fn parse_field(
        &mut self,
        index: usize,
        state: &mut ParserState<'_>,
        opts: &TokenOptions,
    ) -> Result<(), ParseError>;

    fn field_view(&self, index: usize) -> FieldView<'_>;
}

/// Borrowed view of one field's contents.
pub enum FieldView<'a> {
    Single(&'a dyn PrettyWrite),
    Optional(Option<&'a dyn PrettyWrite>),
    Repeated(Vec<&'a dyn PrettyWrite>),
}

impl FieldView<'_> {
    /// Whether the field holds nothing (an unset option or an empty list).
    pub fn is_empty(&self) -> bool {
        match self {
            FieldView::Single(_) => false,
            FieldView::Optional(value) => value.is_none(),
            FieldView::Repeated(items) => items.is_empty(),
        }
    }
}

/// A rule that matches one token and stores nothing.
///
/// Used for punctuation and keywords whose only job is to be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Match;
