//! # grammar
//!
//! Declarative grammars from annotated Rust structs.
//!
//!     A grammar rule is a struct deriving [`Rule`]. The struct attribute says how its fields
//!     combine (`one_of`: exactly one alternative, `seq`: all of them in order) and the field
//!     types say how often each one occurs (`T` once, `Option<T>` at most once, `Vec<T>` any
//!     number of times). Field attributes constrain the tokens a field may match.
//!
//!     ```rust
//!     use grammar::{Match, Rule, Token};
//!
//!     #[derive(Debug, Default, Rule)]
//!     #[rule(one_of)]
//!     struct Value {
//!         #[rule(tok = "number")]
//!         number: Option<Token>,
//!         list: Option<List>,
//!     }
//!
//!     #[derive(Debug, Default, Rule)]
//!     #[rule(seq)]
//!     struct List {
//!         #[rule(tok = "op,[")]
//!         open: Match,
//!         #[rule(sep = "op,,")]
//!         items: Vec<Value>,
//!         #[rule(tok = "op,]")]
//!         close: Match,
//!     }
//!     ```
//!
//! Layers
//!
//!     1. [token]: tokens and rewindable token streams.
//!     2. [lexing]: lexers producing token streams (a regex table tokeniser with modes).
//!     3. [ruledef]: compiles declarations into cached rule descriptors.
//!     4. [parsing]: the backtracking engine and furthest-error arbitration.
//!     5. [formats]: the pretty printer.
//!     6. [grammars]: bundled JSON, S-expression and simplified JSON grammars.

// Lets the derive's `::grammar::` paths resolve inside this crate too.
extern crate self as grammar;

pub mod formats;
pub mod grammars;
pub mod lexing;
pub mod parsing;
pub mod rule;
pub mod ruledef;
pub mod token;

pub use grammar_derive::Rule;

pub use formats::pretty::{
    to_pretty_string, to_pretty_string_with_indent, write_pretty, PrettyPrinter, PrettyWrite,
};
pub use lexing::{LexError, TokenDef, Tokeniser};
pub use parsing::{
    parse, parse_complete, parse_into, parse_with_options, Cause, ParseError, ParseOptions,
    ParserState,
};
pub use rule::{Declared, FieldView, Match, Rule};
pub use ruledef::{
    Cardinality, Combinator, Declaration, FieldDeclaration, FieldDescriptor, GrammarError,
    Marker, RuleDescriptor, SizeOptions, TokenMatch, TokenOptions,
};
pub use token::{SliceTokenStream, Token, TokenStream};
