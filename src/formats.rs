//! Output formats for parse trees
//!
//! Parse trees are rendered with the indented [pretty] printer. Structured output
//! (JSON, YAML) goes through a grammar's compile step instead, see
//! [grammars](crate::grammars).

pub mod pretty;

pub use pretty::{
    to_pretty_string, to_pretty_string_with_indent, write_pretty, PrettyPrinter, PrettyWrite,
};
