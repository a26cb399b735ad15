//! Indented parse tree printer
//!
//! A rule renders as its name and a braced block holding one line per populated field, each
//! one level deeper. Repeated fields render as a bracketed list of their items. Empty
//! optional and empty repeated fields are left out.
//!
//!     Array {
//!       open: {}
//!       items: [
//!         Json {
//!           number: {number 1}
//!         }
//!       ]
//!       close: {}
//!     }
//!
//! Tokens print as `{<type> <value>}` and the [`Match`] marker as `{}`.

use crate::rule::{Declared, FieldView, Match};
use crate::ruledef::descriptor;
use crate::token::Token;
use std::fmt::{self, Write};

pub const DEFAULT_INDENT: usize = 2;

/// A node the pretty printer can render. Object safe.
pub trait PrettyWrite {
    fn pretty_write(&self, printer: &mut PrettyPrinter<'_>) -> fmt::Result;
}

pub struct PrettyPrinter<'w> {
    out: &'w mut dyn Write,
    width: usize,
    depth: usize,
    /// Field name to prefix the next line with
    label: Option<&'static str>,
}

impl<'w> PrettyPrinter<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        PrettyPrinter {
            out,
            width: DEFAULT_INDENT,
            depth: 0,
            label: None,
        }
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    fn line(&mut self, text: fmt::Arguments<'_>) -> fmt::Result {
        let indent = self.depth * self.width;
        write!(self.out, "{:indent$}", "")?;
        if let Some(label) = self.label.take() {
            write!(self.out, "{label}: ")?;
        }
        writeln!(self.out, "{text}")
    }

    /// A single-line node.
    pub fn leaf(&mut self, text: impl fmt::Display) -> fmt::Result {
        self.line(format_args!("{text}"))
    }

    /// Start a rule block.
    pub fn open(&mut self, name: &str) -> fmt::Result {
        self.line(format_args!("{name} {{"))?;
        self.depth += 1;
        Ok(())
    }

    pub fn close(&mut self) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("}}"))
    }

    /// A named field holding one node.
    pub fn field(&mut self, name: &'static str, value: &dyn PrettyWrite) -> fmt::Result {
        self.label = Some(name);
        value.pretty_write(self)
    }

    /// A named field holding a list of nodes.
    pub fn list(&mut self, name: &'static str, items: &[&dyn PrettyWrite]) -> fmt::Result {
        self.label = Some(name);
        self.line(format_args!("["))?;
        self.depth += 1;
        for item in items {
            item.pretty_write(self)?;
        }
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("]"))
    }
}

/// Render a derived rule from its descriptor.
pub fn write_declared<R: Declared>(node: &R, printer: &mut PrettyPrinter<'_>) -> fmt::Result {
    let descriptor = descriptor::<R>();
    printer.open(descriptor.name)?;
    for field in &descriptor.fields {
        match node.field_view(field.index) {
            FieldView::Single(value) | FieldView::Optional(Some(value)) => {
                printer.field(field.name, value)?
            }
            FieldView::Optional(None) => {}
            FieldView::Repeated(items) => {
                if !items.is_empty() {
                    printer.list(field.name, &items)?;
                }
            }
        }
    }
    printer.close()
}

pub fn to_pretty_string(node: &dyn PrettyWrite) -> String {
    to_pretty_string_with_indent(node, DEFAULT_INDENT)
}

/// Render `node` into `out`, stopping at the first error a node reports.
pub fn write_pretty(out: &mut dyn Write, node: &dyn PrettyWrite, width: usize) -> fmt::Result {
    node.pretty_write(&mut PrettyPrinter::new(out).with_indent(width))
}

/// Render `node` into a string. If a node fails to render, the output ends there and the
/// failure is logged; use [`write_pretty`] to handle it.
pub fn to_pretty_string_with_indent(node: &dyn PrettyWrite, width: usize) -> String {
    let mut out = String::new();
    if let Err(err) = write_pretty(&mut out, node, width) {
        log::warn!("pretty printing stopped early: {err}");
    }
    out
}

impl PrettyWrite for Token {
    fn pretty_write(&self, printer: &mut PrettyPrinter<'_>) -> fmt::Result {
        printer.leaf(format_args!("{{{} {}}}", self.token_type(), self.value()))
    }
}

impl PrettyWrite for Match {
    fn pretty_write(&self, printer: &mut PrettyPrinter<'_>) -> fmt::Result {
        printer.leaf("{}")
    }
}

impl<T: PrettyWrite + ?Sized> PrettyWrite for Box<T> {
    fn pretty_write(&self, printer: &mut PrettyPrinter<'_>) -> fmt::Result {
        (**self).pretty_write(printer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    #[derive(Debug, Default, Rule)]
    #[rule(seq)]
    struct Pair {
        #[rule(tok = "word")]
        key: Token,
        #[rule(tok = "op,=")]
        eq: Match,
        #[rule(tok = "number")]
        values: Vec<Token>,
        #[rule(tok = "comment")]
        note: Option<Token>,
    }

    struct Unprintable;

    impl PrettyWrite for Unprintable {
        fn pretty_write(&self, _printer: &mut PrettyPrinter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_node_errors_stop_the_output() {
        let word = Token::new("word", "a");
        let mut out = String::new();
        let result = PrettyPrinter::new(&mut out).list("items", &[&word, &Unprintable, &word]);
        assert!(result.is_err());
        assert_eq!(out, "items: [\n  {word a}\n");

        let mut out = String::new();
        assert!(write_pretty(&mut out, &Unprintable, DEFAULT_INDENT).is_err());
        assert_eq!(to_pretty_string(&Unprintable), "");
    }

    #[test]
    fn test_leaves() {
        assert_eq!(to_pretty_string(&Token::new("number", "42")), "{number 42}\n");
        assert_eq!(to_pretty_string(&Match), "{}\n");
        assert_eq!(to_pretty_string(&Box::new(Match)), "{}\n");
    }

    #[test]
    fn test_rule_block_omits_empty_fields() {
        let pair = Pair {
            key: Token::new("word", "x"),
            eq: Match,
            values: vec![],
            note: None,
        };
        assert_eq!(to_pretty_string(&pair), "Pair {\n  key: {word x}\n  eq: {}\n}\n");
    }

    #[test]
    fn test_repeated_and_indent_width() {
        let pair = Pair {
            key: Token::new("word", "x"),
            eq: Match,
            values: vec![Token::new("number", "1"), Token::new("number", "2")],
            note: Some(Token::new("comment", "#")),
        };
        assert_eq!(
            to_pretty_string_with_indent(&pair, 4),
            "Pair {\n    key: {word x}\n    eq: {}\n    values: [\n        {number 1}\n        {number 2}\n    ]\n    note: {comment #}\n}\n"
        );
    }
}
