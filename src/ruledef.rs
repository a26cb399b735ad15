//! Rule Descriptor Compiler
//!
//!     A grammar rule is declared as a struct deriving [`Rule`](grammar_derive::Rule). The
//!     derive does no interpretation: it emits a raw [`Declaration`] (the rule name, the
//!     combinator marker, and for every field its name, cardinality and directive strings).
//!     This module turns that declaration into a [`RuleDescriptor`], the normalized plain data
//!     the engine and the pretty printer are driven by.
//!
//! Compilation
//!
//!     1. The combinator marker must be present (`#[rule(one_of)]` or `#[rule(seq)]`).
//!     2. In a `one_of` rule every field must be optional or repeated: a single required
//!        field could never signal "this alternative did not match".
//!     3. In a `seq` rule a field named `separator` is lifted out of the field list and
//!        becomes the rule-level separator, matched between items.
//!     4. Directive strings are parsed (see [directives](directives)); `size` and `sep` are
//!        only meaningful on repeated fields.
//!
//! Caching
//!
//!     Descriptors are compiled lazily on first use and cached per rule type for the life of
//!     the process. See [cache](cache).

pub mod cache;
pub mod directives;

pub use cache::{descriptor, is_cached, try_descriptor};
pub use directives::{
    parse_size_directive, parse_token_directive, SizeOptions, TokenMatch, TokenOptions,
};

use std::fmt;

/// Name of the field lifted out as a sequence's rule-level separator.
pub const SEPARATOR_FIELD: &str = "separator";

/// How a rule combines its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Exactly one field is populated
    OneOf,
    /// All fields are matched in order
    Seq,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::OneOf => write!(f, "one_of"),
            Combinator::Seq => write!(f, "seq"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    Optional,
    Repeated,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Single => write!(f, "single"),
            Cardinality::Optional => write!(f, "optional"),
            Cardinality::Repeated => write!(f, "repeated"),
        }
    }
}

/// The combinator marker of a declaration, with its drop directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub combinator: Combinator,
    pub drop: &'static str,
}

/// A rule as written by the grammar author, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: &'static str,
    pub marker: Option<Marker>,
    pub fields: Vec<FieldDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: &'static str,
    pub base_type: &'static str,
    pub cardinality: Cardinality,
    pub tok: &'static str,
    pub sep: &'static str,
    pub size: &'static str,
}

/// Compiled metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Position of the field in the declaration, as understood by
    /// [`Declared::parse_field`](crate::rule::Declared::parse_field).
    pub index: usize,
    pub base_type: &'static str,
    pub cardinality: Cardinality,
    pub tokens: TokenOptions,
    pub size: SizeOptions,
    pub separator: TokenOptions,
}

/// Compiled metadata for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub name: &'static str,
    pub combinator: Combinator,
    pub fields: Vec<FieldDescriptor>,
    pub separator: Option<FieldDescriptor>,
    pub drop: TokenOptions,
}

/// A malformed rule declaration. These are programmer errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    MissingMarker {
        rule: &'static str,
    },
    NoFields {
        rule: &'static str,
    },
    SingleAlternative {
        rule: &'static str,
        field: &'static str,
    },
    RepeatedSeparator {
        rule: &'static str,
    },
    MisplacedDirective {
        rule: &'static str,
        field: &'static str,
        directive: &'static str,
    },
    InvalidDirective {
        location: String,
        directive: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MissingMarker { rule } => {
                write!(f, "rule {rule} must be marked #[rule(one_of)] or #[rule(seq)]")
            }
            GrammarError::NoFields { rule } => write!(f, "rule {rule} has no fields"),
            GrammarError::SingleAlternative { rule, field } => write!(
                f,
                "one_of rule {rule}: field {field} must be an Option or a Vec"
            ),
            GrammarError::RepeatedSeparator { rule } => {
                write!(f, "seq rule {rule}: the separator cannot be repeated")
            }
            GrammarError::MisplacedDirective {
                rule,
                field,
                directive,
            } => write!(
                f,
                "{rule}.{field}: '{directive}' only applies to repeated fields"
            ),
            GrammarError::InvalidDirective {
                location,
                directive,
                value,
                reason,
            } => write!(f, "{location}: invalid {directive} = {value:?}: {reason}"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Compile a declaration into a descriptor.
pub fn compile(declaration: &Declaration) -> Result<RuleDescriptor, GrammarError> {
    let rule = declaration.name;
    let marker = declaration
        .marker
        .as_ref()
        .ok_or(GrammarError::MissingMarker { rule })?;
    let drop = parse_token_directive(marker.drop).map_err(|reason| {
        GrammarError::InvalidDirective {
            location: rule.to_string(),
            directive: "drop",
            value: marker.drop.to_string(),
            reason,
        }
    })?;

    let mut fields = Vec::with_capacity(declaration.fields.len());
    let mut separator = None;
    for (index, field) in declaration.fields.iter().enumerate() {
        let compiled = compile_field(rule, index, field)?;
        match marker.combinator {
            Combinator::OneOf if field.cardinality == Cardinality::Single => {
                return Err(GrammarError::SingleAlternative {
                    rule,
                    field: field.name,
                });
            }
            Combinator::Seq if field.name == SEPARATOR_FIELD => {
                if field.cardinality == Cardinality::Repeated {
                    return Err(GrammarError::RepeatedSeparator { rule });
                }
                separator = Some(compiled);
            }
            _ => fields.push(compiled),
        }
    }
    if fields.is_empty() {
        return Err(GrammarError::NoFields { rule });
    }

    Ok(RuleDescriptor {
        name: rule,
        combinator: marker.combinator,
        fields,
        separator,
        drop,
    })
}

fn compile_field(
    rule: &'static str,
    index: usize,
    field: &FieldDeclaration,
) -> Result<FieldDescriptor, GrammarError> {
    let invalid = |directive: &'static str, value: &str, reason: String| {
        GrammarError::InvalidDirective {
            location: format!("{rule}.{}", field.name),
            directive,
            value: value.to_string(),
            reason,
        }
    };
    if field.cardinality != Cardinality::Repeated {
        for (directive, value) in [("size", field.size), ("sep", field.sep)] {
            if !value.is_empty() {
                return Err(GrammarError::MisplacedDirective {
                    rule,
                    field: field.name,
                    directive,
                });
            }
        }
    }

    Ok(FieldDescriptor {
        name: field.name,
        index,
        base_type: field.base_type,
        cardinality: field.cardinality,
        tokens: parse_token_directive(field.tok).map_err(|r| invalid("tok", field.tok, r))?,
        size: parse_size_directive(field.size).map_err(|r| invalid("size", field.size, r))?,
        separator: parse_token_directive(field.sep).map_err(|r| invalid("sep", field.sep, r))?,
    })
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}", self.name, self.base_type, self.cardinality)?;
        if self.cardinality == Cardinality::Repeated {
            write!(f, " {}", self.size)?;
        }
        write!(f, ")")?;
        if !self.tokens.is_empty() {
            write!(f, " tok: {}", self.tokens)?;
        }
        if !self.separator.is_empty() {
            write!(f, " sep: {}", self.separator)?;
        }
        Ok(())
    }
}

impl fmt::Display for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.combinator)?;
        if !self.drop.is_empty() {
            write!(f, ", drop: {}", self.drop)?;
        }
        writeln!(f, ")")?;
        if let Some(separator) = &self.separator {
            writeln!(f, "  [separator] {separator}")?;
        }
        for field in &self.fields {
            writeln!(f, "  {field}")?;
        }
        Ok(())
    }
}
