//! The sequence and alternative engines
//!
//!     Derived rules do not parse themselves: their `Rule::parse` hands over to
//!     [`parse_declared`], which looks up the compiled descriptor and walks it, calling back
//!     into the struct (through [`Declared::parse_field`]) to parse and store each field.
//!
//!     Sequence: fields in declaration order. An "item" is one Single or Optional field value
//!     or one repetition of a Repeated field. Before every item the drop filter runs; before
//!     every item but the first the rule-level separator is matched (and the drop filter runs
//!     again). A separator and the item it precedes are one attempt: if the item fails, both
//!     are rewound. A sequence that matched no item at all fails with an empty match.
//!
//!     Alternative: the drop filter runs once, then each field is tried in declaration order
//!     from the same position, each on a fresh node. The first that matches wins. A Repeated
//!     alternative matches when it collected at least one repetition (and at least `min`).
//!
//!     Any rule that fails restores the stream to where it started.

use super::error::{Cause, ParseError};
use super::state::ParserState;
use crate::rule::Declared;
use crate::ruledef::{
    descriptor, Cardinality, Combinator, FieldDescriptor, RuleDescriptor, TokenOptions,
};

/// Parse a derived rule.
///
/// A non-empty `opts` is a lookahead guard: the first token the rule would see (after its
/// drop filter) must satisfy it. The guard never consumes.
pub fn parse_declared<R: Declared>(
    state: &mut ParserState<'_>,
    opts: &TokenOptions,
) -> Result<R, ParseError> {
    let descriptor = descriptor::<R>();
    let start = state.save();
    if !opts.is_empty() {
        state.drop_tokens(&descriptor.drop);
        let guard = state.check_next(opts);
        state.restore(start);
        guard?;
    }

    state.enter(descriptor.name);
    let result = match descriptor.combinator {
        Combinator::Seq => parse_seq::<R>(descriptor, state),
        Combinator::OneOf => parse_one_of::<R>(descriptor, state),
    };
    state.leave(descriptor.name, result.is_ok());
    if result.is_err() {
        state.restore(start);
    }
    result
}

/// What runs between the items of a rule.
struct Between<'d> {
    drop: &'d TokenOptions,
    separator: Option<&'d FieldDescriptor>,
    rule: &'d RuleDescriptor,
}

fn parse_seq<R: Declared>(
    descriptor: &RuleDescriptor,
    state: &mut ParserState<'_>,
) -> Result<R, ParseError> {
    let between = Between {
        drop: &descriptor.drop,
        separator: descriptor.separator.as_ref(),
        rule: descriptor,
    };
    let mut node = R::default();
    let mut items = 0;
    for field in &descriptor.fields {
        match field.cardinality {
            Cardinality::Single => {
                attempt_item(&mut node, &between, field, items, state)?;
                items += 1;
            }
            Cardinality::Optional => {
                let pos = state.save();
                match attempt_item(&mut node, &between, field, items, state) {
                    Ok(()) => items += 1,
                    Err(_) => state.restore(pos),
                }
            }
            Cardinality::Repeated => {
                items += repeat(&mut node, &between, field, items, field.size.min, state)?;
            }
        }
    }

    if items == 0 {
        let err = state.error_here(Cause::EmptyMatch);
        return Err(state.record(err));
    }
    Ok(node)
}

fn parse_one_of<R: Declared>(
    descriptor: &RuleDescriptor,
    state: &mut ParserState<'_>,
) -> Result<R, ParseError> {
    state.drop_tokens(&descriptor.drop);
    let start = state.save();
    let nothing = TokenOptions::default();
    let between = Between {
        drop: &nothing,
        separator: None,
        rule: descriptor,
    };

    let mut err: Option<ParseError> = None;
    for field in &descriptor.fields {
        let mut node = R::default();
        let outcome = match field.cardinality {
            Cardinality::Repeated => {
                let min = field.size.min.max(1);
                repeat(&mut node, &between, field, 0, min, state).map(|_| ())
            }
            Cardinality::Single | Cardinality::Optional => {
                node.parse_field(field.index, state, &field.tokens)
            }
        };
        match outcome {
            Ok(()) => return Ok(node),
            Err(e) => {
                state.restore(start);
                err = Some(ParseError::merge_opt(err, e));
            }
        }
    }

    match err {
        Some(err) => Err(err),
        None => {
            let err = state.error_here(Cause::EmptyMatch);
            Err(state.record(err))
        }
    }
}

/// Match one item: drop filter, separator unless it is the first item, the field itself.
/// The caller rewinds on failure.
fn attempt_item<R: Declared>(
    node: &mut R,
    between: &Between<'_>,
    field: &FieldDescriptor,
    items: usize,
    state: &mut ParserState<'_>,
) -> Result<(), ParseError> {
    state.drop_tokens(between.drop);
    if items > 0 {
        if let Some(separator) = between.separator {
            match_separator::<R>(separator, state)?;
            state.drop_tokens(between.drop);
        }
    }
    node.parse_field(field.index, state, &field.tokens)
}

/// The separator is matched into a scratch node and not kept.
fn match_separator<R: Declared>(
    separator: &FieldDescriptor,
    state: &mut ParserState<'_>,
) -> Result<(), ParseError> {
    let pos = state.save();
    let mut scratch = R::default();
    match scratch.parse_field(separator.index, state, &separator.tokens) {
        Ok(()) => Ok(()),
        Err(_) if separator.cardinality == Cardinality::Optional => {
            state.restore(pos);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Match repetitions of `field` until it fails, hits its maximum or stops consuming.
/// Returns the number matched, or an error when that is below `min`.
fn repeat<R: Declared>(
    node: &mut R,
    between: &Between<'_>,
    field: &FieldDescriptor,
    items_before: usize,
    min: usize,
    state: &mut ParserState<'_>,
) -> Result<usize, ParseError> {
    let mut count = 0;
    let mut last_err = None;
    while field.size.allows_more(count) {
        let pos = state.save();
        if count > 0 && !field.separator.is_empty() {
            state.drop_tokens(between.drop);
            if let Err(err) = state.match_next(&field.separator) {
                state.restore(pos);
                last_err = Some(err);
                break;
            }
        }
        if let Err(err) = attempt_item(node, between, field, items_before + count, state) {
            state.restore(pos);
            last_err = Some(err);
            break;
        }
        count += 1;
        if state.save() == pos {
            break;
        }
    }

    if count < min {
        return Err(match last_err {
            Some(err) => err,
            None => {
                let err = state.error_here(Cause::Message(format!(
                    "{}.{} needs at least {min} repetitions, got {count}",
                    between.rule.name, field.name
                )));
                state.record(err)
            }
        });
    }
    Ok(count)
}
