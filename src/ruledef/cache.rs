//! Process-wide descriptor cache
//!
//! Each rule type is compiled at most once. The compiled descriptor (or the grammar error)
//! is leaked into `'static` storage so callers can hold on to it without touching the lock
//! again.

use super::{compile, GrammarError, RuleDescriptor};
use crate::rule::Declared;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Entry = Result<&'static RuleDescriptor, GrammarError>;

static DESCRIPTORS: Lazy<Mutex<HashMap<TypeId, Entry>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn lock() -> MutexGuard<'static, HashMap<TypeId, Entry>> {
    // Entries are only ever inserted whole, so a poisoned map is still consistent.
    DESCRIPTORS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The descriptor of `R`, compiling it on first use.
///
/// The lock is held while compiling, so concurrent first uses compile `R` once.
/// Compiling only reads the declaration and never reenters the cache.
pub fn try_descriptor<R: Declared>() -> Result<&'static RuleDescriptor, GrammarError> {
    lock()
        .entry(TypeId::of::<R>())
        .or_insert_with(|| compile(&R::declaration()).map(|d| &*Box::leak(Box::new(d))))
        .clone()
}

/// The descriptor of `R`.
///
/// # Panics
///
/// If the declaration of `R` is malformed. A malformed grammar is a programming error and
/// the panic message names the rule and the problem; use [`try_descriptor`] to inspect it
/// instead.
pub fn descriptor<R: Declared>() -> &'static RuleDescriptor {
    match try_descriptor::<R>() {
        Ok(descriptor) => descriptor,
        Err(err) => panic!("invalid grammar: {err}"),
    }
}

/// Whether `R` has already been compiled.
pub fn is_cached<R: Declared>() -> bool {
    lock().contains_key(&TypeId::of::<R>())
}
