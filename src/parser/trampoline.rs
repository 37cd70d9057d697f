//! Forward references for recursive grammars.
//!
//! A rule such as `value := number | "[" value,* "]"` needs to mention
//! itself before it exists. A [`Trampoline`] hands out a front parser that
//! delegates to a slot, and the slot is filled once the full rule has been
//! built.
//!
//! Invoking the front before the slot is resolved is a bug in the grammar
//! construction, not a parse failure, and panics.

use std::sync::Arc;

use log::trace;
use once_cell::sync::OnceCell;

use super::combinators::{BoxedParser, Parser};
use super::error::ParseError;
use super::result::ParseResult;
use super::state::ParseState;

/// A late-bound parser slot, resolved exactly once.
pub struct Trampoline<T> {
    slot: Arc<OnceCell<BoxedParser<T>>>,
}

impl<T> Clone for Trampoline<T> {
    fn clone(&self) -> Self {
        Trampoline {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: 'static> Default for Trampoline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Trampoline<T> {
    pub fn new() -> Self {
        Trampoline {
            slot: Arc::new(OnceCell::new()),
        }
    }

    /// A parser delegating to whatever the slot is resolved to.
    ///
    /// It fails with `Unexpected("nesting too deep")` while
    /// [`MAX_NESTING`](crate::parser::MAX_NESTING) recursive calls are
    /// already active.
    ///
    /// # Panics
    ///
    /// The returned parser panics when run before [`Trampoline::resolve`].
    pub fn parser(&self) -> BoxedParser<T> {
        let slot = Arc::clone(&self.slot);
        let too_deep = ParseError::unexpected("nesting too deep");
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let Some(parser) = slot.get() else {
                panic!(
                    "recursive parser for {} invoked before it was resolved",
                    std::any::type_name::<T>()
                );
            };
            if !state.enter_nested() {
                state.report(position, &too_deep);
                return ParseResult::failure(position, Arc::clone(&too_deep));
            }
            let result = parser.parse(state, position);
            state.leave_nested();
            result
        })
    }

    /// Fills the slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot was already resolved.
    pub fn resolve(&self, parser: BoxedParser<T>) {
        if self.slot.set(parser).is_err() {
            panic!(
                "recursive parser for {} resolved twice",
                std::any::type_name::<T>()
            );
        }
        trace!("resolved recursive parser for {}", std::any::type_name::<T>());
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// Builds a self-referential parser.
///
/// `define` receives a handle to the parser being defined and returns its
/// full definition; the handle is resolved to that definition afterwards.
///
/// ```
/// use parcom::parser::{pbetween, pchoice, precursive, pskip_char, puint};
///
/// // nested := integer | "(" nested ")"
/// let nested = precursive(|nested| {
///     pchoice(vec![puint(), pbetween(pskip_char('('), nested, pskip_char(')'))])
/// });
/// assert_eq!(parcom::parser::parse(&nested, "((7))").value, Some(7));
/// ```
pub fn precursive<T, F>(define: F) -> BoxedParser<T>
where
    T: 'static,
    F: FnOnce(BoxedParser<T>) -> BoxedParser<T>,
{
    let trampoline = Trampoline::new();
    let parser = define(trampoline.parser());
    trampoline.resolve(parser.clone());
    parser
}
