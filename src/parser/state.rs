use std::cell::{Cell, RefCell};
use std::sync::Arc;

use super::error::ParseError;

/// How many recursive rules may be active at once before a parse gives up
/// with `Unexpected("nesting too deep")` instead of exhausting the stack.
pub const MAX_NESTING: usize = 256;

/// A half-open byte range `[start, end)` into the input buffer.
///
/// Substrings never copy the input. Borrow the text with
/// [`ParseState::slice`] or materialise it with the `text()` combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubString {
    pub start: usize,
    pub end: usize,
}

impl SubString {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "substring start {start} is past its end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The input buffer of one top-level parse, together with its diagnostic
/// session.
///
/// Parsers only ever see a shared reference to the state. The buffer is
/// never mutated; the only interior mutability is the append-only error log
/// that collects explanations reported at the target error position during
/// the diagnostic pass.
pub struct ParseState<'a> {
    input: &'a str,
    error_position: Option<usize>,
    errors: RefCell<Vec<Arc<ParseError>>>,
    nesting: Cell<usize>,
}

impl<'a> ParseState<'a> {
    /// State for a plain (discovery) pass that records nothing.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            error_position: None,
            errors: RefCell::new(Vec::new()),
            nesting: Cell::new(0),
        }
    }

    /// State for a diagnostic pass collecting every error reported exactly at
    /// `error_position`.
    pub fn collecting_at(input: &'a str, error_position: usize) -> Self {
        Self {
            input,
            error_position: Some(error_position),
            errors: RefCell::new(Vec::new()),
            nesting: Cell::new(0),
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// The character at `position`, or `None` as the end-of-stream sentinel.
    pub fn peek(&self, position: usize) -> Option<char> {
        self.input.get(position..).and_then(|rest| rest.chars().next())
    }

    pub fn is_at_end(&self, position: usize) -> bool {
        position >= self.input.len()
    }

    /// Bytes left from `position` to the end of the buffer.
    pub fn remaining(&self, position: usize) -> usize {
        self.input.len().saturating_sub(position)
    }

    pub fn slice(&self, substring: SubString) -> &'a str {
        &self.input[substring.start..substring.end]
    }

    /// Greedily consumes at most `at_most` characters satisfying `predicate`,
    /// which receives the index of the character within the run.
    ///
    /// Returns the matched range and the number of characters in it.
    pub fn satisfy<F>(&self, position: usize, at_most: usize, predicate: F) -> (SubString, usize)
    where
        F: Fn(usize, char) -> bool,
    {
        let rest = self.input.get(position..).unwrap_or("");
        let mut end = position;
        let mut count = 0;

        for (offset, ch) in rest.char_indices() {
            if count >= at_most || !predicate(count, ch) {
                break;
            }
            count += 1;
            end = position + offset + ch.len_utf8();
        }

        (SubString::new(position, end), count)
    }

    /// The target position of the diagnostic pass, if this is one.
    pub fn error_position(&self) -> Option<usize> {
        self.error_position
    }

    /// Records `error` if it was raised at the target error position.
    pub fn report(&self, position: usize, error: &Arc<ParseError>) {
        if self.error_position == Some(position) {
            self.errors.borrow_mut().push(Arc::clone(error));
        }
    }

    /// Enters one more level of recursion, or returns `false` when
    /// [`MAX_NESTING`] levels are already active.
    pub fn enter_nested(&self) -> bool {
        let depth = self.nesting.get();
        if depth >= MAX_NESTING {
            return false;
        }
        self.nesting.set(depth + 1);
        true
    }

    pub fn leave_nested(&self) {
        self.nesting.set(self.nesting.get().saturating_sub(1));
    }

    /// Drains the errors collected so far.
    pub fn take_errors(&self) -> Vec<Arc<ParseError>> {
        self.errors.take()
    }
}
