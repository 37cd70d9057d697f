use std::sync::Arc;

use super::combinators::{BoxedParser, Parser};
use super::error::{ErrorSite, ParseError};
use super::result::ParseResult;
use super::state::{ParseState, SubString};

/// Fails at `position`, reporting the explanation to the diagnostic session.
fn fail_at<T>(state: &ParseState<'_>, position: usize, error: &Arc<ParseError>) -> ParseResult<T> {
    state.report(position, error);
    ParseResult::failure(position, Arc::clone(error))
}

fn is_whitespace(_: usize, ch: char) -> bool {
    matches!(ch, ' ' | '\u{8}' | '\n' | '\r' | '\t')
}

/// Always succeeds with a clone of `value`, consuming nothing.
pub fn preturn<T>(value: T) -> BoxedParser<T>
where
    T: Clone + Send + Sync + 'static,
{
    BoxedParser::new(move |_: &ParseState<'_>, position: usize| {
        ParseResult::success(position, value.clone())
    })
}

/// Always fails, rejecting the input with `Unexpected(description)`.
pub fn pfail<T: 'static>(description: impl Into<String>) -> BoxedParser<T> {
    let error = ParseError::unexpected(description);
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        fail_at(state, position, &error)
    })
}

/// Always fails with `Expected(description)`.
pub fn pexpected<T: 'static>(description: impl Into<String>) -> BoxedParser<T> {
    let error = ParseError::expected(description);
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        fail_at(state, position, &error)
    })
}

/// Matches exactly `ch`.
pub fn pchar(ch: char) -> BoxedParser<char> {
    let error = ParseError::expected(format!("'{}'", ch.escape_debug()));
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        match state.peek(position) {
            Some(found) if found == ch => ParseResult::success(position + ch.len_utf8(), ch),
            _ => fail_at(state, position, &error),
        }
    })
}

/// Matches exactly `ch`, producing unit.
pub fn pskip_char(ch: char) -> BoxedParser<()> {
    pchar(ch).map(|_| ())
}

/// Matches `literal` character by character, failing where the input first
/// diverges from it.
pub fn pstring(literal: impl Into<String>) -> BoxedParser<()> {
    let literal: String = literal.into();
    let error = ParseError::expected(format!("\"{}\"", literal.escape_debug()));
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let mut current = position;
        for expected in literal.chars() {
            match state.peek(current) {
                Some(found) if found == expected => current += found.len_utf8(),
                _ => return fail_at(state, current, &error),
            }
        }
        ParseResult::success(current, ())
    })
}

/// Greedily matches up to `at_most` characters accepted by `predicate`, which
/// also receives the index of the character within the run.
///
/// Fails with `Expected(description)` when fewer than `at_least` characters
/// match. When the run ends before `at_most`, the same explanation is
/// attached at the stop position: more of the class could have followed.
pub fn psatisfy<F>(
    description: impl Into<String>,
    at_least: usize,
    at_most: usize,
    predicate: F,
) -> BoxedParser<SubString>
where
    F: Fn(usize, char) -> bool + Send + Sync + 'static,
{
    let error = ParseError::expected(description);
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let (run, count) = state.satisfy(position, at_most, &predicate);
        if count < at_least {
            return fail_at(state, position, &error);
        }

        let mut result = ParseResult::success(run.end, run);
        if count < at_most {
            state.report(run.end, &error);
            result.error = Some(ErrorSite::new(run.end, Arc::clone(&error)));
        }
        result
    })
}

/// Matches a single character accepted by `predicate`.
pub fn psatisfy_char<F>(description: impl Into<String>, predicate: F) -> BoxedParser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    let error = ParseError::expected(description);
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        match state.peek(position) {
            Some(found) if predicate(found) => ParseResult::success(position + found.len_utf8(), found),
            _ => fail_at(state, position, &error),
        }
    })
}

/// Matches any single character of `chars`.
///
/// Each candidate character is reported as its own expectation.
pub fn pany_of(chars: &str) -> BoxedParser<char> {
    let candidates: Vec<char> = chars.chars().collect();
    let error = Arc::new(ParseError::Group(
        candidates
            .iter()
            .map(|ch| ParseError::expected(format!("'{}'", ch.escape_debug())))
            .collect(),
    ));
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        match state.peek(position) {
            Some(found) if candidates.contains(&found) => {
                ParseResult::success(position + found.len_utf8(), found)
            }
            _ => fail_at(state, position, &error),
        }
    })
}

/// Skips up to `at_most` characters accepted by `predicate`. Never fails.
pub fn pskip_satisfy<F>(at_most: usize, predicate: F) -> BoxedParser<()>
where
    F: Fn(usize, char) -> bool + Send + Sync + 'static,
{
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let (run, _) = state.satisfy(position, at_most, &predicate);
        ParseResult::success(run.end, ())
    })
}

/// Skips any amount of whitespace. Never fails.
pub fn pskip_ws() -> BoxedParser<()> {
    pskip_satisfy(usize::MAX, is_whitespace)
}

/// Succeeds, consuming nothing, only at the end of the input.
pub fn peos() -> BoxedParser<()> {
    let error = ParseError::expected("end of input");
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        if state.is_at_end(position) {
            ParseResult::success(position, ())
        } else {
            fail_at(state, position, &error)
        }
    })
}

fn digit_value(digit: u8) -> u8 {
    digit - b'0'
}

fn fold_unsigned(digits: &str) -> Option<u64> {
    digits.bytes().try_fold(0u64, |value, digit| {
        value.checked_mul(10)?.checked_add(u64::from(digit_value(digit)))
    })
}

fn fold_signed(digits: &str, negative: bool) -> Option<i64> {
    // accumulate towards the sign so that i64::MIN stays representable
    digits.bytes().try_fold(0i64, |value, digit| {
        let value = value.checked_mul(10)?;
        let digit = i64::from(digit_value(digit));
        if negative {
            value.checked_sub(digit)
        } else {
            value.checked_add(digit)
        }
    })
}

/// An unsigned base-10 integer literal.
///
/// Fails with `Expected("integer")` without digits and with
/// `Unexpected("integer overflow")` at the start of the literal when it does
/// not fit.
pub fn puint() -> BoxedParser<u64> {
    let missing = ParseError::expected("integer");
    let overflow = ParseError::unexpected("integer overflow");
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let (digits, count) = state.satisfy(position, usize::MAX, |_, ch| ch.is_ascii_digit());
        if count == 0 {
            return fail_at(state, position, &missing);
        }
        match fold_unsigned(state.slice(digits)) {
            Some(value) => ParseResult::success(digits.end, value),
            None => fail_at(state, position, &overflow),
        }
    })
}

/// A signed base-10 integer literal with an optional `+` or `-`.
pub fn pint() -> BoxedParser<i64> {
    let missing = ParseError::expected("integer");
    let overflow = ParseError::unexpected("integer overflow");
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let (negative, digits_start) = match state.peek(position) {
            Some('-') => (true, position + 1),
            Some('+') => (false, position + 1),
            _ => (false, position),
        };

        let (digits, count) =
            state.satisfy(digits_start, usize::MAX, |_, ch| ch.is_ascii_digit());
        if count == 0 {
            return fail_at(state, digits_start, &missing);
        }
        match fold_signed(state.slice(digits), negative) {
            Some(value) => ParseResult::success(digits.end, value),
            None => fail_at(state, position, &overflow),
        }
    })
}
