//! # Parse Driver
//!
//! Runs a composed grammar against an input and packages the outcome.
//!
//! A failed parse is run twice:
//!
//! 1. **Discovery** - a plain pass that finds the deepest failure position.
//! 2. **Diagnosis** - the same grammar again, this time collecting every
//!    explanation reported exactly at that position. Ordered choice drops
//!    sibling attempts once it has decided, so a single pass cannot see
//!    everything that was tried at the failure site.
//!
//! The second pass relies on parsers being pure functions of the input and
//! position.

use log::{debug, trace};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::config::DiagnosticConfig;

use super::combinators::{BoxedParser, Parser};
use super::error::Expectations;
use super::result::ParseResult;
use super::state::ParseState;

/// The outcome of a top-level parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport<T> {
    /// On success the length of the matched prefix, on failure the offset of
    /// the deepest failure.
    pub consumed: usize,
    pub value: Option<T>,
    /// Empty on success, a multi-line diagnostic otherwise.
    pub message: String,
}

impl<T> ParseReport<T> {
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    pub fn into_result(self) -> Result<T, ParseFailure> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(ParseFailure {
                position: self.consumed,
                message: self.message,
            }),
        }
    }
}

/// A failed parse as an error value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub position: usize,
    pub message: String,
}

/// Runs `parser` on `input` with the default diagnostic settings.
pub fn parse<T: 'static>(parser: &BoxedParser<T>, input: &str) -> ParseReport<T> {
    parse_with(parser, input, &DiagnosticConfig::default())
}

pub fn parse_with<T: 'static>(
    parser: &BoxedParser<T>,
    input: &str,
    config: &DiagnosticConfig,
) -> ParseReport<T> {
    let ParseResult {
        position,
        value,
        error,
    } = parser.parse(&ParseState::new(input), 0);

    if let Some(value) = value {
        debug!("parsed {position} of {} bytes", input.len());
        return ParseReport {
            consumed: position,
            value: Some(value),
            message: String::new(),
        };
    }

    let failure_position = error.as_ref().map_or(position, |site| site.position);
    debug!("discovery pass failed at offset {failure_position}, collecting diagnostics");

    let session = ParseState::collecting_at(input, failure_position);
    let _ = parser.parse(&session, 0);
    let mut collected = session.take_errors();
    collected.extend(
        error
            .filter(|site| site.position == failure_position)
            .map(|site| site.error),
    );
    trace!("collected {} explanations at offset {failure_position}", collected.len());

    let expectations = Expectations::from_errors(&collected);
    ParseReport {
        consumed: failure_position,
        value: None,
        message: render_message(input, failure_position, &expectations, config),
    }
}

/// 1-based line and column of a byte offset; columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    line_start: usize,
    line_end: usize,
}

impl Location {
    pub fn of(input: &str, position: usize) -> Self {
        let position = position.min(input.len());
        let before = &input[..position];
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        let line_end = input[position..]
            .find('\n')
            .map_or(input.len(), |newline| position + newline);

        Self {
            line: before.matches('\n').count() + 1,
            column: input[line_start..position].chars().count() + 1,
            line_start,
            line_end,
        }
    }
}

fn render_message(
    input: &str,
    position: usize,
    expectations: &Expectations,
    config: &DiagnosticConfig,
) -> String {
    let position = position.min(input.len());
    let location = Location::of(input, position);
    let indent = " ".repeat(config.indent);

    let mut message = format!(
        "Parse error at line {}, column {}",
        location.line, location.column
    );
    if position == input.len() {
        message.push_str(" (at end of input)");
    }
    message.push_str(":\n");

    let before = &input[location.line_start..position];
    let after = input[position..location.line_end].trim_end_matches('\r');
    let (excerpt, caret_offset) = excerpt(before, after, config.context);

    message.push_str(&format!("{indent}{excerpt}\n"));
    message.push_str(&format!(
        "{indent}{}{}\n",
        " ".repeat(caret_offset),
        config.caret
    ));
    let explanation: Vec<String> = expectations
        .to_string()
        .lines()
        .map(|line| format!("{indent}{line}"))
        .collect();
    message.push_str(&explanation.join("\n"));
    message
}

/// The visible part of the failing line and the display width before the
/// failure position.
fn excerpt(before: &str, after: &str, context: usize) -> (String, usize) {
    let skipped = before.chars().count().saturating_sub(context);
    let mut head = String::new();
    if skipped > 0 {
        head.push_str("...");
    }
    head.extend(before.chars().skip(skipped).map(visible));

    let mut tail: String = after.chars().take(context).map(visible).collect();
    if after.chars().count() > context {
        tail.push_str("...");
    }

    let caret_offset = head.width();
    (head + &tail, caret_offset)
}

fn visible(ch: char) -> char {
    if ch.is_control() { ' ' } else { ch }
}
