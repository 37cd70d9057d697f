//! # Parse Error Trees
//!
//! Failed parses carry a small tree of explanations instead of a single
//! message:
//!
//! - `Expected` - a specific token or character class was required
//! - `Unexpected` - an explicit rejection (overflow, invalid escape, ...)
//! - `Fork` - two explanations for the same position
//! - `Group` - the explanations of every failed alternative of a choice
//!
//! Trees are built lazily on the failure path and only walked when the
//! driver renders a message. Nodes are shared through `Arc`, so the same
//! explanation can sit in several branches without copying.
//!
//! Every explanation travels as an [`ErrorSite`], i.e. together with the
//! offset it applies to. When two sites meet, [`merge_sites`] keeps the one
//! that got further into the input.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Why matching stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token or character class was required but absent.
    Expected(String),
    /// The input was explicitly rejected.
    Unexpected(String),
    /// Two alternative explanations at the same position.
    Fork(Arc<ParseError>, Arc<ParseError>),
    /// Explanations of several alternatives at the same position.
    Group(Vec<Arc<ParseError>>),
}

impl ParseError {
    pub fn expected(description: impl Into<String>) -> Arc<Self> {
        Arc::new(ParseError::Expected(description.into()))
    }

    pub fn unexpected(description: impl Into<String>) -> Arc<Self> {
        Arc::new(ParseError::Unexpected(description.into()))
    }

    /// Collects the descriptions of every leaf of this tree.
    pub fn collect_into(&self, expectations: &mut Expectations) {
        // explicit stack; forks produced by long repetitions can nest deeply
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                ParseError::Expected(description) => {
                    expectations.expected.insert(description.clone());
                }
                ParseError::Unexpected(description) => {
                    expectations.unexpected.insert(description.clone());
                }
                ParseError::Fork(left, right) => {
                    pending.push(right);
                    pending.push(left);
                }
                ParseError::Group(members) => {
                    pending.extend(members.iter().rev().map(Arc::as_ref));
                }
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut expectations = Expectations::default();
        self.collect_into(&mut expectations);
        write!(f, "{expectations}")
    }
}

/// An explanation together with the input offset it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSite {
    pub position: usize,
    pub error: Arc<ParseError>,
}

impl ErrorSite {
    pub fn new(position: usize, error: Arc<ParseError>) -> Self {
        Self { position, error }
    }
}

/// Combines the explanations of two parse paths.
///
/// The site further into the input wins; the shallower one is dropped.
/// Sites at the same position are forked so both explanations survive.
pub fn merge_sites(left: Option<ErrorSite>, right: Option<ErrorSite>) -> Option<ErrorSite> {
    match (left, right) {
        (Some(left), Some(right)) => Some(match left.position.cmp(&right.position) {
            Ordering::Less => right,
            Ordering::Greater => left,
            Ordering::Equal if Arc::ptr_eq(&left.error, &right.error) => left,
            Ordering::Equal => ErrorSite::new(
                left.position,
                Arc::new(ParseError::Fork(left.error, right.error)),
            ),
        }),
        (left, None) => left,
        (None, right) => right,
    }
}

/// Merges the sites of several alternatives into a single group at the
/// deepest position reached.
pub fn group_sites(sites: Vec<ErrorSite>) -> Option<ErrorSite> {
    let deepest = sites.iter().map(|site| site.position).max()?;
    let mut members: Vec<Arc<ParseError>> = sites
        .into_iter()
        .filter(|site| site.position == deepest)
        .map(|site| site.error)
        .collect();

    let error = if members.len() == 1 {
        members.remove(0)
    } else {
        Arc::new(ParseError::Group(members))
    };
    Some(ErrorSite::new(deepest, error))
}

/// The sorted, deduplicated descriptions gathered from one or more error
/// trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expectations {
    pub expected: BTreeSet<String>,
    pub unexpected: BTreeSet<String>,
}

impl Expectations {
    pub fn from_errors<'e>(errors: impl IntoIterator<Item = &'e Arc<ParseError>>) -> Self {
        let mut expectations = Self::default();
        for error in errors {
            error.collect_into(&mut expectations);
        }
        expectations
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for Expectations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if !self.expected.is_empty() {
            lines.push(format!("expected {}", join_words(&self.expected, "or")));
        }
        if !self.unexpected.is_empty() {
            lines.push(format!("unexpected {}", join_words(&self.unexpected, "and")));
        }
        if lines.is_empty() {
            lines.push("no further information".to_string());
        }
        f.write_str(&lines.join("\n"))
    }
}

/// `a`, `a or b`, `a, b or c`
fn join_words(words: &BTreeSet<String>, conjunction: &str) -> String {
    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    match words.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, init)) => format!("{} {conjunction} {last}", init.join(", ")),
    }
}
