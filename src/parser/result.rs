use std::sync::Arc;

use super::error::{ErrorSite, ParseError, merge_sites};

/// The outcome of running one parser at one position.
///
/// `value` is present exactly on success. `position` is where matching got
/// to: the end of the match on success, the offset where the failure was
/// detected otherwise. `error` is the deepest explanation seen along the
/// way and may be present on success too (e.g. why a repetition stopped).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    pub position: usize,
    pub value: Option<T>,
    pub error: Option<ErrorSite>,
}

impl<T> ParseResult<T> {
    pub fn success(position: usize, value: T) -> Self {
        Self {
            position,
            value: Some(value),
            error: None,
        }
    }

    /// A failure explained by `error` at `position`.
    pub fn failure(position: usize, error: Arc<ParseError>) -> Self {
        Self {
            position,
            value: None,
            error: Some(ErrorSite::new(position, error)),
        }
    }

    /// A failure carrying whatever explanation was gathered so far.
    pub fn failed(position: usize, error: Option<ErrorSite>) -> Self {
        Self {
            position,
            value: None,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_failure(&self) -> bool {
        self.value.is_none()
    }

    /// Re-tags a failure with another value type.
    pub fn fail_as<U>(self) -> ParseResult<U> {
        ParseResult::failed(self.position, self.error)
    }

    pub fn reposition(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Folds an explanation from another path into this result.
    pub fn merge_error(mut self, error: Option<ErrorSite>) -> Self {
        self.error = merge_sites(self.error, error);
        self
    }

    pub fn merge_with<U>(self, other: &ParseResult<U>) -> Self {
        self.merge_error(other.error.clone())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            position: self.position,
            value: self.value.map(f),
            error: self.error,
        }
    }

    /// Splits off the value, handing back a re-tagged failure otherwise.
    pub fn into_success<U>(self) -> Result<(usize, T, Option<ErrorSite>), ParseResult<U>> {
        match self.value {
            Some(value) => Ok((self.position, value, self.error)),
            None => Err(ParseResult::failed(self.position, self.error)),
        }
    }
}
