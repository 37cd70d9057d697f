use std::fmt;
use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::sync::Arc;

use super::error::{ErrorSite, ParseError, group_sites, merge_sites};
use super::result::ParseResult;
use super::state::{ParseState, SubString};

type ParserFn<T> = Arc<dyn Fn(&ParseState<'_>, usize) -> ParseResult<T> + Send + Sync>;

/// Anything that can try to match a `T` at a position of the input.
pub trait Parser<T> {
    fn parse(&self, state: &ParseState<'_>, position: usize) -> ParseResult<T>;
}

impl<T, F> Parser<T> for F
where
    F: Fn(&ParseState<'_>, usize) -> ParseResult<T>,
{
    fn parse(&self, state: &ParseState<'_>, position: usize) -> ParseResult<T> {
        self(state, position)
    }
}

// === Boxed Parser for type erasure ===

/// The uniform parser representation every combinator produces.
///
/// Cloning is cheap (a reference count) and the parser is `Send + Sync`, so a
/// grammar built once can be stored in a static and shared between threads.
pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Arc::clone(&self.parser),
        }
    }
}

impl<T> fmt::Debug for BoxedParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedParser").finish_non_exhaustive()
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<F>(parser: F) -> Self
    where
        F: Fn(&ParseState<'_>, usize) -> ParseResult<T> + Send + Sync + 'static,
    {
        BoxedParser {
            parser: Arc::new(parser),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &ParseState<'_>, position: usize) -> ParseResult<T> {
        (self.parser)(state, position)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Sequence: parse self then other, return (T, U)
    pub fn seq<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let (end, left, error) = match self.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };
            other
                .parse(state, end)
                .merge_error(error)
                .map(|right| (left, right))
        })
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let (end, left, error) = match self.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };
            other.parse(state, end).merge_error(error).map(|_| left)
        })
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let (end, _, error) = match self.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };
            other.parse(state, end).merge_error(error)
        })
    }

    /// Bind: feed the value into `f` and continue with the parser it returns
    pub fn bind<U, F>(self, f: F) -> BoxedParser<U>
    where
        U: 'static,
        F: Fn(T) -> BoxedParser<U> + Send + Sync + 'static,
    {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let (end, value, error) = match self.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };
            f(value).parse(state, end).merge_error(error)
        })
    }

    /// Map: transform result
    pub fn map<U, F>(self, f: F) -> BoxedParser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            self.parse(state, position).map(&f)
        })
    }

    /// Map with a fallible transform. A rejected value fails at the start of
    /// the match with `Unexpected(message)`.
    pub fn try_map<U, F>(self, f: F) -> BoxedParser<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
    {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let (end, value, error) = match self.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };
            match f(value) {
                Ok(mapped) => ParseResult {
                    position: end,
                    value: Some(mapped),
                    error,
                },
                Err(message) => {
                    let rejection = ParseError::unexpected(message);
                    state.report(position, &rejection);
                    ParseResult::failure(position, rejection)
                }
            }
        })
    }

    /// The input consumed by a successful match
    pub fn recognize(self) -> BoxedParser<SubString> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let result = self.parse(state, position);
            let end = result.position;
            result.map(|_| SubString::new(position, end))
        })
    }

    /// Choice: try self, if fails try other
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let first = self.parse(state, position);
            if first.is_success() {
                return first;
            }

            let second = other.parse(state, position);
            if second.is_success() {
                return second.merge_error(first.error);
            }

            // keep whichever branch got further
            let furthest = first.position.max(second.position);
            ParseResult::failed(furthest, merge_sites(first.error, second.error))
        })
    }

    /// Optional: parse zero or one, never failing
    pub fn optional(self) -> BoxedParser<Option<T>> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            let result = self.parse(state, position);
            match result.value {
                Some(value) => ParseResult {
                    position: result.position,
                    value: Some(Some(value)),
                    error: result.error,
                },
                None => ParseResult {
                    position,
                    value: Some(None),
                    error: result.error,
                },
            }
        })
    }

    /// Between `min` and `max` repetitions
    pub fn many(self, min: usize, max: usize) -> BoxedParser<Vec<T>> {
        pmany(min, max, self)
    }
}

impl BoxedParser<SubString> {
    /// Materialise the matched text as an owned string
    pub fn text(self) -> BoxedParser<String> {
        BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
            self.parse(state, position)
                .map(|substring| state.slice(substring).to_string())
        })
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<T: 'static, U: 'static> Add<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<(T, U)>;

    fn add(self, rhs: BoxedParser<U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + Send + Sync + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Structural combinators ===

/// Parse between `min` and `max` occurrences.
///
/// Stops at the first failure or once `max` values are collected. A match
/// that consumes nothing is kept but ends the repetition.
pub fn pmany<T: 'static>(min: usize, max: usize, parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let mut values = Vec::new();
        let mut current = position;
        let mut stopped_at = position;
        let mut error = None;

        while values.len() < max {
            let result = parser.parse(state, current);
            error = merge_sites(error, result.error);
            match result.value {
                Some(value) => {
                    values.push(value);
                    let advanced = result.position != current;
                    current = result.position;
                    stopped_at = current;
                    if !advanced {
                        break;
                    }
                }
                None => {
                    stopped_at = result.position;
                    break;
                }
            }
        }

        if values.len() < min {
            return ParseResult::failed(stopped_at, error);
        }
        ParseResult {
            position: current,
            value: Some(values),
            error,
        }
    })
}

/// Parse `parser (separator parser)*` with between `min` and `max` items.
///
/// A separator that is not followed by an item fails the list, unless
/// `allow_trailing` is set, in which case the separator is consumed and the
/// list ends there.
pub fn pmany_sep<T: 'static, S: 'static>(
    min: usize,
    max: usize,
    allow_trailing: bool,
    parser: BoxedParser<T>,
    separator: BoxedParser<S>,
) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let mut values = Vec::new();
        let mut current = position;
        let mut stopped_at = position;
        let mut error = None;

        while values.len() < max {
            let mut item_start = current;
            if !values.is_empty() {
                let sep = separator.parse(state, current);
                error = merge_sites(error, sep.error);
                if sep.value.is_none() {
                    stopped_at = sep.position;
                    break;
                }
                item_start = sep.position;
            }

            let item = parser.parse(state, item_start);
            error = merge_sites(error, item.error);
            match item.value {
                Some(value) => {
                    values.push(value);
                    let advanced = item.position != current;
                    current = item.position;
                    stopped_at = current;
                    if !advanced {
                        break;
                    }
                }
                None if values.is_empty() => {
                    stopped_at = item.position;
                    break;
                }
                None if allow_trailing => {
                    current = item_start;
                    break;
                }
                None => return ParseResult::failed(item.position, error),
            }
        }

        if values.len() < min {
            return ParseResult::failed(stopped_at, error);
        }
        ParseResult {
            position: current,
            value: Some(values),
            error,
        }
    })
}

/// Optional: parse zero or one
pub fn poptional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    parser.optional()
}

/// `begin`, then `parser`, then `end`, keeping only the middle value
pub fn pbetween<B: 'static, T: 'static, E: 'static>(
    begin: BoxedParser<B>,
    parser: BoxedParser<T>,
    end: BoxedParser<E>,
) -> BoxedParser<T> {
    begin * parser - end
}

/// Left fold over `parser (separator parser)*`.
///
/// `a + b - c` with `combine` building binary nodes yields `((a + b) - c)`.
/// A separator that is not followed by an operand fails the whole fold.
pub fn psep<T, S, F>(parser: BoxedParser<T>, separator: BoxedParser<S>, combine: F) -> BoxedParser<T>
where
    T: 'static,
    S: 'static,
    F: Fn(T, S, T) -> T + Send + Sync + 'static,
{
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let (mut current, mut accumulator, mut error) =
            match parser.parse(state, position).into_success() {
                Ok(parts) => parts,
                Err(failure) => return failure,
            };

        loop {
            let sep = separator.parse(state, current);
            error = merge_sites(error, sep.error);
            let Some(operator) = sep.value else {
                break;
            };

            let next = parser.parse(state, sep.position);
            error = merge_sites(error, next.error);
            let Some(operand) = next.value else {
                return ParseResult::failed(next.position, error);
            };

            accumulator = combine(accumulator, operator, operand);
            if next.position == current {
                break;
            }
            current = next.position;
        }

        ParseResult {
            position: current,
            value: Some(accumulator),
            error,
        }
    })
}

/// Ordered choice: the first alternative that succeeds wins.
///
/// When every alternative fails, the result sits at the furthest failure and
/// its explanation groups every alternative that failed at the deepest
/// position reached.
pub fn pchoice<T: 'static>(alternatives: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
        let mut sites: Vec<ErrorSite> = Vec::new();
        let mut furthest = position;

        for alternative in &alternatives {
            let result = alternative.parse(state, position);
            if result.is_success() {
                return result.merge_error(group_sites(sites));
            }
            furthest = furthest.max(result.position);
            sites.extend(result.error);
        }

        ParseResult::failed(furthest, group_sites(sites))
    })
}

// === Tuples ===

/// A tuple of parsers that can run in sequence, collecting a tuple of values.
pub trait ParserTuple {
    type Output;

    fn sequence(self) -> BoxedParser<Self::Output>;
}

macro_rules! impl_parser_tuple {
    ($($parser:ident: $value:ident),+) => {
        impl<$($value: 'static),+> ParserTuple for ($(BoxedParser<$value>,)+) {
            type Output = ($($value,)+);

            fn sequence(self) -> BoxedParser<Self::Output> {
                let ($($parser,)+) = self;
                BoxedParser::new(move |state: &ParseState<'_>, position: usize| {
                    let mut current = position;
                    let mut error = None;
                    $(
                        let result = $parser.parse(state, current);
                        error = merge_sites(error, result.error);
                        let Some($parser) = result.value else {
                            return ParseResult::failed(result.position, error);
                        };
                        current = result.position;
                    )+
                    ParseResult {
                        position: current,
                        value: Some(($($parser,)+)),
                        error,
                    }
                })
            }
        }
    };
}

impl_parser_tuple!(a: A, b: B);
impl_parser_tuple!(a: A, b: B, c: C);
impl_parser_tuple!(a: A, b: B, c: C, d: D);
impl_parser_tuple!(a: A, b: B, c: C, d: D, e: E);
impl_parser_tuple!(a: A, b: B, c: C, d: D, e: E, f: F);

/// Run every parser of a tuple in sequence: `ptuple((a, b, c))`
pub fn ptuple<P: ParserTuple>(parsers: P) -> BoxedParser<P::Output> {
    parsers.sequence()
}
