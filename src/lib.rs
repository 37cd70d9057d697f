//! # Parcom - Parser Combinators over In-Memory Text
//!
//! Parcom builds recursive-descent parsers out of small composable pieces.
//! A grammar is assembled once from primitives and combinators into a
//! [`parser::BoxedParser`] and can then be run against any number of inputs,
//! from any number of threads.
//!
//! ## Architecture Overview
//!
//! 1. **State** (`parser::state`) - the borrowed input and the diagnostic
//!    session of one parse
//! 2. **Results** (`parser::result`, `parser::error`) - position, optional
//!    value and the deepest explanation seen so far
//! 3. **Building blocks** (`parser::primitives`, `parser::combinators`) -
//!    literals, character classes, integers, sequencing, repetition, choice
//! 4. **Recursion** (`parser::trampoline`) - late-bound slots for grammars
//!    that refer to themselves
//! 5. **Driver** (`parser::driver`) - runs a grammar and renders failures
//!
//! ## Parse Flow
//!
//! ```text
//! Input (&str)
//!     ↓
//! [Discovery pass] → success: ParseReport { value: Some(..) }
//!     ↓ failure at offset P
//! [Diagnosis pass] → every explanation reported at P
//!     ↓
//! [Rendering] → "Parse error at line L, column C: ... expected a or b"
//! ```
//!
//! ## Operators
//!
//! | Operator | Meaning                              |
//! |----------|--------------------------------------|
//! | `a + b`  | both in sequence, keep `(a, b)`      |
//! | `a - b`  | both in sequence, keep `a`           |
//! | `a * b`  | both in sequence, keep `b`           |
//! | `a \| b` | ordered choice                       |
//! | `a >> f` | map the value of `a` through `f`     |
//!
//! ## Example
//!
//! ```
//! use parcom::parser::{parse, pchar, pskip_ws, puint};
//!
//! let sum = (puint() - pskip_ws() - pchar('+') - pskip_ws()) + puint();
//! let report = parse(&sum.map(|(a, b)| a + b), "1234 + 5678");
//! assert_eq!(report.value, Some(6912));
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - the combinator engine and the parse driver
//! - [`config`] - diagnostic rendering settings
//! - [`calc`] - arithmetic expressions with variables
//! - [`json`] - JSON documents

pub mod calc;
pub mod config;
pub mod json;
pub mod parser;
