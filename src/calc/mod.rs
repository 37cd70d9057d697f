//! Arithmetic expressions over integers and named variables.
//!
//! ```text
//! expression := term (("+" | "-") term)*
//! term       := value (("*" | "/" | "%") value)*
//! value      := integer | identifier | "(" expression ")"
//! ```
//!
//! Binary operators are left associative; whitespace may follow every token.
//!
//! Parentheses nest at most [`MAX_NESTING`](crate::parser::MAX_NESTING) levels
//! deep; deeper input fails with `unexpected nesting too deep`.

mod grammar;

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use thiserror::Error;

pub use grammar::*;

/// Variable bindings used during evaluation.
pub type Variables = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Rem => '%',
        }
    }

    pub fn apply(self, left: i64, right: i64) -> Result<i64, EvalError> {
        let result = match self {
            BinOp::Add => left.checked_add(right),
            BinOp::Sub => left.checked_sub(right),
            BinOp::Mul => left.checked_mul(right),
            BinOp::Div | BinOp::Rem if right == 0 => return Err(EvalError::DivisionByZero),
            BinOp::Div => left.checked_div(right),
            BinOp::Rem => left.checked_rem(right),
        };
        result.ok_or(EvalError::Overflow {
            left,
            op: self.symbol(),
            right,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Ident(String),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn eval(&self, variables: &Variables) -> Result<i64, EvalError> {
        match self {
            Expr::Int(value) => Ok(*value),
            Expr::Ident(name) => variables
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Expr::Binary { left, op, right } => {
                let left = left.eval(variables)?;
                let right = right.eval(variables)?;
                op.apply(left, right)
            }
        }
    }
}

/// Fully parenthesised rendering: `((0 + 3) * x)`
impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(value) => write!(f, "{value}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Binary { left, op, right } => write!(f, "({left} {} {right})", op.symbol()),
        }
    }
}

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow in {left} {op} {right}")]
    Overflow { left: i64, op: char, right: i64 },
}
