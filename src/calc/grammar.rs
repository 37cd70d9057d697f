use once_cell::sync::Lazy;

use crate::config::DiagnosticConfig;
use crate::parser::{
    BoxedParser, ParseReport, parse_with, pbetween, pchar, pchoice, peos, precursive, psatisfy,
    psep, pskip_char, pskip_ws, puint,
};

use super::{BinOp, Expr};

static GRAMMAR: Lazy<BoxedParser<Expr>> = Lazy::new(grammar);

/// identifier := letter (letter | digit)*
fn is_identifier_char(offset: usize, ch: char) -> bool {
    ch.is_ascii_alphabetic() || (offset > 0 && ch.is_ascii_digit())
}

fn operator(symbol: char, op: BinOp) -> BoxedParser<BinOp> {
    pchar(symbol).map(move |_| op)
}

/// integer := digit+
pub fn integer() -> BoxedParser<Expr> {
    puint()
        .try_map(|value| i64::try_from(value).map_err(|_| "integer overflow".to_string()))
        .map(Expr::Int)
}

/// identifier := letter (letter | digit)*
pub fn identifier() -> BoxedParser<Expr> {
    psatisfy("identifier", 1, usize::MAX, is_identifier_char)
        .text()
        .map(Expr::Ident)
}

/// expression := term (("+" | "-") term)*
pub fn expression() -> BoxedParser<Expr> {
    precursive(|expression| {
        let sub_expression = pbetween(pskip_char('(') - pskip_ws(), expression, pskip_char(')'));
        let value = pchoice(vec![integer(), identifier(), sub_expression]) - pskip_ws();

        let mul_op = pchoice(vec![
            operator('*', BinOp::Mul),
            operator('/', BinOp::Div),
            operator('%', BinOp::Rem),
        ]) - pskip_ws();
        let add_op = pchoice(vec![operator('+', BinOp::Add), operator('-', BinOp::Sub)]) - pskip_ws();

        let term = psep(value, mul_op, Expr::binary);
        psep(term, add_op, Expr::binary)
    })
}

/// A whole input holding exactly one expression.
pub fn grammar() -> BoxedParser<Expr> {
    pskip_ws() * expression() - peos()
}

pub fn parse_expression(input: &str) -> ParseReport<Expr> {
    parse_expression_with(input, &DiagnosticConfig::default())
}

pub fn parse_expression_with(input: &str, config: &DiagnosticConfig) -> ParseReport<Expr> {
    parse_with(Lazy::force(&GRAMMAR), input, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::Variables;

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier_char(0, 'a'));
        assert!(!is_identifier_char(0, '1'));
        assert!(is_identifier_char(1, '1'));
    }

    #[test]
    fn test_operators_are_left_associative() {
        let expr = parse_expression("8 - 4 - 2").value.unwrap();
        assert_eq!(expr.to_string(), "((8 - 4) - 2)");
        assert_eq!(expr.eval(&Variables::new()), Ok(2));
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let expr = parse_expression("1 + 2 * 3").value.unwrap();
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }
}
