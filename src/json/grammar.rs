use once_cell::sync::Lazy;

use crate::config::DiagnosticConfig;
use crate::parser::{
    BoxedParser, ParseReport, pany_of, parse_with, pbetween, pchar, pchoice, peos, pfail,
    pmany, pmany_sep, poptional, precursive, preturn, psatisfy, pskip_char, pskip_satisfy,
    pskip_ws, pstring, ptuple,
};

use super::JsonValue;

static GRAMMAR: Lazy<BoxedParser<JsonValue>> = Lazy::new(grammar);

const HIGH_SURROGATES: std::ops::Range<u32> = 0xD800..0xDC00;
const LOW_SURROGATES: std::ops::Range<u32> = 0xDC00..0xE000;

/// A structural character followed by optional whitespace
fn token(ch: char) -> BoxedParser<()> {
    pskip_char(ch) - pskip_ws()
}

fn digits() -> BoxedParser<()> {
    psatisfy("digit", 1, usize::MAX, |_, ch| ch.is_ascii_digit()).map(|_| ())
}

/// number := "-"? ("0" | [1-9] [0-9]*) ("." [0-9]+)? ([eE] [+-]? [0-9]+)?
pub fn number() -> BoxedParser<f64> {
    let integer_part = pchoice(vec![
        pskip_char('0'),
        psatisfy("digit", 1, 1, |_, ch| matches!(ch, '1'..='9'))
            * pskip_satisfy(usize::MAX, |_, ch| ch.is_ascii_digit()),
    ]);
    let fraction = pskip_char('.') * digits();
    let exponent = pany_of("eE") * poptional(pany_of("+-")) * digits();

    ptuple((
        poptional(pchar('-')),
        integer_part,
        poptional(fraction),
        poptional(exponent),
    ))
    .recognize()
    .text()
    .try_map(|text| match text.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        Ok(_) => Err("number out of range".to_string()),
        Err(err) => Err(format!("number {text} ({err})")),
    })
}

/// Four hex digits of a `\u` escape
fn code_unit() -> BoxedParser<u32> {
    psatisfy("hex digit", 4, 4, |_, ch| ch.is_ascii_hexdigit())
        .text()
        .try_map(|hex| u32::from_str_radix(&hex, 16).map_err(|err| err.to_string()))
}

/// `u` followed by a code unit, or by a surrogate pair spelled as two escapes
fn unicode_escape() -> BoxedParser<char> {
    let low_half = pstring("\\u") * code_unit();
    (pskip_char('u') * code_unit()).bind(move |high| {
        if HIGH_SURROGATES.contains(&high) {
            low_half.clone().try_map(move |low| {
                if !LOW_SURROGATES.contains(&low) {
                    return Err("unpaired surrogate in unicode escape".to_string());
                }
                let scalar =
                    0x10000 + ((high - HIGH_SURROGATES.start) << 10) + (low - LOW_SURROGATES.start);
                char::from_u32(scalar).ok_or_else(|| "invalid unicode escape".to_string())
            })
        } else {
            match char::from_u32(high) {
                Some(ch) => preturn(ch),
                None => pfail("unpaired surrogate in unicode escape"),
            }
        }
    })
}

fn escape(code: char, ch: char) -> BoxedParser<char> {
    pchar(code).map(move |_| ch)
}

/// string := '"' (unescaped-run | "\" escape)* '"'
pub fn string_literal() -> BoxedParser<String> {
    let unescaped = psatisfy("string character", 1, usize::MAX, |_, ch| {
        ch != '"' && ch != '\\' && u32::from(ch) >= 0x20
    })
    .text();
    let escaped = pskip_char('\\')
        * pchoice(vec![
            escape('"', '"'),
            escape('\\', '\\'),
            escape('/', '/'),
            escape('b', '\u{8}'),
            escape('f', '\u{c}'),
            escape('n', '\n'),
            escape('r', '\r'),
            escape('t', '\t'),
            unicode_escape(),
        ]);

    let pieces = pmany(0, usize::MAX, pchoice(vec![unescaped, escaped.map(String::from)]));
    pbetween(pskip_char('"'), pieces, pskip_char('"')).map(|pieces| pieces.concat())
}

/// value := (null | boolean | number | string | array | object) whitespace
pub fn value() -> BoxedParser<JsonValue> {
    precursive(|value| {
        let null = pstring("null").map(|_| JsonValue::Null);
        let boolean = pchoice(vec![
            pstring("true").map(|_| JsonValue::Bool(true)),
            pstring("false").map(|_| JsonValue::Bool(false)),
        ]);

        let elements = pmany_sep(0, usize::MAX, false, value.clone(), token(','));
        let array = pbetween(token('['), elements, pskip_char(']')).map(JsonValue::Array);

        let member = ptuple((string_literal() - pskip_ws() - token(':'), value));
        let members = pmany_sep(0, usize::MAX, false, member, token(','));
        let object = pbetween(token('{'), members, pskip_char('}')).map(JsonValue::Object);

        pchoice(vec![
            null,
            boolean,
            number().map(JsonValue::Number),
            string_literal().map(JsonValue::String),
            array,
            object,
        ]) - pskip_ws()
    })
}

/// A whole input holding exactly one JSON value.
pub fn grammar() -> BoxedParser<JsonValue> {
    pskip_ws() * value() - peos()
}

pub fn parse_json(input: &str) -> ParseReport<JsonValue> {
    parse_json_with(input, &DiagnosticConfig::default())
}

pub fn parse_json_with(input: &str, config: &DiagnosticConfig) -> ParseReport<JsonValue> {
    parse_with(Lazy::force(&GRAMMAR), input, config)
}
