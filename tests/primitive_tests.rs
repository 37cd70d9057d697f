use parcom::parser::{
    BoxedParser, ParseReport, parse, pany_of, pchar, peos, pint, pmany, psatisfy, psatisfy_char,
    pskip_ws, pstring, puint,
};
use pretty_assertions::assert_eq;

fn run<T: 'static>(parser: BoxedParser<T>, input: &str) -> ParseReport<T> {
    parse(&parser, input)
}

#[test]
fn uint_stops_at_first_non_digit() {
    let report = run(puint(), "1234 + 5678");
    assert_eq!(report.consumed, 4);
    assert_eq!(report.value, Some(1234));
    assert!(report.message.is_empty());
}

#[test]
fn char_mismatch_fails_at_start() {
    let report = run(pchar('2'), "1234 + 5678");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 0);
    assert_eq!(
        report.message,
        "Parse error at line 1, column 1:\n  1234 + 5678\n  ^\n  expected '2'"
    );
}

#[test]
fn any_of_repeated_up_to_input_end() {
    let report = run(pmany(1, 5, pany_of("123")), "123");
    assert_eq!(report.consumed, 3);
    assert_eq!(report.value, Some(vec!['1', '2', '3']));
}

#[test]
fn any_of_lists_every_candidate() {
    let report = run(pany_of("ab"), "c");
    assert!(report.message.ends_with("expected 'a' or 'b'"));
}

#[test]
fn eos_on_empty_input() {
    let report = run(peos(), "");
    assert!(report.is_success());
    assert_eq!(report.consumed, 0);
}

#[test]
fn eos_rejects_remaining_input() {
    let report = run(peos(), "x");
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("expected end of input"));
}

#[test]
fn string_fails_where_input_diverges() {
    let report = run(pstring("null"), "nul!");
    assert_eq!(report.consumed, 3);
    assert!(report.message.ends_with("expected \"null\""));

    let report = run(pstring("null"), "null!");
    assert_eq!(report.consumed, 4);
}

#[test]
fn satisfy_respects_bounds() {
    let digits = || psatisfy("digit", 2, 4, |_, ch| ch.is_ascii_digit());

    let report = run(digits().text(), "12345");
    assert_eq!(report.value.as_deref(), Some("1234"));

    let report = run(digits(), "1x");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("expected digit"));
}

#[test]
fn satisfy_explains_where_the_run_stopped() {
    let word = psatisfy("letter", 1, usize::MAX, |_, ch| ch.is_alphabetic()) - peos();
    let report = run(word, "abc1");
    assert_eq!(report.consumed, 3);
    assert!(report.message.ends_with("expected end of input or letter"));
}

#[test]
fn satisfy_char_takes_one_char() {
    let report = run(psatisfy_char("vowel", |ch| "aeiou".contains(ch)), "ab");
    assert_eq!(report.value, Some('a'));
    assert_eq!(report.consumed, 1);

    let report = run(psatisfy_char("vowel", |ch| "aeiou".contains(ch)), "ü");
    assert!(report.message.ends_with("expected vowel"));
}

#[test]
fn whitespace_is_optional() {
    assert_eq!(run(pskip_ws(), " \t\r\n x").consumed, 5);
    assert_eq!(run(pskip_ws(), "x").consumed, 0);
}

#[test]
fn signed_integers() {
    assert_eq!(run(pint(), "-42").value, Some(-42));
    assert_eq!(run(pint(), "+7").value, Some(7));
    assert_eq!(
        run(pint(), "-9223372036854775808").value,
        Some(i64::MIN)
    );

    let report = run(pint(), "-x");
    assert_eq!(report.consumed, 1);
    assert!(report.message.ends_with("expected integer"));
}

#[test]
fn integer_overflow_is_a_parse_failure() {
    let report = run(pint(), "9223372036854775808");
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("unexpected integer overflow"));

    let report = run(puint(), "18446744073709551616");
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("unexpected integer overflow"));

    assert_eq!(run(puint(), "18446744073709551615").value, Some(u64::MAX));
}

#[test]
fn multibyte_input_advances_by_chars() {
    let report = run(pchar('ä') + pchar('ö'), "äö");
    assert_eq!(report.value, Some(('ä', 'ö')));
    assert_eq!(report.consumed, "äö".len());
}
