use parcom::parser::{
    BoxedParser, ParseReport, Trampoline, parse, pbetween, pchar, pchoice, peos, pmany,
    pmany_sep, poptional, psep, pskip_char, pstring, ptuple, puint,
};
use pretty_assertions::assert_eq;

fn run<T: 'static>(parser: BoxedParser<T>, input: &str) -> ParseReport<T> {
    parse(&parser, input)
}

fn number_list(allow_trailing: bool) -> BoxedParser<Vec<u64>> {
    pmany_sep(0, usize::MAX, allow_trailing, puint(), pchar(','))
}

#[test]
fn pair_keeps_both_values() {
    let report = run(pchar('a') + pchar('b'), "abc");
    assert_eq!(report.value, Some(('a', 'b')));
    assert_eq!(report.consumed, 2);
}

#[test]
fn keep_left_and_keep_right() {
    assert_eq!(run(puint() - pchar(';'), "12;").value, Some(12));
    assert_eq!(run(pchar('#') * puint(), "#12").value, Some(12));

    let report = run(puint() - pchar(';'), "12,");
    assert_eq!(report.consumed, 2);
    assert!(report.message.ends_with("expected ';'"));
}

#[test]
fn map_with_operator() {
    let doubled = puint() >> |value: u64| value * 2;
    assert_eq!(run(doubled, "21").value, Some(42));
}

#[test]
fn bind_chooses_the_next_parser() {
    let counted = puint().bind(|count| {
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        pmany(count, count, pchar('x'))
    });
    assert_eq!(run(counted.clone() - peos(), "3xxx").value.map(|xs| xs.len()), Some(3));
    assert!(!run(counted.clone() - peos(), "3xx").is_success());
    assert!(!run(counted - peos(), "3xxxx").is_success());
}

#[test]
fn try_map_rejects_at_match_start() {
    let even = puint().try_map(|value| {
        if value % 2 == 0 {
            Ok(value)
        } else {
            Err("odd number".to_string())
        }
    });
    let report = run(pchar(' ') * even, " 7");
    assert_eq!(report.consumed, 1);
    assert!(report.message.ends_with("unexpected odd number"));
}

#[test]
fn recognize_returns_matched_text() {
    let report = run((pchar('a') + puint()).recognize().text(), "a42!");
    assert_eq!(report.value.as_deref(), Some("a42"));
}

#[test]
fn optional_never_fails() {
    let report = run(poptional(pchar('x')), "y");
    assert_eq!(report.value, Some(None));
    assert_eq!(report.consumed, 0);

    let report = run(poptional(pchar('x')), "x");
    assert_eq!(report.value, Some(Some('x')));
}

#[test]
fn optional_failure_rewinds_to_start() {
    let report = run(poptional(pstring("abc")) + pstring("abd"), "abd");
    assert_eq!(report.value, Some((None, ())));
    assert_eq!(report.consumed, 3);
}

#[test]
fn many_respects_bounds() {
    assert_eq!(run(pmany(0, 2, pchar('a')), "aaa").value, Some(vec!['a', 'a']));
    assert_eq!(run(pmany(0, 2, pchar('a')), "b").value, Some(Vec::new()));

    let report = run(pmany(2, 4, pchar('a')), "ab");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 1);
}

#[test]
fn many_stops_on_empty_match() {
    let report = run(pmany(0, usize::MAX, poptional(pchar('a'))), "b");
    assert_eq!(report.value, Some(vec![None]));
    assert_eq!(report.consumed, 0);
}

#[test]
fn separated_list() {
    assert_eq!(run(number_list(false), "1,2,3").value, Some(vec![1, 2, 3]));
    assert_eq!(run(number_list(false), "").value, Some(Vec::new()));
    assert_eq!(run(number_list(false), "1;2").consumed, 1);
}

#[test]
fn separated_list_trailing_separator() {
    let report = run(number_list(true), "1,2,");
    assert_eq!(report.value, Some(vec![1, 2]));
    assert_eq!(report.consumed, 4);

    let report = run(number_list(false), "1,2,");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 4);
    assert!(report.message.ends_with("expected integer"));
}

#[test]
fn separated_list_minimum() {
    let pairs = pmany_sep(2, usize::MAX, false, puint(), pchar(','));
    assert!(!run(pairs.clone(), "1").is_success());
    assert_eq!(run(pairs, "1,2").value, Some(vec![1, 2]));
}

#[test]
fn sep_folds_left() {
    let difference = psep(
        puint().map(|value| value as i64),
        pchar('-'),
        |left, _, right| left - right,
    );
    assert_eq!(run(difference.clone(), "10-4-3").value, Some(3));

    let report = run(difference, "10-");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 3);
}

#[test]
fn between_keeps_the_middle() {
    let bracketed = pbetween(pchar('['), puint(), pchar(']'));
    assert_eq!(run(bracketed.clone(), "[5]").value, Some(5));
    assert!(run(bracketed, "[5").message.ends_with("expected ']'"));
}

#[test]
fn tuple_collects_values() {
    let date = ptuple((puint(), pskip_char('-'), puint(), pskip_char('-'), puint()));
    assert_eq!(
        run(date, "2024-05-17").value,
        Some((2024, (), 5, (), 17))
    );
}

#[test]
fn or_takes_first_success() {
    let keyword = pstring("let").map(|_| "let") | pstring("letter").map(|_| "letter");
    assert_eq!(run(keyword, "letter").value, Some("let"));
}

#[test]
fn or_reports_the_later_failure() {
    let keyword = pstring("let") | pstring("lambda");
    let report = run(keyword, "lamp");
    assert_eq!(report.consumed, 3);
    assert!(report.message.ends_with("expected \"lambda\""));
}

#[test]
fn choice_mentions_every_alternative_at_the_same_position() {
    let choice = pchoice(vec![pchar('a').map(|_| ()), pstring("bc"), peos()]);
    let report = run(choice, "z");
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("expected \"bc\", 'a' or end of input"));
}

#[test]
fn choice_reports_only_the_deepest_alternatives() {
    let choice = pchoice(vec![pstring("abc"), pstring("abd"), pstring("x")]);
    let report = run(choice, "abz");
    assert_eq!(report.consumed, 2);
    assert!(report.message.ends_with("expected \"abc\" or \"abd\""));
}

#[test]
fn choice_success_keeps_earlier_explanations() {
    let choice = pchoice(vec![pstring("ab"), pstring("a")]) - peos();
    let report = run(choice, "ac");
    assert_eq!(report.consumed, 1);
    assert!(report.message.ends_with("expected \"ab\" or end of input"));
}

#[test]
fn empty_choice_fails_without_explanation() {
    let report = run(pchoice::<()>(Vec::new()), "x");
    assert!(!report.is_success());
    assert_eq!(report.consumed, 0);
    assert!(report.message.ends_with("no further information"));
}

#[test]
fn trampoline_ties_recursive_grammar() {
    let nested: Trampoline<usize> = Trampoline::new();
    let depth = pmany(0, usize::MAX, pbetween(pchar('('), nested.parser(), pchar(')')))
        .map(|depths| depths.into_iter().map(|depth| depth + 1).max().unwrap_or(0));
    nested.resolve(depth.clone());

    let grammar = depth - peos();
    assert_eq!(run(grammar.clone(), "(()(()))").value, Some(3));
    assert_eq!(run(grammar.clone(), "").value, Some(0));

    let report = run(grammar, "(()");
    assert_eq!(report.consumed, 3);
    assert!(report.message.contains("(at end of input)"));
}
