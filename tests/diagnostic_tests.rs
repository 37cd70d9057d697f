use parcom::calc::{parse_expression, parse_expression_with};
use parcom::config::DiagnosticConfig;
use parcom::json::parse_json;
use pretty_assertions::assert_eq;

fn calc_error(input: &str) -> String {
    let report = parse_expression(input);
    assert!(!report.is_success(), "expected {input:?} to be rejected");
    report.message
}

#[test]
fn missing_operand() {
    assert_eq!(
        calc_error("1 + * 2"),
        "Parse error at line 1, column 5:\n  1 + * 2\n      ^\n  expected '(', identifier or integer"
    );
}

#[test]
fn failure_at_end_of_input() {
    assert_eq!(
        calc_error("1 +"),
        "Parse error at line 1, column 4 (at end of input):\n  1 +\n     ^\n  expected '(', identifier or integer"
    );
}

#[test]
fn trailing_operand_lists_every_continuation() {
    assert_eq!(
        calc_error("1 2"),
        "Parse error at line 1, column 3:\n  1 2\n    ^\n  expected '%', '*', '+', '-', '/' or end of input"
    );
}

#[test]
fn expected_and_unexpected_are_both_listed() {
    assert_eq!(
        calc_error("99999999999999999999"),
        "Parse error at line 1, column 1:\n  99999999999999999999\n  ^\n  expected '(' or identifier\n  unexpected integer overflow"
    );
}

#[test]
fn long_lines_are_windowed() {
    let config = DiagnosticConfig::default().with_context(4);
    let report = parse_expression_with("1 + 2 + 3 + 4 + 5 + * 6", &config);
    assert_eq!(report.consumed, 20);
    assert_eq!(
        report.message,
        "Parse error at line 1, column 21:\n  ...5 + * 6\n         ^\n  expected '(', identifier or integer"
    );
}

#[test]
fn caret_and_indent_are_configurable() {
    let config = DiagnosticConfig::default().with_caret('~').with_indent(0);
    let report = parse_expression_with("(1", &config);
    assert_eq!(
        report.message,
        "Parse error at line 1, column 3 (at end of input):\n(1\n  ~\nexpected '%', ')', '*', '+', '-' or '/'"
    );
}

#[test]
fn multi_line_input_reports_line_and_column() {
    let report = parse_json("{\n  \"a\": tru\n}");
    assert_eq!(report.consumed, 12);
    assert_eq!(
        report.message,
        "Parse error at line 2, column 11:\n    \"a\": tru\n            ^\n  expected \"true\""
    );
}

#[test]
fn caret_accounts_for_wide_characters() {
    let report = parse_json("[\"日本\", x]");
    assert_eq!(report.consumed, 11);
    let lines: Vec<&str> = report.message.lines().take(3).collect();
    assert_eq!(
        lines,
        vec![
            "Parse error at line 1, column 8:",
            "  [\"日本\", x]",
            "           ^",
        ]
    );
}

#[test]
fn report_converts_to_error() {
    let failure = parse_expression("1 +").into_result().unwrap_err();
    assert_eq!(failure.position, 3);
    assert_eq!(failure.to_string(), calc_error("1 +"));
}
