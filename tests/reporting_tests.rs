mod common;

use casebook::{CaseError, Registry, ReportFormat, Reporter, RunReport};
use pretty_assertions::assert_eq;
use termcolor::Buffer;

fn sample_report() -> RunReport {
    let mut registry = Registry::new();
    registry
        .suite("Examples", |s| {
            s.case("passes", |t| Ok(t.assert_equal(1 + 2, 3)?))?
                .case("fails", |t| Ok(t.assert_strict_equal(0, false)?))?
                .case("errors", |_| Err(CaseError::fault("x is not a function")))?
                .skip("parked", |_| Ok(()))?;
            Ok(())
        })
        .unwrap();
    common::run(&registry)
}

fn render(report: &RunReport, format: ReportFormat) -> String {
    let mut buffer = Buffer::no_color();
    Reporter::new(format).write(report, &mut buffer).unwrap();
    String::from_utf8(buffer.into_inner()).unwrap()
}

#[test]
fn pretty_report_layout() {
    let text = render(&sample_report(), ReportFormat::Pretty);
    let expected = "\
Examples
  PASS  passes
  FAIL  fails
        assert_strict_equal: type tags differ: number vs boolean
        expected: false
        actual:   0
  ERROR errors
        x is not a function
  SKIP  parked
        (marked skip)

Summary: 1 passed, 1 failed, 1 errored, 1 skipped, 4 total
";
    assert_eq!(text, expected);
}

#[test]
fn multi_line_values_get_a_diff() {
    let mut registry = Registry::new();
    registry
        .suite("Objects", |s| {
            s.case("differ in one key", |t| {
                Ok(t.assert_equal(
                    casebook::object! { "a" => 1, "b" => 2 },
                    casebook::object! { "a" => 1, "b" => 3 },
                )?)
            })?;
            Ok(())
        })
        .unwrap();

    let text = render(&common::run(&registry), ReportFormat::Pretty);
    assert!(text.contains("diff (- expected, + actual):"), "{text}");
    assert!(text.contains("-   b: 3"), "{text}");
    assert!(text.contains("+   b: 2"), "{text}");
}

#[test]
fn json_report_carries_statuses_and_counts() {
    let text = render(&sample_report(), ReportFormat::Json);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["counts"]["passed"], 1);
    assert_eq!(json["counts"]["skipped"], 1);

    let cases = &json["suites"][0]["cases"];
    assert_eq!(cases[0]["status"], "passed");
    assert_eq!(cases[1]["status"], "failed");
    assert_eq!(cases[1]["outcomes"][0]["kind"], "fail");
    assert_eq!(cases[2]["error"]["kind"], "unexpected_exception");
    assert_eq!(cases[2]["error"]["message"], "x is not a function");
    assert_eq!(cases[3]["skip_reason"], "marked skip");
}
