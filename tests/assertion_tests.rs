use casebook::{array, object, Assertions, MessagePattern, Object, OutcomeKind, Value};
use pretty_assertions::assert_eq;
use regex::Regex;

#[test]
fn deep_equality_is_order_sensitive_for_arrays_only() {
    let mut t = Assertions::new();
    assert!(t
        .assert_equal(
            object! { "a" => 1, "b" => array![1, 2] },
            object! { "b" => array![1, 2], "a" => 1 },
        )
        .is_ok());
    assert!(t.assert_equal(array![1, 2], array![2, 1]).is_err());
}

#[test]
fn loose_equality_ignores_class_and_undefined_properties() {
    let mut t = Assertions::new();
    let instance = Object::instance("Point").with("x", 1).with("label", Value::Undefined);
    assert!(t.assert_equal(instance.clone(), object! { "x" => 1 }).is_ok());
    assert!(t.assert_strict_equal(instance, object! { "x" => 1 }).is_err());
}

#[test]
fn strict_equality_reports_type_tags() {
    let mut t = Assertions::new();
    let failure = t.assert_strict_equal(0, false).unwrap_err();
    let outcome = failure.outcome();
    assert_eq!(outcome.kind(), OutcomeKind::Fail);
    assert_eq!(outcome.expected(), Some("false"));
    assert_eq!(outcome.actual(), Some("0"));
    assert_eq!(
        failure.to_string(),
        "assert_strict_equal: type tags differ: number vs boolean"
    );
}

#[test]
fn same_value_uses_identity_for_composites() {
    let mut t = Assertions::new();
    let list = array![1, 2];
    assert!(t.assert_same(list.clone(), list.clone()).is_ok());
    let failure = t.assert_same(list, array![1, 2]).unwrap_err();
    assert_eq!(
        failure.outcome().message(),
        Some("values are equal but not the same reference")
    );
    assert!(t.assert_same(f64::NAN, f64::NAN).is_ok());
    assert!(t.assert_same(0.0, -0.0).is_err());
}

#[test]
fn truthiness_follows_host_rules() {
    let mut t = Assertions::new();
    for falsy in [
        Value::from(""),
        Value::from(0),
        Value::from(-0.0),
        Value::from(f64::NAN),
        Value::Null,
        Value::Undefined,
        Value::from(false),
    ] {
        assert!(t.assert_falsy(falsy.clone()).is_ok(), "{falsy} should be falsy");
    }
    for truthy in [Value::from("0"), Value::from(-1), array![], object! {}] {
        assert!(t.assert_truthy(truthy.clone()).is_ok(), "{truthy} should be truthy");
    }
}

#[test]
fn absent_markers_are_distinct() {
    let mut t = Assertions::new();
    assert!(t.assert_null(Value::Null).is_ok());
    assert!(t.assert_null(Value::Undefined).is_err());
    assert!(t.assert_undefined(Value::Undefined).is_ok());
    assert!(t.assert_undefined(Value::Null).is_err());
    assert!(t.assert_not_null(Value::Undefined).is_ok());
    assert!(t.assert_not_undefined(Value::Null).is_ok());
    assert!(t.assert_equal(Value::Null, Value::Undefined).is_err());
}

#[test]
fn throws_accepts_errors_and_panics() {
    let mut t = Assertions::new();
    assert!(t
        .assert_throws(|| -> Result<(), String> { Err("bad input".to_string()) })
        .is_ok());
    assert!(t
        .assert_throws(|| -> Result<(), String> { panic!("fullName has a max length of 10") })
        .is_ok());
    assert!(t.assert_throws(|| -> Result<u8, String> { Ok(1) }).is_err());
}

#[test]
fn throws_matching_checks_substring_or_regex() {
    let mut t = Assertions::new();
    let fail = || -> Result<(), String> { Err("Expected string or number, got 'true'.".to_string()) };

    assert!(t.assert_throws_matching(fail, "string or number").is_ok());
    assert!(t
        .assert_throws_matching(fail, Regex::new(r"got '\w+'").unwrap())
        .is_ok());

    let failure = t.assert_throws_matching(fail, "max length").unwrap_err();
    assert_eq!(
        failure.outcome().message(),
        Some("thrown message does not match \"max length\"")
    );
    assert_eq!(
        failure.outcome().actual(),
        Some("Expected string or number, got 'true'.")
    );
}

#[test]
fn match_object_requires_every_subset_key() {
    let mut t = Assertions::new();
    let todo = object! { "title" => "Clean room", "completed" => false, "tags" => array!["home"] };
    assert!(t
        .assert_match_object(todo.clone(), object! { "title" => "Clean room" })
        .is_ok());
    assert!(t
        .assert_match_object(todo.clone(), object! { "tags" => array!["home"] })
        .is_ok());
    assert!(t
        .assert_match_object(todo, object! { "owner" => "nobody" })
        .is_err());
}

#[test]
fn matches_requires_a_string() {
    let mut t = Assertions::new();
    assert!(t.assert_matches("ease-in-out", "in-out").is_ok());
    let failure = t.assert_matches(42, "42").unwrap_err();
    assert_eq!(
        failure.outcome().message(),
        Some("expected a string, got number")
    );
}

#[test]
fn patterns_convert_from_strings_and_regexes() {
    assert!(MessagePattern::from("abc").matches("xxabcxx"));
    assert!(!MessagePattern::from("ABC").matches("abc"));
    assert!(MessagePattern::from(Regex::new("^a.c$").unwrap()).matches("abc"));
}

#[test]
fn outcomes_are_recorded_in_order() {
    let mut t = Assertions::new();
    let _ = t.assert_truthy(1);
    let _ = t.assert_equal(1, 2);
    let _ = t.assert_null(Value::Null);
    let kinds: Vec<_> = t.outcomes().iter().map(|o| o.kind()).collect();
    assert_eq!(kinds, [OutcomeKind::Pass, OutcomeKind::Fail, OutcomeKind::Pass]);
    assert!(t.has_failures());
}
