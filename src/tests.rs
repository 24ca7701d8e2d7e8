// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    compare, compare_with, ArraySizeMatcher, ArrayValueMatcher, AssertionError, CompareMode,
    Comparator, ComparisonResult, Config, Customization, Customizations, Error, FailureKind,
    JsonAssert, LogReporter, Node, RegexMatcher,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;

const MODES: [CompareMode; 4] = [
    CompareMode::Strict,
    CompareMode::Lenient,
    CompareMode::StrictOrder,
    CompareMode::NonExtensible,
];

fn run(expected: &Value, actual: &Value, comparator: &Comparator) -> ComparisonResult {
    comparator
        .compare(&Node::from(expected), &Node::from(actual))
        .unwrap()
}

fn run_mode(expected: &Value, actual: &Value, mode: CompareMode) -> ComparisonResult {
    run(expected, actual, &Comparator::with_mode(mode))
}

fn load_json_from_file(file_path: &str) -> Value {
    let data = fs::read_to_string(file_path).expect("Unable to read file");
    serde_json::from_str(&data).expect("Unable to parse file")
}

fn sample_documents() -> Vec<Value> {
    vec![
        json!(null),
        json!("text"),
        json!(-12.5),
        json!([]),
        json!({}),
        json!([1, "two", null, [3, [4]], { "five": 5 }]),
        json!({
            "a": { "b": [{ "c": 0 }, { "c": 1, "d": [true, false] }] },
            "e": "x",
            "f": [[1, 2], [1, 2]],
        }),
    ]
}

#[test]
fn test_reflexivity() {
    for doc in sample_documents() {
        for mode in MODES {
            let result = run_mode(&doc, &doc, mode);
            assert!(result.passed(), "{} in {} mode: {}", doc, mode, result);
        }
    }
}

#[test]
fn test_object_key_order_is_never_significant() {
    let a: Value = serde_json::from_str(r#"{"x": 1, "y": {"p": [1, 2], "q": null}, "z": "s"}"#).unwrap();
    let b: Value = serde_json::from_str(r#"{"z": "s", "y": {"q": null, "p": [1, 2]}, "x": 1}"#).unwrap();
    assert_ne!(a.to_string(), b.to_string());

    for mode in MODES {
        assert!(run_mode(&a, &b, mode).passed());
        assert!(run_mode(&b, &a, mode).passed());
    }
}

#[test]
fn test_array_order_toggles_with_mode() {
    let a = json!([1, "b", { "c": 3 }, [4]]);
    let b = json!([[4], { "c": 3 }, 1, "b"]);

    assert!(run_mode(&a, &b, CompareMode::NonExtensible).passed());
    assert!(!run_mode(&a, &b, CompareMode::Strict).passed());
    assert!(!run_mode(&a, &b, CompareMode::StrictOrder).passed());
    assert!(!run_mode(&a, &b, CompareMode::Lenient).passed());
}

#[test]
fn test_array_size_customization() {
    let comparator = Comparator::with_mode(CompareMode::Strict)
        .customize_path("a", ArraySizeMatcher)
        .unwrap();

    let result = run(&json!({ "a": [3] }), &json!({ "a": [1, 2, 3, 4] }), &comparator);
    assert!(result.failed());
    assert_eq!(
        result.message(),
        "a: expected array size of 3 elements but got 4"
    );

    let result = run(&json!({ "a": [3] }), &json!({ "a": ["x", "y", "z"] }), &comparator);
    assert!(result.passed());
}

#[test]
fn test_dynamic_regex_customization() {
    let comparator = Comparator::with_mode(CompareMode::Strict)
        .customize_path("a.id", RegexMatcher::dynamic())
        .unwrap();
    let expected = json!({ "a": { "id": r"\d+" } });

    let result = run(&expected, &json!({ "a": { "id": "123" } }), &comparator);
    assert!(result.passed());

    let result = run(&expected, &json!({ "a": { "id": "abc" } }), &comparator);
    assert!(result.failed());
    assert_eq!(result.failures()[0].kind, FailureKind::Matcher);
    assert_eq!(
        result.message(),
        r"a.id: Dynamic expected pattern '\d+' did not match value 'abc'"
    );
}

#[test]
fn test_unique_key_pairing_and_fallback() {
    let expected = json!({ "users": [
        { "id": 1, "name": "Ann", "roles": ["admin"] },
        { "id": 2, "name": "Bob", "roles": [] },
        { "id": 3, "name": "Cid", "roles": ["dev", "ops"] },
    ] });
    let permuted = json!({ "users": [
        { "id": 3, "name": "Cid", "roles": ["ops", "dev"] },
        { "id": 1, "name": "Ann", "roles": ["admin"] },
        { "id": 2, "name": "Bob", "roles": [] },
    ] });
    assert!(run_mode(&expected, &permuted, CompareMode::NonExtensible).passed());

    let renamed = json!({ "users": [
        { "id": 3, "name": "Cid", "roles": ["ops", "dev"] },
        { "id": 1, "name": "Ann", "roles": ["admin"] },
        { "id": 2, "name": "Rob", "roles": [] },
    ] });
    assert_eq!(
        run_mode(&expected, &renamed, CompareMode::NonExtensible).message(),
        r#"users[id=2].name: expected "Bob" but got "Rob""#
    );

    let expected = json!({ "users": [{ "id": 1, "name": "Ann" }, { "id": 1, "name": "Ann" }] });
    let actual = json!({ "users": [{ "id": 1, "name": "Ann" }, { "id": 1, "name": "Bob" }] });
    let result = run_mode(&expected, &actual, CompareMode::NonExtensible);
    assert_eq!(
        result.message(),
        r#"users[1]: expected {"id":1,"name":"Ann"} but got no matching element ; users[1]: unexpected {"id":1,"name":"Bob"}"#
    );
}

#[test]
fn test_message_is_idempotent() {
    let result = run_mode(
        &json!({ "a": 1, "b": [1, 2], "c": "x" }),
        &json!({ "a": 2, "b": [1], "d": true }),
        CompareMode::Strict,
    );
    assert!(result.failed());

    let first = result.message();
    let second = result.message();
    assert_eq!(first, second);
    assert!(result.failed());
    assert_eq!(
        first,
        r#"a: expected 1 but got 2 ; b: expected 2 values but got 1 values ; c: expected "x" but none found ; d: unexpected true"#
    );
}

#[test]
fn test_array_value_customization() {
    let comparator = Comparator::with_mode(CompareMode::Lenient)
        .customize_path("items", ArrayValueMatcher::new().any())
        .unwrap();

    let expected = json!({ "items": { "sku": "B" } });
    let actual = json!({ "items": [{ "sku": "A", "qty": 1 }, { "sku": "B", "qty": 2 }] });
    assert!(run(&expected, &actual, &comparator).passed());

    let comparator = Comparator::with_mode(CompareMode::Strict)
        .customize_path("items", ArrayValueMatcher::new().at(0))
        .unwrap();
    let result = run(&expected, &actual, &comparator);
    assert_eq!(
        result.message(),
        r#"items[0].sku: expected "B" but got "A" ; items[0].qty: unexpected 1"#
    );
}

#[test]
fn test_nested_comparator_in_array_value_matcher() {
    let inner = Comparator::with_mode(CompareMode::Lenient)
        .customize_path("**.id", RegexMatcher::constant("[a-z]+-[0-9]+").unwrap())
        .unwrap();
    let comparator = Comparator::with_mode(CompareMode::Strict)
        .customize_path("orders", ArrayValueMatcher::new().with_comparator(inner))
        .unwrap();

    let expected = json!({ "orders": { "id": "", "state": "open" } });
    let actual = json!({ "orders": [
        { "id": "ord-1", "state": "open", "total": 3 },
        { "id": "ord-2", "state": "open" },
        { "id": "bad", "state": "open" },
    ] });
    assert_eq!(
        run(&expected, &actual, &comparator).message(),
        "orders[2].id: Constant expected pattern '[a-z]+-[0-9]+' did not match value 'bad'"
    );
}

#[test]
fn test_registry_order_matters() {
    let specific_first: Customizations = vec![
        Customization::parse("a.b", RegexMatcher::constant("x+").unwrap()).unwrap(),
        Customization::parse("a.*", RegexMatcher::constant("y+").unwrap()).unwrap(),
    ]
    .into_iter()
    .collect();
    let comparator = Comparator::with_mode(CompareMode::Strict).with_customizations(specific_first);
    let expected = json!({ "a": { "b": "", "c": "" } });
    let actual = json!({ "a": { "b": "xx", "c": "yy" } });
    assert!(run(&expected, &actual, &comparator).passed());

    let broad_first = Comparator::with_mode(CompareMode::Strict)
        .customize_path("a.*", RegexMatcher::constant("y+").unwrap())
        .unwrap()
        .customize_path("a.b", RegexMatcher::constant("x+").unwrap())
        .unwrap();
    assert_eq!(
        run(&expected, &actual, &broad_first).message(),
        "a.b: Constant expected pattern 'y+' did not match value 'xx'"
    );
}

#[test]
fn test_configuration_errors_surface_before_comparison() {
    let err = Comparator::with_mode(CompareMode::Strict)
        .customize_path("a[", ArraySizeMatcher)
        .unwrap_err();
    assert_eq!(err.position, 1);

    let comparator = Comparator::with_mode(CompareMode::Strict)
        .customize_path("a", ArraySizeMatcher)
        .unwrap();
    let err = compare_with(r#"{"a": ["3"]}"#, r#"{"a": [1, 2, 3]}"#, &comparator).unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = JsonAssert::new()
        .with_comparator(comparator)
        .try_assert(r#"{"a": [1, 2, 3]}"#, r#"{"a": []}"#)
        .unwrap_err();
    assert!(matches!(err, AssertionError::Malformed(Error::Config(_))));
}

#[test]
fn test_json_assert_builder() {
    let assertion = JsonAssert::new().with_reporter(LogReporter);
    assert!(assertion.assert(r#"{"a": 1}"#, r#"{"a": 1.0}"#));
    assert!(!assertion.assert(r#"{"a": 1}"#, r#"{"a": 1, "b": 2}"#));
    assert!(!assertion.assert(r#"{"a": 1"#, r#"{"a": 1}"#));

    let assertion = assertion
        .with_config(Config::new(CompareMode::Strict).extensible(true))
        .with_mode(CompareMode::Lenient);
    assert!(assertion.assert(r#"{"a": 1}"#, r#"{"a": 1, "b": 2}"#));

    match JsonAssert::new().try_assert("[1, 2]", "[2, 1]") {
        Err(AssertionError::Mismatch(result)) => assert_eq!(result.failures().len(), 2),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
#[should_panic(expected = "documents differ: a: expected 1 but got 2")]
fn test_panic_reporter() {
    JsonAssert::new().assert(r#"{"a": 1}"#, r#"{"a": 2}"#);
}

#[test]
fn test_macros() {
    crate::assert_json_eq!(json!({ "a": [1, 2] }), r#"{"a":[1,2]}"#);
    crate::assert_json_matches!(
        json!([1, 2, 3]),
        json!([3, 2, 1]),
        CompareMode::NonExtensible,
    );
}

#[test]
#[should_panic(expected = "documents differ")]
fn test_macro_failure() {
    crate::assert_json_eq!(json!({ "a": 1 }), json!({ "a": 1, "b": 2 }));
}

#[test]
fn test_comparator_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Comparator>();
    assert_send_sync::<Customizations>();
    assert_send_sync::<Node>();
    assert_send_sync::<ComparisonResult>();

    let comparator = Comparator::with_mode(CompareMode::NonExtensible)
        .ignore("**.ts")
        .unwrap();
    let expected = Node::from(json!({ "xs": [1, 2], "ts": 1 }));
    let actuals = [
        json!({ "xs": [2, 1], "ts": 2 }),
        json!({ "xs": [1, 2], "ts": 3 }),
    ];

    std::thread::scope(|s| {
        for actual in actuals {
            let comparator = &comparator;
            let expected = &expected;
            s.spawn(move || {
                let result = comparator.compare(expected, &Node::from(actual)).unwrap();
                assert!(result.passed(), "{}", result);
            });
        }
    });
}

#[test]
fn test_complex_jsons() {
    let expected = load_json_from_file("tests/data/expected.json");
    let actual = load_json_from_file("tests/data/actual.json");

    let result = run_mode(&expected, &actual, CompareMode::Lenient);
    assert_eq!(result.failures().len(), 12);

    let result = run_mode(&expected, &actual, CompareMode::Strict);
    assert_eq!(result.failures().len(), 13);
    assert_eq!(result.field_unexpected().count(), 1);

    let comparator = Comparator::with_mode(CompareMode::Strict)
        .ignore("$.user.name")
        .unwrap()
        .ignore("user.profile.age")
        .unwrap()
        .ignore("user.comments[*].timestamp")
        .unwrap();
    let result = run(&expected, &actual, &comparator);
    assert_eq!(result.failures().len(), 9);
    assert!(result
        .failures()
        .iter()
        .all(|f| !f.path.ends_with("timestamp") && f.path != "user.name"));

    let comparator = Comparator::new(Config::new(CompareMode::NonExtensible))
        .ignore("$.user.name")
        .unwrap()
        .ignore("user.profile.age")
        .unwrap()
        .ignore("user.comments[*].timestamp")
        .unwrap();
    let result = run(&expected, &actual, &comparator);
    assert_eq!(
        result.message(),
        "user.comments[id=2].likes: expected 4 but got 5 ; user.session: unexpected \"abc\""
    );

    let comparator = Comparator::with_mode(CompareMode::Strict).ignore("**").unwrap();
    assert!(run(&expected, &actual, &comparator).passed());
}

#[test]
fn test_free_functions() {
    let result = compare(r#"{"a": [1, 2]}"#, r#"{"a": [2, 1]}"#, CompareMode::NonExtensible).unwrap();
    assert!(result.passed());

    let err = compare("{}", "nope", CompareMode::Strict).unwrap_err();
    assert!(err.to_string().starts_with("error parsing actual document"));
}
