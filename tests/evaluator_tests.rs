// tests/evaluator_tests.rs

use jmespath_waiters::evaluator::{EvalError, evaluate};
use jmespath_waiters::ops::{Constant, Operation, Pipeline};
use jmespath_waiters::{Comparator, Error, Value, search};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn eval(expression: &str, document: serde_json::Value) -> Value {
    search(expression, &Value::from(document)).unwrap_or_else(|e| panic!("Expected {expression:?} to evaluate: {e}"))
}

// ============================================================================
// Paths and projections
// ============================================================================

#[test]
fn test_field_lookup() {
    init();
    assert_eq!(eval("foo.bar", json!({"foo": {"bar": 1}})), Value::Integer(1));
    assert_eq!(eval("foo.missing", json!({"foo": {"bar": 1}})), Value::Null);
    assert_eq!(eval("foo.bar", json!({"foo": [1, 2]})), Value::Null);
}

#[test]
fn test_index_lookup() {
    let document = json!({"foo": ["a", "b", "c"]});
    assert_eq!(eval("foo[0]", document.clone()), Value::from("a"));
    assert_eq!(eval("foo[-1]", document.clone()), Value::from("c"));
    assert_eq!(eval("foo[3]", document), Value::Null);
}

#[test]
fn test_flatten_projects_and_drops_nulls() {
    let document = json!({"foo": [{"bar": 1}, {"baz": 2}, {"bar": 3}]});
    assert_eq!(eval("foo[].bar", document), Value::from(json!([1, 3])));
}

#[test]
fn test_flatten_merges_one_level() {
    let document = json!({"foo": [[1, 2], 3, [[4]]]});
    assert_eq!(eval("foo[]", document), Value::from(json!([1, 2, 3, [4]])));
}

#[test]
fn test_object_wildcard() {
    let document = json!({
        "VerificationAttributes": {
            "example.com": {"VerificationStatus": "Success"},
            "example.org": {"VerificationStatus": "Pending"}
        }
    });
    assert_eq!(
        eval("VerificationAttributes.*.VerificationStatus", document),
        Value::from(json!(["Success", "Pending"]))
    );
}

#[test]
fn test_list_wildcard() {
    let document = json!({"Items": [{"Id": "a"}, {"Id": "b"}, {"Name": "c"}]});
    assert_eq!(eval("Items[*].Id", document), Value::from(json!(["a", "b"])));
    assert_eq!(eval("Items[*].Id", json!({"Items": "nope"})), Value::Null);
}

#[test]
fn test_index_inside_projection() {
    let document = json!({"foo": [{"bar": [1, 2]}, {"bar": [3]}, {"bar": []}]});
    assert_eq!(eval("foo[].bar[0]", document), Value::from(json!([1, 3])));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_by_comparison() {
    let document = json!({
        "Items": [
            {"Id": "i-1", "State": "running"},
            {"Id": "i-2", "State": "stopped"},
            {"Id": "i-3", "State": "running"}
        ]
    });
    assert_eq!(
        eval("Items[?State == 'running'].Id", document),
        Value::from(json!(["i-1", "i-3"]))
    );
}

#[test]
fn test_filter_on_non_array_is_null() {
    assert_eq!(eval("Items[?Ready]", json!({"Items": {"Ready": true}})), Value::Null);
}

#[test]
fn test_filter_with_negation() {
    let document = json!({"Items": [{"Ready": true}, {"Ready": false}, {"Ready": []}]});
    assert_eq!(eval("length(Items[?!Ready])", document), Value::Integer(2));
}

#[test]
fn test_waiter_acceptor() {
    init();
    let expression =
        "contains(AutoScalingGroups[].[length(Instances[?LifecycleState=='InService']) >= MinSize][], `false`)";

    let waiting = json!({
        "AutoScalingGroups": [
            {
                "Instances": [{"LifecycleState": "InService"}, {"LifecycleState": "Pending"}],
                "MinSize": 2
            },
            {"Instances": [{"LifecycleState": "InService"}], "MinSize": 1}
        ]
    });
    assert_eq!(eval(expression, waiting), Value::Boolean(true));

    let ready = json!({
        "AutoScalingGroups": [
            {
                "Instances": [{"LifecycleState": "InService"}, {"LifecycleState": "InService"}],
                "MinSize": 2
            }
        ]
    });
    assert_eq!(eval(expression, ready), Value::Boolean(false));
}

// ============================================================================
// Comparisons and logic
// ============================================================================

#[test]
fn test_numeric_comparisons() {
    let document = json!({"a": 2, "b": 2.0, "c": 1.5});
    assert_eq!(eval("a == b", document.clone()), Value::Boolean(true));
    assert_eq!(eval("a > c", document.clone()), Value::Boolean(true));
    assert_eq!(eval("c >= `2`", document.clone()), Value::Boolean(false));
    assert_eq!(eval("a != `2`", document), Value::Boolean(false));
}

#[test]
fn test_ordering_non_numbers_is_null() {
    let document = json!({"a": "x", "b": "y"});
    assert_eq!(eval("a < b", document), Value::Null);
}

#[test]
fn test_deep_equality() {
    let document = json!({"a": {"k": [1, 2.0]}, "b": {"k": [1.0, 2]}});
    assert_eq!(eval("a == b", document), Value::Boolean(true));
}

#[test]
fn test_or_and_not() {
    let document = json!({"a": false, "b": "x", "c": [], "d": {"k": 1}});
    assert_eq!(eval("a || b", document.clone()), Value::from("x"));
    assert_eq!(eval("b || a", document.clone()), Value::from("x"));
    assert_eq!(eval("a && b", document.clone()), Value::Boolean(false));
    assert_eq!(eval("d && b", document.clone()), Value::from("x"));
    assert_eq!(eval("!c", document.clone()), Value::Boolean(true));
    assert_eq!(eval("!d", document), Value::Boolean(false));
}

// ============================================================================
// Functions and multi-selects
// ============================================================================

#[test]
fn test_length() {
    let document = json!({"arr": [1, 2, 3], "obj": {"a": 1}, "s": "héllo"});
    assert_eq!(eval("length(arr)", document.clone()), Value::Integer(3));
    assert_eq!(eval("length(obj)", document.clone()), Value::Integer(1));
    assert_eq!(eval("length(s)", document), Value::Integer(5));
}

#[test]
fn test_length_of_number_is_type_error() {
    let result = search("length(foo)", &Value::from(json!({"foo": 1})));
    assert!(matches!(result, Err(Error::Eval(EvalError::TypeError(_)))));
}

#[test]
fn test_contains() {
    let document = json!({"tags": ["a", "b"], "name": "hello", "nums": [1, 2]});
    assert_eq!(eval("contains(tags, 'b')", document.clone()), Value::Boolean(true));
    assert_eq!(eval("contains(tags, 'c')", document.clone()), Value::Boolean(false));
    assert_eq!(eval("contains(name, 'ell')", document.clone()), Value::Boolean(true));
    assert_eq!(eval("contains(nums, `2.0`)", document.clone()), Value::Boolean(true));

    let result = search("contains(name, `1`)", &Value::from(document));
    assert!(matches!(result, Err(Error::Eval(EvalError::TypeError(_)))));
}

#[test]
fn test_multi_select_list() {
    let document = json!({"a": 1, "b": {"c": 2}});
    assert_eq!(eval("[a, b.c, missing]", document), Value::from(json!([1, 2, null])));
    assert_eq!(eval("foo.[a, b]", json!({})), Value::Null);
}

#[test]
fn test_multi_select_list_on_projection() {
    let document = json!({"people": [{"name": "a", "age": 1}, {"name": "b", "age": 2}]});
    assert_eq!(
        eval("people[].[name, age]", document),
        Value::from(json!([["a", 1], ["b", 2]]))
    );
}

// ============================================================================
// Hand-built pipelines
// ============================================================================

#[test]
fn test_unbound_variable() {
    let pipeline = Pipeline::new(
        "input",
        vec![Operation::Compare(
            Comparator::Equal,
            Pipeline::new("missing", vec![Operation::Constant(Constant::Value(Value::Null))]),
        )],
    );
    assert_eq!(
        evaluate(&pipeline, &Value::Null),
        Err(EvalError::UnboundVariable("missing".to_string()))
    );
}

#[test]
fn test_outer_variable_visible_in_predicate() {
    // x0 -> x0.field("size").compare(">", input.field("min"))
    let predicate = Pipeline::new(
        "x0",
        vec![
            Operation::Field("size".to_string()),
            Operation::Compare(
                Comparator::GreaterThan,
                Pipeline::new("input", vec![Operation::Field("min".to_string())]),
            ),
        ],
    );
    let pipeline = Pipeline::new(
        "input",
        vec![Operation::Field("items".to_string()), Operation::Filter(predicate), Operation::Length],
    );
    let document = Value::from(json!({"min": 2, "items": [{"size": 1}, {"size": 3}, {"size": 5}]}));
    assert_eq!(evaluate(&pipeline, &document), Ok(Value::Integer(2)));
}
