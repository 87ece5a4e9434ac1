//! Values, inputs, outputs and examples.
//!
//! Every theory sees the same loosely-structured data: a [`Value`] is a string, a number, null, or
//! a mapping from keys to further values. String-oriented theories never inspect the variant
//! directly; they go through [`Value::canonical`], the single place where a value is flattened to
//! text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Context flags with a meaning shared across theories.
pub mod flags {
    /// The value was projected out of a mapping by field decomposition.
    pub const FIELD_SELECTED: &str = "field-selected";
    /// The value is a window cut out of a longer string.
    pub const FRAGMENTED: &str = "fragmented";
    /// The value was produced by an external enrichment transform.
    pub const ENRICHED: &str = "enriched";
}

/// A loosely-typed example value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Text, compared verbatim.
    Str(String),
    /// A number; integral values print without a fractional part.
    Num(f64),
    /// The absence of a value, as JSON `null`.
    Null,
    /// Named fields, such as a record or a JSON object.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Flattens the value to the string form used by string operations and by equality.
    ///
    /// Strings are returned verbatim, numbers print as JSON numbers (integral ones without a
    /// fractional part), and mappings render as compact JSON with sorted keys.
    pub fn canonical(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => number(*n).to_string(),
            Value::Null => String::from("null"),
            Value::Map(_) => self.to_json().to_string(),
        }
    }

    /// Structural equality after canonicalization.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => self.canonical() == other.canonical(),
        }
    }

    /// The fields of a mapping, or `None` for any other variant.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether the value is a mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Num(n) => number(*n),
            Value::Null => serde_json::Value::Null,
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// The one JSON rendering of a number, shared by top-level and nested values.
fn number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Opaque flags carried alongside a value through nested theories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Context(BTreeSet<String>);

impl Context {
    /// Whether `flag` is set.
    pub fn has(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    /// Sets `flag`; setting it twice is a no-op.
    pub fn insert(&mut self, flag: &str) {
        self.0.insert(String::from(flag));
    }

    /// Returns a copy of this context with `flag` set.
    pub fn with(&self, flag: &str) -> Context {
        let mut context = self.clone();
        context.insert(flag);
        context
    }

    /// The set flags, in sorted order.
    pub fn flags(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|s| s.as_str())
    }
}

/// A value to be transformed, with the flags collected on its way through nested theories.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// The value itself.
    pub value: Value,
    /// Flags set by the theories the input passed through.
    pub context: Context,
}

impl Input {
    /// An input with an empty context.
    pub fn new(value: impl Into<Value>) -> Self {
        Input {
            value: value.into(),
            context: Context::default(),
        }
    }

    /// Replaces the value, keeping the context.
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        Input {
            value: value.into(),
            context: self.context.clone(),
        }
    }
}

/// A predicted or expected value.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// The value itself.
    pub value: Value,
    /// Flags carried over from the input the output answers.
    pub context: Context,
}

impl Output {
    /// An output with an empty context.
    pub fn new(value: impl Into<Value>) -> Self {
        Output {
            value: value.into(),
            context: Context::default(),
        }
    }

    /// Replaces the value, keeping the context.
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        Output {
            value: value.into(),
            context: self.context.clone(),
        }
    }
}

/// An input paired with its expected output; the unit of training and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// What the transformation is given.
    pub input: Input,
    /// What it should produce.
    pub output: Output,
}

impl Example {
    /// Pairs two plain values, both with empty contexts.
    pub fn new(input: impl Into<Value>, output: impl Into<Value>) -> Self {
        Example {
            input: Input::new(input),
            output: Output::new(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_forms() {
        assert_eq!(Value::from("abc").canonical(), "abc");
        assert_eq!(Value::Num(3.0).canonical(), "3");
        assert_eq!(Value::Num(2.5).canonical(), "2.5");
        assert_eq!(Value::Null.canonical(), "null");
        let map: Value = vec![("b", Value::Num(1.0)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(map.canonical(), r#"{"a":"x","b":1}"#);
    }

    #[test]
    fn nested_numbers_print_like_top_level() {
        for n in [3.0, -2.5, 1e20, 0.1] {
            let map: Value = vec![("n", Value::Num(n))].into_iter().collect();
            assert_eq!(
                map.canonical(),
                format!(r#"{{"n":{}}}"#, Value::Num(n).canonical())
            );
        }
        assert_eq!(Value::Num(f64::NAN).canonical(), "null");
    }

    #[test]
    fn equality_is_structural() {
        assert!(Value::Num(12.0).same_as(&Value::from("12")));
        assert!(!Value::from("12").same_as(&Value::from("12.5")));
        let m1: Value = vec![("k", "v")].into_iter().collect();
        let m2: Value = vec![("k", "v")].into_iter().collect();
        assert!(m1.same_as(&m2));
    }

    #[test]
    fn deserializes_untagged() {
        let v: Value = serde_json::from_str(r#"{"a": "hi", "n": 4, "z": null}"#).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map["a"], Value::from("hi"));
        assert_eq!(map["n"], Value::Num(4.0));
        assert_eq!(map["z"], Value::Null);
    }

    #[test]
    fn context_flags() {
        let ctx = Context::default().with(flags::FRAGMENTED);
        assert!(ctx.has(flags::FRAGMENTED));
        assert!(!ctx.has(flags::ENRICHED));
        assert_eq!(ctx.flags().collect::<Vec<_>>(), vec![flags::FRAGMENTED]);
    }
}
