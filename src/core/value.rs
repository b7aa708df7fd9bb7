//! Metadata data model — the tagged union rendered by the formatter.
//!
//! Every [`Value`] is exactly one of four shapes.  The enum tag *is* the
//! classification, so the dispatcher never has to probe a value's runtime
//! shape the way a dynamically typed caller would.

use std::fmt;

use ratatui::text::Text;

// ───────────────────────────────────────── types ─────────────

/// Root-level input: an ordered mapping from keys to values.
pub type Metadata = Mapping;

/// A renderable value of any shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Caller-constructed display content, passed through untouched.
    Node(Text<'static>),
    /// Nested key → value structure.
    Mapping(Mapping),
    /// Ordered list of values.
    Sequence(Vec<Value>),
    /// Primitive rendered as text.
    Scalar(Scalar),
}

/// Which of the four shapes a [`Value`] has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Node,
    Mapping,
    Sequence,
    Scalar,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Node(_) => ValueKind::Node,
            Value::Mapping(_) => ValueKind::Mapping,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// Wrap pre-rendered content so the formatter never decomposes it.
    pub fn node(text: impl Into<Text<'static>>) -> Self {
        Value::Node(text.into())
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }
}

/// A primitive value.  Its text form is its [`fmt::Display`] output.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

// ───────────────────────────────────────── mapping ───────────

/// Insertion-ordered key → value entries.
///
/// Keys are kept in the order the document (or caller) supplied them; that
/// order is the enumeration order used for rows and list entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`.  An existing key keeps its position and
    /// has its value replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`Mapping::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ───────────────────────────────────────── conversions ───────

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Int(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(Scalar::Float(n))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::null(),
            J::Bool(b) => b.into(),
            J::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                // u64 beyond i64::MAX, or a float.
                None => n.as_f64().map_or_else(|| n.to_string().into(), Value::from),
            },
            J::String(s) => s.into(),
            J::Array(items) => items.into(),
            J::Object(map) => Value::Mapping(map.into_iter().collect()),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(v: toml::Value) -> Self {
        use toml::Value as T;
        match v {
            T::String(s) => s.into(),
            T::Integer(n) => n.into(),
            T::Float(n) => n.into(),
            T::Boolean(b) => b.into(),
            T::Datetime(dt) => dt.to_string().into(),
            T::Array(items) => items.into(),
            T::Table(table) => Value::Mapping(table.into_iter().collect()),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(v: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Y;
        match v {
            Y::Null => Value::null(),
            Y::Bool(b) => b.into(),
            Y::Number(n) => match n.as_i64() {
                Some(i) => i.into(),
                None => n.as_f64().map_or_else(|| n.to_string().into(), Value::from),
            },
            Y::String(s) => s.into(),
            Y::Sequence(items) => items.into(),
            Y::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            Y::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

/// YAML allows non-string keys; render them by their scalar text.
fn yaml_key(key: serde_yaml::Value) -> String {
    match Value::from(key) {
        Value::Scalar(Scalar::String(s)) => s,
        Value::Scalar(other) => other.to_string(),
        // Complex keys are rare; fall back to the YAML text.
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_display_matches_plain_text() {
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-42).to_string(), "-42");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Float(2.0).to_string(), "2");
        assert_eq!(Scalar::String("svc-a".into()).to_string(), "svc-a");
    }

    #[test]
    fn mapping_keeps_insertion_order_and_replaces_in_place() {
        let mut m = Mapping::new();
        m.insert("b", 1i64);
        m.insert("a", 2i64);
        m.insert("b", 3i64);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(m.get("b"), Some(&Value::from(3i64)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn json_object_order_is_preserved() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": [true, null], "mid": {"x": 1.25}}"#)
                .unwrap();
        let Value::Mapping(m) = Value::from(json) else {
            panic!("expected mapping");
        };
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            m.get("alpha"),
            Some(&Value::Sequence(vec![true.into(), Value::null()]))
        );
        assert_eq!(m.get("mid").map(Value::kind), Some(ValueKind::Mapping));
    }

    #[test]
    fn toml_datetime_becomes_string() {
        let table: toml::Table = toml::from_str("when = 1979-05-27T07:32:00Z").unwrap();
        let v = Value::from(toml::Value::Table(table));
        let Value::Mapping(m) = v else {
            panic!("expected mapping");
        };
        assert_eq!(m.get("when"), Some(&Value::from("1979-05-27T07:32:00Z")));
    }

    #[test]
    fn yaml_non_string_keys_are_stringified() {
        let y: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes-ish\n").unwrap();
        let Value::Mapping(m) = Value::from(y) else {
            panic!("expected mapping");
        };
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["1", "true"]);
    }

    #[test]
    fn node_is_its_own_kind() {
        assert_eq!(Value::node("custom").kind(), ValueKind::Node);
        assert_eq!(Value::null().kind(), ValueKind::Scalar);
    }
}
