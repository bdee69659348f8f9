//! Template data model.

use std::{collections::BTreeMap, fmt, sync::Arc};

/// Keyed container of template values.
pub type Map = BTreeMap<String, Value>;

/// A value a template can reference.
///
/// Scalars, containers and lazily produced values are distinct variants, so
/// every place that consumes a value decides explicitly how to treat each.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Map),
    /// Produced on demand, only when a template references it.
    Lazy(LazyValue),
}

/// Zero-argument value producer.
#[derive(Clone)]
pub struct LazyValue(Arc<dyn Fn() -> Value + Send + Sync>);

impl LazyValue {
    /// Wrap a producer.
    pub fn new(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(producer))
    }

    /// Run the producer.
    pub fn get(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyValue(..)")
    }
}

impl PartialEq for LazyValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Value {
    /// Build a lazily evaluated value.
    pub fn lazy(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Lazy(LazyValue::new(producer))
    }

    /// Evaluate lazy values until a concrete one remains.
    pub fn force(self) -> Value {
        let mut value = self;
        while let Value::Lazy(lazy) = value {
            value = lazy.get();
        }
        value
    }

    /// Direct child by key (maps) or numeric index (lists).
    pub fn child(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(segment),
            Value::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Owned variant of [`Value::child`].
    pub fn into_child(self, segment: &str) -> Option<Value> {
        match self {
            Value::Map(mut map) => map.remove(segment),
            Value::List(items) => {
                let index = segment.parse::<usize>().ok()?;
                items.into_iter().nth(index)
            }
            Value::Lazy(lazy) => lazy.get().into_child(segment),
            _ => None,
        }
    }

    /// Truthiness used by conditional blocks.
    ///
    /// Null, `false`, zero, the empty string and the empty list are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(_) => true,
            Value::Lazy(lazy) => lazy.get().is_truthy(),
        }
    }

    /// Text substituted for a variable reference.
    ///
    /// Whole floats print without a fractional part, lists join their
    /// elements with commas, maps and null produce nothing.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Map(_) => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(","),
            Value::Lazy(lazy) => lazy.get().to_text(),
        }
    }

    /// Numeric view for comparisons, parsing strings that hold a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Convert frontmatter metadata into a template value.
    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(*b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_yaml::Value::String(s) => Value::Str(s.clone()),
            serde_yaml::Value::Sequence(items) => {
                Value::List(items.iter().map(Value::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(mapping) => Value::Map(
                mapping
                    .iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, Value::from_yaml(v))))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
