use indexmap::IndexMap;

/// A JSON document value that pipelines are evaluated against.
///
/// Integers and floats are kept apart so literal `0` stays an integer when it
/// is rendered back out; comparisons treat them as one numeric type.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use jmespath_waiters::Value;
///
/// let mut object = IndexMap::new();
/// object.insert("State".to_string(), Value::String("running".to_string()));
/// object.insert("Count".to_string(), Value::Integer(2));
/// let value = Value::Object(object);
///
/// assert!(value.is_truthy());
/// assert_eq!(value.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// JSON null
    #[default]
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with unique keys, in insertion order
    Object(IndexMap<String, Value>),
}

impl Value {
    /// JMESPath truthiness: `null`, `false`, `""`, `[]` and `{}` are false.
    /// Every number, zero included, is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Float(_) | Value::Integer(_) => true,
            Value::String(s) => !s.is_empty(),
            Value::Array(arr) => !arr.is_empty(),
            Value::Object(obj) => !obj.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect()),
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(!Value::Object(IndexMap::new()).is_truthy());

        assert!(Value::Integer(0).is_truthy());
        assert!(Value::Float(-1.5).is_truthy());
        assert!(Value::from("false").is_truthy());
        assert!(Value::Array(vec![Value::Null]).is_truthy());
    }

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = Value::from(json!({"z": 1, "a": 2.5, "m": [true, null]}));
        let Value::Object(object) = &value else {
            panic!("Expected object, got {value:?}");
        };
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(object["a"], Value::Float(2.5));
        assert_eq!(object["m"], Value::Array(vec![Value::Boolean(true), Value::Null]));
    }

    #[test]
    fn test_to_json() {
        let value = Value::Array(vec![Value::Integer(1), Value::Float(f64::NAN), Value::from("x")]);
        assert_eq!(serde_json::Value::from(value), json!([1, null, "x"]));
    }
}
