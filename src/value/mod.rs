//! JavaScript-flavored value types
//!
//! This module defines the runtime representation of the values the sequence
//! and object operations work over. The semantics deliberately follow
//! JavaScript: `undefined` is a first-class sentinel, truthiness treats
//! `false`, `null`, `undefined`, `0`, `NaN` and `""` as falsy, and compound
//! values (arrays, objects) have reference identity.
//!
//! Three equality relations are kept distinct because the operations depend
//! on the distinction:
//!
//! - [`Value::strict_equals`] — `===`: `NaN` is not equal to itself, arrays
//!   and objects compare by reference.
//! - [`Value::same_value_zero`] — SameValueZero: like strict equality but
//!   `NaN` equals `NaN`. Used by `difference`, `index_of`, `intersection`
//!   and the pull family.
//! - [`Value::deep_equals`] — structural equality, recursing into arrays and
//!   objects. This is what `PartialEq` (and therefore `assert_eq!`) uses.

use rustc_hash::FxHashMap as HashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A JavaScript-flavored value
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Array with reference identity and interior mutability
    Array(Rc<RefCell<Vec<Value>>>),
    /// Object: string keys to values, reference identity
    Object(Rc<RefCell<HashMap<String, Value>>>),
}

impl Value {
    /// Create a new array value
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Create a new empty object value
    pub fn new_object() -> Value {
        Value::Object(Rc::new(RefCell::new(HashMap::default())))
    }

    /// Create a new object value from key/value pairs (later keys win)
    pub fn object_from<I>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut properties = HashMap::default();
        for (key, value) in pairs {
            properties.insert(key, value);
        }
        Value::Object(Rc::new(RefCell::new(properties)))
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if value is a plain object
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Borrowable array storage, if this value is an array
    pub fn as_array(&self) -> Option<&Rc<RefCell<Vec<Value>>>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrowable property map, if this value is an object
    pub fn as_object(&self) -> Option<&Rc<RefCell<HashMap<String, Value>>>> {
        match self {
            Value::Object(properties) => Some(properties),
            _ => None,
        }
    }

    /// Element count for arrays and strings (characters), None otherwise
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.borrow().len()),
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Convert to boolean (truthiness)
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Convert to number
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// Convert to the display string `String(x)` would produce
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(true) => "true".to_string(),
            Value::Boolean(false) => "false".to_string(),
            Value::Number(n) => {
                if n.is_nan() {
                    "NaN".to_string()
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        "Infinity".to_string()
                    } else {
                        "-Infinity".to_string()
                    }
                } else if *n == 0.0 {
                    "0".to_string()
                } else {
                    format!("{}", n)
                }
            }
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let elements: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|v| {
                        if v.is_nullish() {
                            String::new()
                        } else {
                            v.to_display_string()
                        }
                    })
                    .collect();
                elements.join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
        }
    }

    /// Descriptive type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() || b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// SameValueZero equality: like strict equality, except NaN equals NaN.
    /// Compound values still compare by reference identity, which is the
    /// documented pitfall of `difference` on structurally-equal objects.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            _ => self.strict_equals(other),
        }
    }

    /// Structural equality, recursing into arrays and objects.
    /// NaN equals NaN here, matching deep-equality assertion libraries.
    pub fn deep_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_equals(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.deep_equals(w)))
            }
            _ => self.same_value_zero(other),
        }
    }

    /// Property access with an `Undefined` sentinel for anything absent.
    /// Arrays expose `length` and numeric indices; strings expose `length`
    /// and per-character indices; objects look up named properties.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(properties) => properties
                .borrow()
                .get(key)
                .cloned()
                .unwrap_or(Value::Undefined),
            Value::Array(items) => {
                let items = items.borrow();
                if key == "length" {
                    return Value::Number(items.len() as f64);
                }
                if let Ok(idx) = key.parse::<usize>() {
                    return items.get(idx).cloned().unwrap_or(Value::Undefined);
                }
                Value::Undefined
            }
            Value::String(s) => {
                if key == "length" {
                    return Value::Number(s.chars().count() as f64);
                }
                if let Ok(idx) = key.parse::<usize>() {
                    return s
                        .chars()
                        .nth(idx)
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or(Value::Undefined);
                }
                Value::Undefined
            }
            _ => Value::Undefined,
        }
    }

    /// Set a property on an object. Returns false for non-objects.
    pub fn set(&self, key: &str, value: Value) -> bool {
        match self {
            Value::Object(properties) => {
                properties.borrow_mut().insert(key.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// One-level copy: a fresh array/object sharing the same element values.
    /// Scalars clone as themselves. This is the clone in the
    /// clone-then-mutate pattern for immutable variants of mutating ops.
    pub fn shallow_clone(&self) -> Value {
        match self {
            Value::Array(items) => Value::array(items.borrow().clone()),
            Value::Object(properties) => {
                Value::Object(Rc::new(RefCell::new(properties.borrow().clone())))
            }
            other => other.clone(),
        }
    }

    /// Convert a `serde_json::Value` into a `Value`
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                Value::object_from(map.into_iter().map(|(k, v)| (k, Value::from_json(v))))
            }
        }
    }

    /// Convert to a `serde_json::Value`. Undefined and non-finite numbers
    /// map to JSON null, mirroring `JSON.stringify`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.borrow().iter().map(|v| v.to_json()).collect())
            }
            Value::Object(properties) => {
                let mut map = serde_json::Map::new();
                let props = properties.borrow();
                let mut keys: Vec<&String> = props.keys().collect();
                keys.sort();
                for key in keys {
                    map.insert(key.clone(), props[key].to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => write!(f, "{:?}", items.borrow()),
            Value::Object(properties) => {
                let props = properties.borrow();
                let mut keys: Vec<&String> = props.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, props[*key])?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
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
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_equality() {
        assert!(Value::Undefined.strict_equals(&Value::Undefined));
        assert!(Value::Null.strict_equals(&Value::Null));
        assert!(Value::Boolean(true).strict_equals(&Value::Boolean(true)));
        assert!(Value::Number(42.0).strict_equals(&Value::Number(42.0)));
        assert!(Value::from("hello").strict_equals(&Value::from("hello")));
        assert!(!Value::Null.strict_equals(&Value::Undefined));

        // NaN is not equal to itself
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));

        // arrays compare by reference
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = Value::array(vec![Value::Number(1.0)]);
        assert!(!a.strict_equals(&b));
        assert!(a.strict_equals(&a.clone()));
    }

    #[test]
    fn test_same_value_zero() {
        // NaN equals NaN, +0 equals -0
        assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
        assert!(Value::Number(0.0).same_value_zero(&Value::Number(-0.0)));

        // structurally equal objects are still unequal
        let a = Value::object_from([("x".to_string(), Value::Number(12.0))]);
        let b = Value::object_from([("x".to_string(), Value::Number(12.0))]);
        assert!(!a.same_value_zero(&b));
        assert!(a.deep_equals(&b));
    }

    #[test]
    fn test_deep_equality() {
        let a = Value::array(vec![Value::from(1), Value::array(vec![Value::from("x")])]);
        let b = Value::array(vec![Value::from(1), Value::array(vec![Value::from("x")])]);
        assert_eq!(a, b);
        assert_ne!(a, Value::array(vec![Value::from(1)]));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.to_boolean());
        assert!(!Value::Null.to_boolean());
        assert!(!Value::Boolean(false).to_boolean());
        assert!(!Value::Number(0.0).to_boolean());
        assert!(!Value::Number(f64::NAN).to_boolean());
        assert!(!Value::from("").to_boolean());

        assert!(Value::Number(1.0).to_boolean());
        assert!(Value::from("hello").to_boolean());
        assert!(Value::array(vec![]).to_boolean());
        assert!(Value::new_object().to_boolean());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Undefined.to_display_string(), "undefined");
        assert_eq!(Value::Number(45.0).to_display_string(), "45");
        assert_eq!(Value::Number(1.5).to_display_string(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_display_string(), "NaN");
        assert_eq!(Value::from("age").to_display_string(), "age");
    }

    #[test]
    fn test_property_access() {
        let arr = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(arr.get("length"), Value::Number(2.0));
        assert_eq!(arr.get("0"), Value::Number(1.0));
        assert_eq!(arr.get("5"), Value::Undefined);

        let s = Value::from("hey");
        assert_eq!(s.get("length"), Value::Number(3.0));
        assert_eq!(s.get("1"), Value::from("e"));

        let obj = Value::object_from([("name".to_string(), Value::from("sergio"))]);
        assert_eq!(obj.get("name"), Value::from("sergio"));
        assert_eq!(obj.get("missing"), Value::Undefined);
    }

    #[test]
    fn test_shallow_clone_is_detached() {
        let original = Value::array(vec![Value::from(1), Value::from(2)]);
        let copy = original.shallow_clone();
        copy.as_array().unwrap().borrow_mut().reverse();
        assert_eq!(original, Value::array(vec![Value::from(1), Value::from(2)]));
        assert_eq!(copy, Value::array(vec![Value::from(2), Value::from(1)]));
    }

    #[test]
    fn test_json_round_trip() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"name":"sergio","amounts":[100,200]}"#).unwrap();
        let value = Value::from_json(json.clone());
        assert_eq!(value.get("name"), Value::from("sergio"));
        assert_eq!(value.get("amounts").get("length"), Value::Number(2.0));
        assert_eq!(value.to_json(), json);

        // undefined and NaN flatten to null on the way out
        let lossy = Value::array(vec![Value::Undefined, Value::Number(f64::NAN)]);
        assert_eq!(lossy.to_json(), serde_json::json!([null, null]));
    }
}
