//! Object construction and enumeration
//!
//! Builders that turn key/value sequences into object values, plus the
//! enumeration helpers needed to walk them back out. Keys are always
//! stringified with [`Value::to_display_string`], so a numeric key `45`
//! becomes the property `"45"`.

use crate::seq;
use crate::value::Value;

/// Build an object from an ordered sequence of `[key, value]` pairs.
/// A missing value slot yields Undefined, extra slots are ignored, and a
/// duplicated key keeps the last value. A string pair is indexed like any
/// other sequence, so `"ab"` contributes key `"a"` with value `"b"`.
pub fn from_pairs(pairs: &Value) -> Value {
    let mut out: Vec<(String, Value)> = Vec::new();
    for pair in seq::elements(pairs) {
        let fields = seq::elements(&pair);
        let key = fields
            .first()
            .map(|k| k.to_display_string())
            .unwrap_or_else(|| "undefined".to_string());
        let value = fields.get(1).cloned().unwrap_or(Value::Undefined);
        out.push((key, value));
    }
    Value::object_from(out)
}

/// Build an object pairing `keys[i]` with `values[i]`. Extra keys get
/// Undefined values; extra values are ignored.
pub fn zip_object(keys: &Value, values: &Value) -> Value {
    let keys = seq::elements(keys);
    let values = seq::elements(values);
    Value::object_from(keys.iter().enumerate().map(|(i, key)| {
        (
            key.to_display_string(),
            values.get(i).cloned().unwrap_or(Value::Undefined),
        )
    }))
}

/// Property names of an object, sorted for deterministic enumeration.
/// Empty for non-objects.
pub fn keys(obj: &Value) -> Vec<String> {
    let Some(properties) = obj.as_object() else {
        return Vec::new();
    };
    let mut out: Vec<String> = properties.borrow().keys().cloned().collect();
    out.sort();
    out
}

/// Property values in [`keys`] order
pub fn values_of(obj: &Value) -> Vec<Value> {
    keys(obj).iter().map(|k| obj.get(k)).collect()
}

/// `(key, value)` pairs in [`keys`] order
pub fn entries(obj: &Value) -> Vec<(String, Value)> {
    keys(obj)
        .into_iter()
        .map(|k| {
            let v = obj.get(&k);
            (k, v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_pairs_stringifies_keys_and_keeps_last_duplicate() {
        let pairs = Value::array(vec![
            Value::array(vec![Value::from(45), Value::from("first")]),
            Value::array(vec![Value::from(45), Value::from("second")]),
            Value::array(vec![Value::from("lonely")]),
        ]);
        let obj = from_pairs(&pairs);
        assert_eq!(obj.get("45"), Value::from("second"));
        assert_eq!(obj.get("lonely"), Value::Undefined);
        assert_eq!(keys(&obj), vec!["45".to_string(), "lonely".to_string()]);
    }

    #[test]
    fn zip_object_pads_missing_values_with_undefined() {
        let obj = zip_object(
            &Value::array(vec![Value::from("a"), Value::from("b"), Value::from("c")]),
            &Value::array(vec![Value::from(1), Value::from(2)]),
        );
        assert_eq!(obj.get("a"), Value::from(1));
        assert_eq!(obj.get("b"), Value::from(2));
        assert_eq!(obj.get("c"), Value::Undefined);

        // extra values are ignored
        let obj = zip_object(
            &Value::array(vec![Value::from("only")]),
            &Value::array(vec![Value::from(1), Value::from(2)]),
        );
        assert_eq!(keys(&obj), vec!["only".to_string()]);
    }

    #[test]
    fn enumeration_is_sorted_and_null_safe() {
        assert!(keys(&Value::Null).is_empty());
        assert!(entries(&Value::from("not an object")).is_empty());

        let obj = Value::object_from([
            ("b".to_string(), Value::from(2)),
            ("a".to_string(), Value::from(1)),
        ]);
        assert_eq!(
            entries(&obj),
            vec![
                ("a".to_string(), Value::from(1)),
                ("b".to_string(), Value::from(2)),
            ]
        );
        assert_eq!(values_of(&obj), vec![Value::from(1), Value::from(2)]);
    }
}
