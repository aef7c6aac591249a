//! Shared helpers for integration tests

#![allow(dead_code)]

use lodestone::Value;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a tracing subscriber once for the whole test binary, honoring
/// `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Array of integer numbers
pub fn nums(ns: &[i64]) -> Value {
    Value::array(ns.iter().map(|&n| Value::from(n)).collect())
}

/// Array of float numbers
pub fn floats(ns: &[f64]) -> Value {
    Value::array(ns.iter().map(|&n| Value::from(n)).collect())
}

/// Array of strings
pub fn strs(ss: &[&str]) -> Value {
    Value::array(ss.iter().map(|&s| Value::from(s)).collect())
}

/// Object from string keys and values
pub fn obj(pairs: &[(&str, Value)]) -> Value {
    Value::object_from(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())))
}

/// Value from a JSON literal
pub fn json(literal: serde_json::Value) -> Value {
    Value::from_json(literal)
}
