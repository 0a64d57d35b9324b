//! Built-in descriptors and the primitive placeholders that resolve to them.
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::predicate::{is_array, is_boolean, is_nothing, is_number, is_object, is_something, is_string};
use crate::ty::Type;

pub static STRING: Lazy<Type> =
    Lazy::new(|| Type::scalar("String", Arc::new(is_string), None, Some(json!({ "type": "string" }))));

pub static NUMBER: Lazy<Type> =
    Lazy::new(|| Type::scalar("Number", Arc::new(is_number), None, Some(json!({ "type": "number" }))));

pub static BOOLEAN: Lazy<Type> =
    Lazy::new(|| Type::scalar("Boolean", Arc::new(is_boolean), None, Some(json!({ "type": "boolean" }))));

pub static ARRAY: Lazy<Type> =
    Lazy::new(|| Type::scalar("Array", Arc::new(is_array), None, Some(json!({ "type": "array" }))));

pub static OBJECT: Lazy<Type> =
    Lazy::new(|| Type::scalar("Object", Arc::new(is_object), None, Some(json!({ "type": "object" }))));

/// Any non-null value.
pub static ANY: Lazy<Type> =
    Lazy::new(|| Type::scalar("Any", Arc::new(is_something), None, Some(json!({ "not": { "type": "null" } }))));

/// The absence marker; every input normalizes to `null`.
pub static NOTHING: Lazy<Type> = Lazy::new(|| {
    Type::scalar(
        "Nothing",
        Arc::new(is_nothing),
        Some(Arc::new(|_: Value| Value::Null)),
        Some(json!({ "type": "null" })),
    )
});

/// `{ "ok": true, "value": <non-null> }`, built from the bare value.
pub static SUCCESS: Lazy<Type> = Lazy::new(|| {
    Type::scalar(
        "Success",
        Arc::new(is_success),
        Some(Arc::new(success_payload)),
        Some(json!({
            "type": "object",
            "properties": { "ok": { "const": true }, "value": { "not": { "type": "null" } } },
            "required": ["ok", "value"]
        })),
    )
});

/// `{ "ok": false, "error": <string> }`, built from anything printable.
pub static ERROR: Lazy<Type> = Lazy::new(|| {
    Type::scalar(
        "Error",
        Arc::new(is_failure),
        Some(Arc::new(failure_payload)),
        Some(json!({
            "type": "object",
            "properties": { "ok": { "const": false }, "error": { "type": "string" } },
            "required": ["ok", "error"]
        })),
    )
});

/// Stand-ins for the raw primitive kinds inside a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl Primitive {
    pub fn descriptor(self) -> Type {
        match self {
            Primitive::String => STRING.clone(),
            Primitive::Number => NUMBER.clone(),
            Primitive::Boolean => BOOLEAN.clone(),
            Primitive::Array => ARRAY.clone(),
            Primitive::Object => OBJECT.clone(),
        }
    }
}

/// Every built-in descriptor, in a stable order.
pub fn all() -> [Type; 9] {
    [
        STRING.clone(),
        NUMBER.clone(),
        BOOLEAN.clone(),
        ARRAY.clone(),
        OBJECT.clone(),
        ANY.clone(),
        NOTHING.clone(),
        SUCCESS.clone(),
        ERROR.clone(),
    ]
}

fn is_success(v: &Value) -> bool {
    v.get("ok") == Some(&Value::Bool(true)) && v.get("value").is_some_and(is_something)
}

fn is_failure(v: &Value) -> bool {
    v.get("ok") == Some(&Value::Bool(false)) && v.get("error").is_some_and(is_string)
}

pub(crate) fn success_payload(value: Value) -> Value {
    json!({ "ok": true, "value": value })
}

pub(crate) fn failure_payload(error: Value) -> Value {
    let message = match error {
        Value::String(s) => s,
        other => other.to_string(),
    };
    json!({ "ok": false, "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_resolve_to_shared_descriptors() {
        assert!(Primitive::Number.descriptor().same(&NUMBER));
        assert!(Primitive::Object.descriptor().same(&OBJECT));
        assert_eq!(Primitive::Array.descriptor().name(), "Array");
    }

    #[test]
    fn nothing_swallows_its_input() {
        let inst = NOTHING.construct("ignored").unwrap();
        assert_eq!(inst, Value::Null);
    }

    #[test]
    fn success_wraps_and_rejects_null() {
        let inst = SUCCESS.construct(json!({"a": 1})).unwrap();
        assert_eq!(inst, json!({"ok": true, "value": {"a": 1}}));
        assert!(SUCCESS.construct(Value::Null).is_err());
        assert!(SUCCESS.is(&json!({"ok": true, "value": 0})));
        assert!(!SUCCESS.is(&json!({"ok": "yes", "value": 0})));
    }

    #[test]
    fn error_stringifies_non_strings() {
        assert_eq!(ERROR.construct("boom").unwrap(), json!({"ok": false, "error": "boom"}));
        assert_eq!(ERROR.construct(42).unwrap(), json!({"ok": false, "error": "42"}));
        assert_eq!(ERROR.construct(json!([1, 2])).unwrap(), json!({"ok": false, "error": "[1,2]"}));
    }

    #[test]
    fn any_excludes_only_null() {
        assert!(ANY.is(&json!(false)));
        assert!(ANY.is(&json!(0)));
        assert!(!ANY.is(&Value::Null));
    }
}
