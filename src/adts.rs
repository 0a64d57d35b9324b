//! `Maybe` and `Result`: ordinary unions over the built-in descriptors.
//!
//! The variants are plain variant types, so `MAYBE.construct("Just", x)`
//! and `just(x)` build the same tagged instance.
use std::fmt::Display;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::builtins::{self, failure_payload};
use crate::error::Result;
use crate::instance::Instance;
use crate::trace;
use crate::ty::Type;
use crate::union::Union;

static JUST: Lazy<Type> = Lazy::new(|| Type::variant("Just", builtins::ANY.clone()));
static NOTHING: Lazy<Type> = Lazy::new(|| Type::variant("Nothing", builtins::NOTHING.clone()));
static OK: Lazy<Type> = Lazy::new(|| Type::variant("Ok", builtins::SUCCESS.clone()));
static ERR: Lazy<Type> = Lazy::new(|| Type::variant("Err", builtins::ERROR.clone()));

/// `Just` (any non-null value) | `Nothing`.
pub static MAYBE: Lazy<Union> = Lazy::new(|| {
    let variants = IndexMap::from([
        ("Just".to_string(), JUST.clone()),
        ("Nothing".to_string(), NOTHING.clone()),
    ]);
    Union::from_variants("Maybe", variants)
});

/// `Ok` (`{ ok: true, value }`) | `Err` (`{ ok: false, error }`).
pub static RESULT: Lazy<Union> = Lazy::new(|| {
    let variants = IndexMap::from([
        ("Ok".to_string(), OK.clone()),
        ("Err".to_string(), ERR.clone()),
    ]);
    Union::from_variants("Result", variants)
});

/// Fails for `null`.
pub fn just(value: impl Into<Value>) -> Result<Instance> {
    JUST.construct(value)
}

pub fn nothing() -> Instance {
    tagged(&NOTHING, Value::Null)
}

/// Fails for `null`.
pub fn ok(value: impl Into<Value>) -> Result<Instance> {
    OK.construct(value)
}

/// A JSON string is kept as the message; anything else is rendered as JSON text.
pub fn err(error: impl Into<Value>) -> Instance {
    tagged(&ERR, failure_payload(error.into()))
}

/// Lift a Rust result into a `Result` instance. A success holding `null`
/// becomes an `Err` carrying the rejection message.
pub fn from_result<T, E>(result: std::result::Result<T, E>) -> Instance
where
    T: Into<Value>,
    E: Display,
{
    match result {
        Ok(value) => ok(value).unwrap_or_else(|rejected| err(rejected.to_string())),
        Err(error) => err(error.to_string()),
    }
}

// `Nothing` and `Err` normalize every input into a payload their predicate
// accepts; these two apply the same normalizer without a fallible return.
fn tagged(variant: &Type, payload: Value) -> Instance {
    debug_assert!(variant.is(&payload));
    trace::constructed(variant.name(), &payload);
    Instance::new(variant.clone(), payload)
}
