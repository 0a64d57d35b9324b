use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::ty::Type;

/// A value that passed construction, tagged with the descriptor that built it.
///
/// Instances are read-only: the payload is shared behind an `Arc` and only
/// reachable through `&Value`.
#[derive(Clone)]
pub struct Instance {
    ty: Type,
    value: Arc<Value>,
}

impl Instance {
    pub(crate) fn new(ty: Type, value: Value) -> Self {
        Self { ty, value: Arc::new(value) }
    }

    /// The descriptor this value was constructed through.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        Arc::try_unwrap(self.value).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Deref for Instance {
    type Target = Value;
    fn deref(&self) -> &Value {
        &self.value
    }
}

impl PartialEq<Value> for Instance {
    fn eq(&self, other: &Value) -> bool {
        *self.value == *other
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.ty.name(), self.value)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Anything `Type::is` and `Union::case` can look at: raw JSON or tagged instances.
pub trait Inspect {
    fn raw(&self) -> &Value;

    fn tag(&self) -> Option<&Type> {
        None
    }
}

impl Inspect for Value {
    fn raw(&self) -> &Value {
        self
    }
}

impl Inspect for Instance {
    fn raw(&self) -> &Value {
        &self.value
    }

    fn tag(&self) -> Option<&Type> {
        Some(&self.ty)
    }
}
