//! Type descriptors: named validators that tag the values they accept.
//!
//! A [`Type`] is an immutable, cheaply cloned handle. Four shapes exist:
//! - scalar: a predicate plus an optional normalizer (`make_type`)
//! - data: a record of field types (`make_data`)
//! - variant: one alternative of a union, delegating to its payload type
//! - sum: the union itself, used when a union appears as a field type
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{AdtError, Result};
use crate::instance::{Inspect, Instance};
use crate::trace;

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type Normalizer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

#[derive(Clone)]
pub struct Type(Arc<TypeDef>);

struct TypeDef {
    name: String,
    kind: Kind,
}

pub(crate) enum Kind {
    Scalar {
        predicate: Predicate,
        normalize: Option<Normalizer>,
        /// schema fragment for `schema::emit_schema`
        hint: Option<Value>,
    },
    Data {
        fields: IndexMap<String, Type>,
    },
    Variant {
        payload: Type,
    },
    Sum {
        variants: IndexMap<String, Type>,
    },
}

/// Build a Type from a name and a predicate; values are taken as-is.
pub fn make_type<P>(name: impl Into<String>, predicate: P) -> Type
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Type::scalar(name, Arc::new(predicate), None, None)
}

/// Like [`make_type`], but every raw value passes through `normalize` before
/// the predicate sees it.
pub fn make_type_with<P, N>(name: impl Into<String>, predicate: P, normalize: N) -> Type
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
    N: Fn(Value) -> Value + Send + Sync + 'static,
{
    Type::scalar(name, Arc::new(predicate), Some(Arc::new(normalize)), None)
}

impl Type {
    pub(crate) fn scalar(
        name: impl Into<String>,
        predicate: Predicate,
        normalize: Option<Normalizer>,
        hint: Option<Value>,
    ) -> Self {
        Self::from_kind(name, Kind::Scalar { predicate, normalize, hint })
    }

    pub(crate) fn variant(name: impl Into<String>, payload: Type) -> Self {
        Self::from_kind(name, Kind::Variant { payload })
    }

    pub(crate) fn from_kind(name: impl Into<String>, kind: Kind) -> Self {
        Type(Arc::new(TypeDef { name: name.into(), kind }))
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.0.kind
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Descriptor identity, not structural equality.
    pub fn same(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Membership test without normalization.
    ///
    /// An instance tagged by this descriptor (or, for a union, by one of its
    /// variants) is accepted outright; everything else is checked against the
    /// predicate.
    pub fn is<V: Inspect + ?Sized>(&self, value: &V) -> bool {
        if let Some(tag) = value.tag() {
            if self.same(tag) {
                return true;
            }
            if let Kind::Sum { variants } = self.kind() {
                if variants.values().any(|v| v.same(tag)) {
                    return true;
                }
            }
        }
        self.accepts(value.raw())
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match self.kind() {
            Kind::Scalar { predicate, .. } => predicate(value),
            Kind::Data { fields } => match value {
                Value::Object(map) => fields
                    .iter()
                    .all(|(key, ty)| map.get(key).is_some_and(|v| ty.accepts(v))),
                _ => false,
            },
            Kind::Variant { payload } => payload.accepts(value),
            Kind::Sum { variants } => variants.values().any(|v| v.accepts(value)),
        }
    }

    /// Validate `raw`, normalize it and tag the result with this descriptor.
    pub fn construct(&self, raw: impl Into<Value>) -> Result<Instance> {
        let value = self.check(raw.into())?;
        trace::constructed(self.name(), &value);
        Ok(Instance::new(self.clone(), value))
    }

    /// Normalize + validate without tagging; nested fields go through here.
    pub(crate) fn check(&self, raw: Value) -> Result<Value> {
        match self.kind() {
            Kind::Scalar { predicate, normalize, .. } => {
                let Some(normalize) = normalize else {
                    return if predicate(&raw) { Ok(raw) } else { Err(self.rejected(raw)) };
                };
                let value = normalize(raw.clone());
                if predicate(&value) { Ok(value) } else { Err(self.rejected(raw)) }
            }
            Kind::Data { fields } => {
                let mut map = match raw {
                    Value::Object(map) => map,
                    other => return Err(self.rejected(other)),
                };
                let mut out = Map::with_capacity(fields.len());
                for (key, ty) in fields {
                    let Some(field) = map.remove(key) else {
                        return Err(AdtError::MissingField {
                            expected: self.name().to_string(),
                            field: key.clone(),
                            path: Vec::new(),
                        });
                    };
                    let field = ty.check(field).map_err(|e| e.within(key))?;
                    trace::constructed(ty.name(), &field);
                    out.insert(key.clone(), field);
                }
                Ok(Value::Object(out))
            }
            Kind::Variant { payload } => {
                let value = payload.check(raw)?;
                if payload.accepts(&value) { Ok(value) } else { Err(self.rejected(value)) }
            }
            // A finished payload is kept as-is; only raw input goes through a
            // variant's normalizer, first success in declaration order.
            Kind::Sum { variants } => {
                if let Some(variant) = variants.values().find(|v| v.accepts(&raw)) {
                    return Ok(variant.settle(raw));
                }
                variants
                    .values()
                    .find_map(|v| v.check(raw.clone()).ok())
                    .ok_or_else(|| self.rejected(raw))
            }
        }
    }

    /// Rebuild a value this descriptor already accepts: records drop
    /// undeclared keys, nothing is normalized again.
    fn settle(&self, value: Value) -> Value {
        match (self.kind(), value) {
            (Kind::Data { fields }, Value::Object(mut map)) => Value::Object(
                fields
                    .iter()
                    .filter_map(|(key, ty)| map.remove(key).map(|v| (key.clone(), ty.settle(v))))
                    .collect(),
            ),
            (Kind::Variant { payload }, value) => payload.settle(value),
            (Kind::Sum { variants }, value) => match variants.values().find(|v| v.accepts(&value)) {
                Some(variant) => variant.settle(value),
                None => value,
            },
            (_, value) => value,
        }
    }

    fn rejected(&self, value: Value) -> AdtError {
        AdtError::rejected(self.name(), value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(x)", self.name())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.kind() {
            Kind::Scalar { .. } => "scalar",
            Kind::Data { .. } => "data",
            Kind::Variant { .. } => "variant",
            Kind::Sum { .. } => "union",
        };
        f.debug_struct("Type").field("name", &self.name()).field("shape", &shape).finish()
    }
}
