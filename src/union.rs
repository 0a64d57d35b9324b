//! Sum types: named alternatives plus `case` dispatch.
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::data::{Fields, resolve_fields};
use crate::error::{AdtError, Result};
use crate::instance::{Inspect, Instance};
use crate::ty::{Kind, Type};

#[derive(Clone)]
pub struct Union {
    ty: Type,
    variants: IndexMap<String, Type>,
}

/// Build a union from variant name → payload spec.
///
/// Each variant becomes a full [`Type`] named after the variant, whose
/// predicate is the payload's `is` and whose normalizer is payload
/// construction.
pub fn make_union(name: impl Into<String>, variants: Fields) -> Result<Union> {
    let name = name.into();
    if variants.is_empty() {
        return Err(AdtError::definition(&name, "a union needs at least one variant"));
    }
    let payloads = resolve_fields(&name, variants)?;
    Ok(Union::assemble(name, payloads))
}

impl Union {
    fn assemble(name: impl Into<String>, payloads: IndexMap<String, Type>) -> Self {
        let variants = payloads
            .into_iter()
            .map(|(variant, payload)| {
                let ty = Type::variant(variant.clone(), payload);
                (variant, ty)
            })
            .collect();
        Self::from_variants(name, variants)
    }

    /// `variants` must already be variant-shaped types (`Type::variant`).
    pub(crate) fn from_variants(name: impl Into<String>, variants: IndexMap<String, Type>) -> Self {
        let ty = Type::from_kind(name, Kind::Sum { variants: variants.clone() });
        Union { ty, variants }
    }

    pub fn name(&self) -> &str {
        self.ty.name()
    }

    /// The union as a field type: accepts what any variant accepts.
    pub fn as_type(&self) -> &Type {
        &self.ty
    }

    pub fn variant(&self, name: &str) -> Option<&Type> {
        self.variants.get(name)
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// `Union.<Variant>(payload)`.
    pub fn construct(&self, variant: &str, payload: impl Into<Value>) -> Result<Instance> {
        let ty = self.variant(variant).ok_or_else(|| AdtError::UnknownVariant {
            union: self.name().to_string(),
            variant: variant.to_string(),
        })?;
        ty.construct(payload)
    }

    pub fn is<V: Inspect + ?Sized>(&self, value: &V) -> bool {
        self.ty.is(value)
    }

    /// Names of every variant whose predicate accepts `value`, in declaration order.
    pub fn matching(&self, value: &Value) -> Vec<&str> {
        self.variants
            .iter()
            .filter(|(_, ty)| ty.accepts(value))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The variant `case` dispatches to.
    ///
    /// Instances built through one of this union's variants answer with their
    /// tag. Anything else goes to the first accepting variant.
    pub fn variant_of<V: Inspect + ?Sized>(&self, value: &V) -> Option<&str> {
        if let Some(tag) = value.tag() {
            if let Some((name, _)) = self.variants.iter().find(|(_, ty)| ty.same(tag)) {
                return Some(name.as_str());
            }
        }
        self.variants
            .iter()
            .find(|(_, ty)| ty.accepts(value.raw()))
            .map(|(name, _)| name.as_str())
    }

    pub fn case<R, V: Inspect + ?Sized>(&self, value: &V, handlers: &Handlers<'_, R>) -> Result<R> {
        let matched = self.variant_of(value).ok_or_else(|| AdtError::NoVariantMatched {
            union: self.name().to_string(),
            value: value.raw().clone(),
        })?;
        let handler = handlers.get(matched).ok_or_else(|| AdtError::MissingHandler {
            union: self.name().to_string(),
            variant: matched.to_string(),
        })?;
        Ok(handler(value.raw()))
    }
}

impl fmt::Display for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.variant_names().collect();
        write!(f, "{}({})", self.name(), names.join(" | "))
    }
}

impl fmt::Debug for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Union")
            .field("name", &self.name())
            .field("variants", &self.variant_names().collect::<Vec<_>>())
            .finish()
    }
}

type Handler<'a, R> = Box<dyn Fn(&Value) -> R + 'a>;

/// Variant name → handler table for [`Union::case`].
pub struct Handlers<'a, R> {
    arms: IndexMap<String, Handler<'a, R>>,
}

impl<'a, R> Handlers<'a, R> {
    pub fn new() -> Self {
        Self { arms: IndexMap::new() }
    }

    pub fn on(mut self, variant: impl Into<String>, handler: impl Fn(&Value) -> R + 'a) -> Self {
        self.arms.insert(variant.into(), Box::new(handler));
        self
    }

    pub fn get(&self, variant: &str) -> Option<&(dyn Fn(&Value) -> R + 'a)> {
        self.arms.get(variant).map(|h| h.as_ref())
    }
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}
