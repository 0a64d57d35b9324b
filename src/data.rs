//! Record types: a name plus an ordered set of typed fields.
use indexmap::IndexMap;

use crate::builtins::Primitive;
use crate::error::{AdtError, Result};
use crate::ty::{Kind, Type};
use crate::union::Union;

/// Ordered field name → field spec mapping, used for both records and unions.
pub type Fields = IndexMap<String, FieldSpec>;

/// One entry of a definition, before it is resolved to a [`Type`].
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Type(Type),
    Primitive(Primitive),
    /// Becomes a nested record named `<Owner>.<field>`.
    Record(Fields),
}

impl FieldSpec {
    pub(crate) fn resolve(self, name: &str) -> Result<Type> {
        match self {
            FieldSpec::Type(ty) => Ok(ty),
            FieldSpec::Primitive(p) => Ok(p.descriptor()),
            FieldSpec::Record(fields) => make_data(name, fields),
        }
    }
}

impl From<Type> for FieldSpec {
    fn from(ty: Type) -> Self {
        FieldSpec::Type(ty)
    }
}

impl From<&Type> for FieldSpec {
    fn from(ty: &Type) -> Self {
        FieldSpec::Type(ty.clone())
    }
}

impl From<Union> for FieldSpec {
    fn from(union: Union) -> Self {
        FieldSpec::Type(union.as_type().clone())
    }
}

impl From<&Union> for FieldSpec {
    fn from(union: &Union) -> Self {
        FieldSpec::Type(union.as_type().clone())
    }
}

impl From<Primitive> for FieldSpec {
    fn from(p: Primitive) -> Self {
        FieldSpec::Primitive(p)
    }
}

impl From<Fields> for FieldSpec {
    fn from(fields: Fields) -> Self {
        FieldSpec::Record(fields)
    }
}

/// Build a [`Fields`] mapping: `fields! { "x": Primitive::Number, "y": &point }`.
#[macro_export]
macro_rules! fields {
    ($($key:literal : $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::FieldSpec::from($value));
        )*
        fields
    }};
}

/// Build a record type.
///
/// A value conforms when it is an object holding every declared field, each
/// accepted by its field type; extra keys are ignored. Construction rebuilds
/// the object from the declared fields only, in declaration order.
pub fn make_data(name: impl Into<String>, fields: Fields) -> Result<Type> {
    let name = name.into();
    let fields = resolve_fields(&name, fields)?;
    Ok(Type::from_kind(name, Kind::Data { fields }))
}

pub(crate) fn resolve_fields(owner: &str, fields: Fields) -> Result<IndexMap<String, Type>> {
    if owner.trim().is_empty() {
        return Err(AdtError::definition(owner, "a type needs a non-blank name"));
    }
    fields
        .into_iter()
        .map(|(key, spec)| {
            if key.trim().is_empty() {
                return Err(AdtError::definition(owner, "field names must be non-blank"));
            }
            let ty = spec.resolve(&format!("{owner}.{key}"))?;
            Ok((key, ty))
        })
        .collect()
}
