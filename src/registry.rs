//! Explicit name table for descriptors, plus the JSON definition-file front end.
//!
//! A definition file declares types in order; each declaration may refer to
//! built-ins or to names declared before it.
//!
//! ```json
//! {
//!   "types": {
//!     "Point": { "data": { "x": "Number", "y": "Number" } },
//!     "Slug":  { "refine": { "base": "String", "pattern": "^[a-z-]+$" } },
//!     "Shape": { "union": { "Dot": "Point", "Box": { "w": "Number" } } }
//!   }
//! }
//! ```
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::adts::{MAYBE, RESULT};
use crate::builtins;
use crate::data::{FieldSpec, Fields, make_data};
use crate::error::{AdtError, Result};
use crate::schema::emit_schema;
use crate::ty::Type;
use crate::union::{Union, make_union};

// ————————————————————————————————————————————————————————————————————————————
// FILE FORMAT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionFile {
    #[serde(default)]
    pub types: IndexMap<String, Declaration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Declaration {
    /// Field specs stay raw so shape mistakes surface as definition errors.
    Data(Value),
    Union(Value),
    Refine(Refinement),
}

/// A scalar type narrowed from a base type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Refinement {
    pub base: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}

/// Parse a definition file; errors carry the JSON path of the offending node.
pub fn parse_definitions(src: &str) -> Result<DefinitionFile> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        AdtError::definition("<definitions>", format!("at JSON path {path} → {}", err.into_inner()))
    })
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub enum Entry {
    Type(Type),
    Union(Union),
}

impl Entry {
    pub fn as_type(&self) -> &Type {
        match self {
            Entry::Type(ty) => ty,
            Entry::Union(union) => union.as_type(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with every built-in descriptor plus `Maybe` and `Result`.
    pub fn with_builtins() -> Self {
        let mut entries = IndexMap::new();
        for ty in builtins::all() {
            entries.insert(ty.name().to_string(), Entry::Type(ty));
        }
        for union in [&*MAYBE, &*RESULT] {
            entries.insert(union.name().to_string(), Entry::Union(union.clone()));
        }
        Self { entries }
    }

    pub fn insert_type(&mut self, ty: Type) -> Result<()> {
        self.insert(ty.name().to_string(), Entry::Type(ty))
    }

    pub fn insert_union(&mut self, union: Union) -> Result<()> {
        self.insert(union.name().to_string(), Entry::Union(union))
    }

    fn insert(&mut self, name: String, entry: Entry) -> Result<()> {
        if self.entries.contains_key(&name) {
            return Err(AdtError::definition(&name, "name is already registered"));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Any entry, unions included, as a field type.
    pub fn ty(&self, name: &str) -> Option<&Type> {
        self.get(name).map(Entry::as_type)
    }

    pub fn union(&self, name: &str) -> Option<&Union> {
        match self.get(name)? {
            Entry::Union(union) => Some(union),
            Entry::Type(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse and register every declaration in `src`; returns the new names in order.
    pub fn load_str(&mut self, src: &str) -> Result<Vec<String>> {
        let file = parse_definitions(src)?;
        self.load(file)
    }

    /// All or nothing: a failing declaration leaves the registry untouched.
    pub fn load(&mut self, file: DefinitionFile) -> Result<Vec<String>> {
        let mut staged = self.clone();
        let mut declared = Vec::with_capacity(file.types.len());
        for (name, declaration) in file.types {
            match declaration {
                Declaration::Data(spec) => {
                    let fields = staged.fields_from_json(&name, &spec)?;
                    staged.insert_type(make_data(name.clone(), fields)?)?;
                }
                Declaration::Union(spec) => {
                    let variants = staged.fields_from_json(&name, &spec)?;
                    staged.insert_union(make_union(name.clone(), variants)?)?;
                }
                Declaration::Refine(refinement) => {
                    let ty = staged.refine(&name, &refinement)?;
                    staged.insert_type(ty)?;
                }
            }
            declared.push(name);
        }
        *self = staged;
        Ok(declared)
    }

    /// A definition body must be a plain mapping of field specs.
    pub fn fields_from_json(&self, owner: &str, spec: &Value) -> Result<Fields> {
        let Value::Object(map) = spec else {
            return Err(AdtError::definition(owner, format!("expected a mapping of field specs, found {spec}")));
        };
        map.iter()
            .map(|(key, field)| {
                let nested = format!("{owner}.{key}");
                Ok((key.clone(), self.spec_from_json(&nested, field)?))
            })
            .collect()
    }

    /// A field spec is a registered type name or a nested mapping.
    pub fn spec_from_json(&self, owner: &str, spec: &Value) -> Result<FieldSpec> {
        match spec {
            Value::String(name) => self
                .ty(name)
                .cloned()
                .map(FieldSpec::Type)
                .ok_or_else(|| AdtError::definition(owner, format!("unknown type `{name}`"))),
            Value::Object(_) => Ok(FieldSpec::Record(self.fields_from_json(owner, spec)?)),
            other => Err(AdtError::definition(
                owner,
                format!("field spec must be a type name or a mapping, found {other}"),
            )),
        }
    }

    fn refine(&self, name: &str, refinement: &Refinement) -> Result<Type> {
        let base = self
            .ty(&refinement.base)
            .cloned()
            .ok_or_else(|| AdtError::definition(name, format!("unknown base type `{}`", refinement.base)))?;
        let pattern = refinement
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| AdtError::definition(name, format!("bad pattern: {e}")))?;
        let Refinement { minimum, maximum, .. } = *refinement;
        if let (Some(lo), Some(hi)) = (minimum, maximum) {
            if lo > hi {
                return Err(AdtError::definition(name, format!("minimum {lo} exceeds maximum {hi}")));
            }
        }

        let mut hint = emit_schema(&base);
        if let Value::Object(map) = &mut hint {
            map.insert("title".into(), Value::from(name));
            if let Some(rx) = &pattern {
                map.insert("pattern".into(), Value::from(rx.as_str()));
            }
            if let Some(lo) = minimum {
                map.insert("minimum".into(), Value::from(lo));
            }
            if let Some(hi) = maximum {
                map.insert("maximum".into(), Value::from(hi));
            }
        }

        let predicate = move |v: &Value| {
            base.is(v)
                && pattern.as_ref().is_none_or(|rx| v.as_str().is_some_and(|s| rx.is_match(s)))
                && minimum.is_none_or(|lo| v.as_f64().is_some_and(|x| x >= lo))
                && maximum.is_none_or(|hi| v.as_f64().is_some_and(|x| x <= hi))
        };
        Ok(Type::scalar(name, Arc::new(predicate), None, Some(hint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::union::Handlers;
    use serde_json::json;

    const SHAPES: &str = r#"{
        "types": {
            "Point": { "data": { "x": "Number", "y": "Number" } },
            "Line":  { "data": { "from": "Point", "to": "Point", "style": { "width": "Number" } } },
            "Slug":  { "refine": { "base": "String", "pattern": "^[a-z-]+$" } },
            "Percent": { "refine": { "base": "Number", "minimum": 0, "maximum": 100 } },
            "Shape": { "union": { "Dot": "Point", "Segment": "Line" } }
        }
    }"#;

    fn shapes() -> Registry {
        let mut reg = Registry::with_builtins();
        let names = reg.load_str(SHAPES).unwrap();
        assert_eq!(names, ["Point", "Line", "Slug", "Percent", "Shape"]);
        reg
    }

    #[test]
    fn builtins_are_seeded() {
        let reg = Registry::with_builtins();
        for name in ["String", "Number", "Boolean", "Array", "Object", "Any", "Nothing", "Success", "Error"] {
            assert!(matches!(reg.get(name), Some(Entry::Type(_))), "{name}");
        }
        assert!(reg.union("Maybe").is_some());
        assert!(reg.union("Result").is_some());
        assert!(reg.union("String").is_none());
        assert_eq!(reg.len(), 11);
    }

    #[test]
    fn loaded_records_validate() {
        let reg = shapes();
        let line = reg.ty("Line").unwrap();
        let inst = line
            .construct(json!({"from": {"x": 0, "y": 0}, "to": {"x": 1, "y": 1}, "style": {"width": 2}}))
            .unwrap();
        assert_eq!(inst["style"], json!({"width": 2}));

        let err = line
            .construct(json!({"from": {"x": 0, "y": 0}, "to": {"x": 1}, "style": {"width": 2}}))
            .unwrap_err();
        assert_eq!(err.path(), ["to".to_string()]);
    }

    #[test]
    fn loaded_unions_dispatch() {
        let reg = shapes();
        let shape = reg.union("Shape").unwrap();
        let handlers = Handlers::new().on("Dot", |_| "dot").on("Segment", |_| "segment");
        assert_eq!(shape.case(&json!({"x": 1, "y": 2}), &handlers).unwrap(), "dot");
        let seg = json!({"from": {"x": 0, "y": 0}, "to": {"x": 1, "y": 1}, "style": {"width": 1}});
        assert_eq!(shape.case(&seg, &handlers).unwrap(), "segment");
    }

    #[test]
    fn refinements_narrow_their_base() {
        let reg = shapes();
        let slug = reg.ty("Slug").unwrap();
        assert!(slug.is(&json!("hello-world")));
        assert!(!slug.is(&json!("Hello World")));
        assert!(!slug.is(&json!(3)));

        let pct = reg.ty("Percent").unwrap();
        assert!(pct.construct(42.5).is_ok());
        assert!(pct.construct(101).is_err());
        assert!(pct.construct("50").is_err());
    }

    #[test]
    fn unknown_names_are_definition_errors() {
        let mut reg = Registry::with_builtins();
        let err = reg.load_str(r#"{"types": {"Line": {"data": {"from": "Point"}}}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert!(err.to_string().contains("unknown type `Point`"), "{err}");
    }

    #[test]
    fn malformed_specs_are_definition_errors() {
        let mut reg = Registry::with_builtins();
        for src in [
            r#"{"types": {"P": {"data": ["x"]}}}"#,
            r#"{"types": {"P": {"data": {"x": 42}}}}"#,
            r#"{"types": {"P": {"union": {}}}}"#,
            r#"{"types": {"P": {"refine": {"base": "String", "pattern": "("}}}}"#,
            r#"{"types": {"P": {"refine": {"base": "Number", "minimum": 5, "maximum": 1}}}}"#,
        ] {
            let err = reg.load_str(src).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Definition, "{src}");
        }
    }

    #[test]
    fn parse_errors_report_json_path() {
        let err = parse_definitions(r#"{"types": {"P": {"record": {}}}}"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("types.P"), "{message}");
    }

    #[test]
    fn failed_load_registers_nothing() {
        let mut reg = Registry::with_builtins();
        let before = reg.len();
        let broken = r#"{"types": {"Point": {"data": {"x": "Number"}}, "Bad": {"data": {"p": "Nope"}}}}"#;
        assert!(reg.load_str(broken).is_err());
        assert_eq!(reg.len(), before);
        assert!(reg.get("Point").is_none());

        let fixed = r#"{"types": {"Point": {"data": {"x": "Number"}}, "Bad": {"data": {"p": "Point"}}}}"#;
        assert_eq!(reg.load_str(fixed).unwrap(), ["Point", "Bad"]);
        assert_eq!(reg.len(), before + 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = shapes();
        let err = reg.load_str(r#"{"types": {"Point": {"data": {}}}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        let err = reg.insert_type(builtins::STRING.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
    }
}
