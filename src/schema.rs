//! JSON-Schema-ish view of a descriptor.
//!
//! Built-ins and refinements carry their own fragment; records, variants and
//! unions are assembled structurally. Custom predicates are opaque, so a
//! `make_type` descriptor without a fragment renders as `{ "title": name }`.
use serde_json::{Map, Value, json};

use crate::ty::{Kind, Type};

pub fn emit_schema(ty: &Type) -> Value {
    match ty.kind() {
        Kind::Scalar { hint, .. } => hint.clone().unwrap_or_else(|| json!({ "title": ty.name() })),

        Kind::Data { fields } => {
            let props: Map<String, Value> =
                fields.iter().map(|(k, t)| (k.clone(), emit_schema(t))).collect();
            let required: Vec<Value> = fields.keys().cloned().map(Value::from).collect();
            let mut o = json!({ "title": ty.name(), "type": "object", "properties": props });
            if !required.is_empty() {
                o["required"] = Value::Array(required);
            }
            o
        }

        // the variant name wins over whatever title the payload carries
        Kind::Variant { payload } => {
            let mut o = emit_schema(payload);
            if let Value::Object(map) = &mut o {
                map.insert("title".into(), Value::from(ty.name()));
            }
            o
        }

        Kind::Sum { variants } => json!({
            "title": ty.name(),
            "oneOf": variants.values().map(emit_schema).collect::<Vec<_>>(),
        }),
    }
}
