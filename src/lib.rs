//! Runtime product and sum types over JSON values.
//!
//! ```text
//! predicate ──▶ ty (make_type) ──▶ data (make_data) ──▶ union (make_union) ──▶ adts (Maybe, Result)
//!                  │                                         │
//!                  └──────────── instance (tagged values) ◀──┘
//! ```
//!
//! Every descriptor validates at construction time and tags what it builds:
//!
//! ```
//! use json_adt::{Handlers, Primitive, adts, fields, make_data};
//! use serde_json::json;
//!
//! let point = make_data("Point", fields! { "x": Primitive::Number, "y": Primitive::Number })?;
//! let p = point.construct(json!({ "x": 1, "y": 2, "z": 3 }))?;
//! assert_eq!(p, json!({ "x": 1, "y": 2 }));
//!
//! let label = adts::MAYBE.case(
//!     &adts::just("hi")?,
//!     &Handlers::new().on("Just", |v| v.to_string()).on("Nothing", |_| "none".to_string()),
//! )?;
//! assert_eq!(label, "\"hi\"");
//! # Ok::<(), json_adt::AdtError>(())
//! ```
pub mod adts;
pub mod builtins;
pub mod data;
pub mod error;
pub mod instance;
pub mod predicate;
pub mod registry;
pub mod schema;
pub mod trace;
pub mod ty;
pub mod union;

pub use builtins::Primitive;
pub use data::{FieldSpec, Fields, make_data};
pub use error::{AdtError, ErrorKind};
pub use instance::{Inspect, Instance};
pub use registry::Registry;
pub use ty::{Type, make_type, make_type_with};
pub use union::{Handlers, Union, make_union};
