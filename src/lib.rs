//! # restbind: REST binding resolution for RPC service definitions
//!
//! The semantic core of an interface-definition compiler plugin: given a
//! set of cross-referencing service definitions annotated with REST-style
//! binding metadata, resolve every remote method into zero or more fully
//! type-checked HTTP route bindings: verb, path template, ordered
//! path/query parameters, and body/response-body extraction rules.
//!
//! ## Pipeline
//!
//! - **Registry** ([`registry`]): load every file descriptor once,
//!   register external rule overrides, set config flags; read-only during
//!   resolution
//! - **Template compiler** ([`template`]): PEST grammar for URL path
//!   templates with literals, `*`/`**` wildcards, and
//!   `{field.path=pattern}` captures
//! - **Field path resolver** ([`resolve::resolve_field_path`]): walks
//!   dotted paths through nested message types, across files
//! - **Binding synthesizer** ([`resolve::resolve_services`]): merges
//!   external, inline, and default rules into ordered [`Binding`] records
//!   with protocol-level validation and duplicate-route detection
//!
//! ## Usage
//!
//! ```
//! use restbind::descriptor::{Field, FieldKind, File, Message, MethodDesc, ServiceDesc};
//! use restbind::options::{HttpRule, MethodOptions, Pattern};
//! use restbind::{resolve_services, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_file(File {
//!         name: "library.def".into(),
//!         package: "library.v1".into(),
//!         messages: vec![
//!             Message {
//!                 name: "GetBookRequest".into(),
//!                 fields: vec![Field {
//!                     name: "book_id".into(),
//!                     kind: FieldKind::Scalar,
//!                     optional: false,
//!                 }],
//!             },
//!             Message { name: "Book".into(), fields: vec![] },
//!         ],
//!         services: vec![ServiceDesc {
//!             name: "Library".into(),
//!             methods: vec![MethodDesc {
//!                 name: "GetBook".into(),
//!                 input_type: "GetBookRequest".into(),
//!                 output_type: "Book".into(),
//!                 client_streaming: false,
//!                 server_streaming: false,
//!                 options: MethodOptions {
//!                     http: Some(HttpRule {
//!                         pattern: Some(Pattern::Get("/v1/books/{book_id}".into())),
//!                         ..HttpRule::default()
//!                     }),
//!                     role: None,
//!                 },
//!             }],
//!         }],
//!     })
//!     .unwrap();
//!
//! let services = resolve_services(&registry).unwrap();
//! let binding = &services[0].methods[0].bindings[0];
//! assert_eq!(binding.verb, "GET");
//! assert_eq!(binding.template.template, "/v1/books/{book_id}");
//! assert_eq!(binding.path_params[0].field_path.to_string(), "book_id");
//! ```

pub mod binding;
pub mod descriptor;
pub mod error;
pub mod inflect;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod template;

pub use binding::{Binding, Body, FieldPath, Method, Parameter, Role, Service};
pub use error::Error;
pub use inflect::singularize;
pub use registry::{MessageRef, Registry};
pub use resolve::{resolve_field_path, resolve_services};
pub use template::{CompiledTemplate, PathTemplate, Segment};
