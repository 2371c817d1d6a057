//! Errors raised while loading descriptors or resolving bindings.
//!
//! Resolution is a single-pass batch computation: every error aborts the
//! current compilation run with no partial output. Each variant carries
//! the owning method, template, or field path needed to locate the fault
//! in the source annotations.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid path template {template:?}: {reason}")]
    TemplateSyntax { template: String, reason: String },

    #[error("message type {name:?} not found")]
    UnresolvedType { name: String },

    #[error("not an aggregate type: {field} in {path}")]
    InvalidTraversal { field: String, path: String },

    #[error("no field {path:?} found in {message}")]
    UnknownField { path: String, message: String },

    #[error("must not set request body when http method is GET: {method}")]
    GetWithBody { method: String },

    #[error("must not set request body when http method is DELETE unless delete bodies are allowed: {method}")]
    DeleteWithBody { method: String },

    #[error("cannot use path parameters with client streaming: {method}")]
    StreamingPathCapture { method: String },

    #[error("optional field not allowed in field path: {field} in {path}")]
    OptionalPathParam { field: String, path: String },

    #[error("{method}: {path} is a message type; message types cannot be used as path parameters, use a well-known wrapper or a scalar instead")]
    AggregatePathParam { method: String, path: String },

    #[error("additional bindings must not nest further additional bindings: {method}")]
    NestedAdditionalBindings { method: String },

    #[error("duplicate route {verb} {template}: bound by both {first} and {second}")]
    DuplicateRoute {
        verb: String,
        template: String,
        first: String,
        second: String,
    },

    #[error("invalid role in method {method}: field {field:?} with value {value:?} is not in kebab-case format")]
    RoleFormat {
        method: String,
        field: String,
        value: String,
    },

    #[error("duplicate file {name:?} loaded")]
    DuplicateFile { name: String },

    #[error("duplicate symbol {name:?}")]
    DuplicateSymbol { name: String },

    #[error("duplicate field {field:?} in message {message}")]
    DuplicateField { field: String, message: String },

    #[error("invalid descriptor: {reason}")]
    InvalidDescriptor { reason: String },
}
