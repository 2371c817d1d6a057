//! Load-time descriptors: the static, reflection-free structural
//! definition of files, messages, fields, services, and methods, as
//! produced by an external interface-definition loader.
//!
//! These types are inputs to resolution and are never mutated by it; the
//! resolved counterparts live in [`crate::binding`].

use crate::options::MethodOptions;

/// One compiled source file: package name plus its ordered messages and
/// service declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    /// File name, unique within a compilation run.
    pub name: String,
    /// Dotted package name; may be empty.
    pub package: String,
    pub messages: Vec<Message>,
    pub services: Vec<ServiceDesc>,
}

/// A structured type with ordered, uniquely named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Message {
    /// Look up a direct field by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One message field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Explicitly marked optional; such fields cannot serve as path parameters.
    pub optional: bool,
}

impl Field {
    /// Whether the field is message- or group-typed.
    pub fn is_aggregate(&self) -> bool {
        self.type_name().is_some()
    }

    /// The referenced type name for aggregate fields.
    pub fn type_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Scalar => None,
            FieldKind::Message(name) | FieldKind::Group(name) => Some(name),
        }
    }
}

/// Field type classification. Aggregate kinds carry the (possibly
/// partially qualified) name of the referenced type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar,
    Message(String),
    /// Legacy aggregate kind, treated like a message for traversal.
    Group(String),
}

/// A remote-procedure interface declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceDesc {
    pub name: String,
    pub methods: Vec<MethodDesc>,
}

/// One remote procedure declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDesc {
    pub name: String,
    /// Request message type name, resolvable through the registry.
    pub input_type: String,
    /// Response message type name, resolvable through the registry.
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub options: MethodOptions,
}

/// Message types treated as scalars for path-parameter purposes.
const WELL_KNOWN_TYPES: &[&str] = &[
    "google.protobuf.Timestamp",
    "google.protobuf.Duration",
    "google.protobuf.StringValue",
    "google.protobuf.BytesValue",
    "google.protobuf.Int32Value",
    "google.protobuf.UInt32Value",
    "google.protobuf.Int64Value",
    "google.protobuf.UInt64Value",
    "google.protobuf.FloatValue",
    "google.protobuf.DoubleValue",
    "google.protobuf.BoolValue",
    "google.protobuf.FieldMask",
];

/// Whether `name` (leading dot tolerated) is a well-known wrapper type.
pub fn is_well_known_type(name: &str) -> bool {
    let name = name.strip_prefix('.').unwrap_or(name);
    WELL_KNOWN_TYPES.contains(&name)
}

/// Join a package and a local name into a fully-qualified dotted name.
pub(crate) fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
