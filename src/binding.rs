//! Resolved intermediate representation: services, methods, and their
//! HTTP route bindings.
//!
//! Values here are created by the binding synthesizer and never mutated
//! afterwards; downstream emitters rely on the ordering being identical
//! across repeated runs over the same input.

use std::collections::HashSet;
use std::fmt;

use crate::descriptor::{qualify, Field, Message};
use crate::template::CompiledTemplate;

/// A service with all of its methods resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Name of the owning file.
    pub file: String,
    pub package: String,
    pub name: String,
    /// Standalone mode: generated identifiers carry the package prefix.
    pub force_prefixed_name: bool,
    pub methods: Vec<Method>,
}

impl Service {
    /// Fully-qualified service name.
    pub fn fqsn(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// One resolved remote procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// FQSN of the owning service.
    pub service: String,
    pub name: String,
    /// FQMN of the request message type.
    pub request_type: String,
    /// FQMN of the response message type.
    pub response_type: String,
    /// Snapshot of the request message definition.
    pub request: Message,
    /// Snapshot of the response message definition.
    pub response: Message,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub role: Option<Role>,
    pub bindings: Vec<Binding>,
}

impl Method {
    /// Fully-qualified method name.
    pub fn fqmn(&self) -> String {
        format!("{}.{}", self.service, self.name)
    }

    /// Whether the primary binding might need query parameters. Only
    /// top-level field names are subtracted, so this can report true for
    /// bindings that end up needing none; callers emit a dead branch
    /// rather than risk dropping a parameter.
    pub fn has_query_params(&self) -> bool {
        !self.query_params().is_empty()
    }

    /// Query parameter names for the primary binding, in field
    /// declaration order.
    pub fn query_params(&self) -> Vec<String> {
        self.bindings
            .first()
            .map(|b| b.query_params(&self.request))
            .unwrap_or_default()
    }
}

/// One HTTP route for a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Position within the owning method's binding list.
    pub index: usize,
    pub verb: String,
    pub template: CompiledTemplate,
    pub path_params: Vec<Parameter>,
    pub body: Option<Body>,
    pub response_body: Option<Body>,
}

impl Binding {
    /// Request fields sent in the query string: the request message's
    /// direct fields minus the body field (if a concrete path) and minus
    /// every path parameter, in declaration order. A whole-message body
    /// consumes every field.
    pub fn query_params(&self, request: &Message) -> Vec<String> {
        if let Some(body) = &self.body {
            if body.field_path.is_empty() {
                return Vec::new();
            }
        }
        let mut taken: HashSet<String> = HashSet::new();
        if let Some(body) = &self.body {
            taken.insert(body.field_path.to_string());
        }
        for param in &self.path_params {
            taken.insert(param.field_path.to_string());
        }
        request
            .fields
            .iter()
            .filter(|f| !taken.contains(f.name.as_str()))
            .map(|f| f.name.clone())
            .collect()
    }
}

/// One path parameter: the resolved field chain and its terminal field.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub field_path: FieldPath,
    pub target: Field,
}

/// Request or response payload extraction rule. An empty field path
/// selects the whole message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub field_path: FieldPath,
}

/// Ordered chain of resolved fields for a dotted path expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPath(pub Vec<FieldPathComponent>);

impl FieldPath {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[FieldPathComponent] {
        &self.0
    }

    /// The terminal field of the chain, if any.
    pub fn target(&self) -> Option<&Field> {
        self.0.last().map(|c| &c.target)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&c.name)?;
        }
        Ok(())
    }
}

/// One component of a resolved field path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPathComponent {
    pub name: String,
    pub target: Field,
}

/// Validated authorization tag on a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub resource: String,
    pub verb: String,
    pub scopes: Vec<String>,
}
