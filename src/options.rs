//! HTTP rule and role option schemas, as attached to method declarations
//! by the loader.

/// Options attached to a method declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodOptions {
    pub http: Option<HttpRule>,
    pub role: Option<RoleOptions>,
}

/// REST mapping for one method: a single verb/path pattern, body and
/// response-body extraction rules, and alternate routes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRule {
    pub pattern: Option<Pattern>,
    /// `""` = no request body, `"*"` = whole request message, otherwise a
    /// dotted field path into the request type.
    pub body: String,
    /// `""` or `"*"` = whole response, otherwise a dotted field path into
    /// the response type.
    pub response_body: String,
    /// Alternate routes for the same method. Entries may not declare
    /// further alternates of their own.
    pub additional_bindings: Vec<HttpRule>,
}

/// Verb and path template selection: exactly one variant per rule, so
/// rule handling is a single exhaustive match.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Get(String),
    Put(String),
    Post(String),
    Delete(String),
    Patch(String),
    /// Custom verb kind with an explicit path template.
    Custom { kind: String, path: String },
}

/// Authorization metadata as written in method options, before
/// kebab-case validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleOptions {
    pub resource: String,
    pub verb: String,
    pub scopes: Vec<String>,
}
