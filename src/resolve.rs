//! Binding synthesis: walk every service of every loaded file, merge the
//! HTTP rule sources for each method (external overrides, the inline
//! rule, or a synthesized default), compile path templates, resolve
//! captured field paths, and produce the resolved IR.
//!
//! Files are visited in load order; services, methods, rule sets, and
//! additional bindings in declaration order. Repeated runs over the same
//! registry produce identical output.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::binding::{
    Binding, Body, FieldPath, FieldPathComponent, Method, Parameter, Role, Service,
};
use crate::descriptor::{is_well_known_type, qualify, File, MethodDesc, ServiceDesc};
use crate::error::Error;
use crate::options::{HttpRule, Pattern};
use crate::registry::{MessageRef, Registry};
use crate::template;

static KEBAB_CASE: OnceLock<Regex> = OnceLock::new();

fn kebab_case() -> &'static Regex {
    KEBAB_CASE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap())
}

/// Resolve every service of every loaded file into bindings.
pub fn resolve_services(registry: &Registry) -> Result<Vec<Service>, Error> {
    let mut routes = RouteSet::default();
    let mut services = Vec::new();
    for file in registry.files() {
        debug!("resolving services of {}", file.name);
        for sd in &file.services {
            if sd.methods.is_empty() {
                continue;
            }
            services.push(resolve_service(registry, file, sd, &mut routes)?);
        }
    }
    Ok(services)
}

/// Routes already accepted, keyed by owning service. This is the single
/// shared view that duplicate detection serializes on; everything else
/// in the pass is per-method.
#[derive(Default)]
struct RouteSet {
    /// service FQSN -> (verb, canonical template) -> first method FQMN
    routes: HashMap<String, HashMap<(String, String), String>>,
}

impl RouteSet {
    fn insert(&mut self, fqsn: &str, verb: &str, template: &str, fqmn: &str) -> Result<(), Error> {
        let per_service = self.routes.entry(fqsn.to_string()).or_default();
        let key = (verb.to_string(), template.to_string());
        if let Some(first) = per_service.get(&key) {
            return Err(Error::DuplicateRoute {
                verb: verb.to_string(),
                template: template.to_string(),
                first: first.clone(),
                second: fqmn.to_string(),
            });
        }
        per_service.insert(key, fqmn.to_string());
        Ok(())
    }
}

fn resolve_service(
    registry: &Registry,
    file: &File,
    sd: &ServiceDesc,
    routes: &mut RouteSet,
) -> Result<Service, Error> {
    let fqsn = qualify(&file.package, &sd.name);
    debug!("registering {}", fqsn);
    let mut methods = Vec::new();
    for md in &sd.methods {
        debug!("processing {}.{}", fqsn, md.name);
        let fqmn = format!("{}.{}", fqsn, md.name);
        let role = extract_role(md, &fqmn)?;

        let mut rules: Vec<HttpRule> = registry.external_rules(&fqmn).to_vec();
        if let Some(rule) = &md.options.http {
            rules.push(rule.clone());
        }
        if rules.is_empty() {
            if registry.generate_unbound_methods() {
                rules.push(default_http_rule(&fqsn, &md.name));
            } else if registry.warn_on_unbound_methods() {
                warn!("no http rule found for method {}", fqmn);
            } else {
                debug!("no http rule found for method {}", fqmn);
            }
        }

        methods.push(resolve_method(registry, file, &fqsn, md, &rules, role, routes)?);
    }
    Ok(Service {
        file: file.name.clone(),
        package: file.package.clone(),
        name: sd.name.clone(),
        force_prefixed_name: registry.standalone(),
        methods,
    })
}

/// Default rule mirroring the wire convention for unannotated methods:
/// POST to `/<service-fqsn>/<method>` with the whole request as the body.
fn default_http_rule(fqsn: &str, method: &str) -> HttpRule {
    HttpRule {
        pattern: Some(Pattern::Post(format!("/{}/{}", fqsn, method))),
        body: "*".to_string(),
        ..HttpRule::default()
    }
}

/// Per-method state shared by the binding constructors.
struct MethodContext<'r> {
    registry: &'r Registry,
    service: &'r str,
    fqmn: String,
    request: MessageRef<'r>,
    response: MessageRef<'r>,
    client_streaming: bool,
}

fn resolve_method(
    registry: &Registry,
    file: &File,
    fqsn: &str,
    md: &MethodDesc,
    rules: &[HttpRule],
    role: Option<Role>,
    routes: &mut RouteSet,
) -> Result<Method, Error> {
    let request = registry.lookup_msg(&file.package, &md.input_type)?;
    let response = registry.lookup_msg(&file.package, &md.output_type)?;
    let ctx = MethodContext {
        registry,
        service: fqsn,
        fqmn: format!("{}.{}", fqsn, md.name),
        request,
        response,
        client_streaming: md.client_streaming,
    };

    let mut bindings = Vec::new();
    for rule in rules {
        if let Some(b) = new_binding(&ctx, rule, bindings.len(), routes)? {
            bindings.push(b);
        }
        for additional in &rule.additional_bindings {
            if !additional.additional_bindings.is_empty() {
                return Err(Error::NestedAdditionalBindings {
                    method: ctx.fqmn.clone(),
                });
            }
            if let Some(b) = new_binding(&ctx, additional, bindings.len(), routes)? {
                bindings.push(b);
            }
        }
    }

    Ok(Method {
        service: fqsn.to_string(),
        name: md.name.clone(),
        request_type: request.fqmn(),
        response_type: response.fqmn(),
        request: request.message.clone(),
        response: response.message.clone(),
        client_streaming: md.client_streaming,
        server_streaming: md.server_streaming,
        role,
        bindings,
    })
}

/// Build one binding from one rule. A rule without a pattern yields no
/// binding rather than a partial one.
fn new_binding(
    ctx: &MethodContext<'_>,
    rule: &HttpRule,
    index: usize,
    routes: &mut RouteSet,
) -> Result<Option<Binding>, Error> {
    let (verb, path) = match &rule.pattern {
        None => {
            debug!("no pattern specified in http rule for {}", ctx.fqmn);
            return Ok(None);
        }
        Some(Pattern::Get(path)) => {
            if !rule.body.is_empty() {
                return Err(Error::GetWithBody {
                    method: ctx.fqmn.clone(),
                });
            }
            ("GET".to_string(), path)
        }
        Some(Pattern::Put(path)) => ("PUT".to_string(), path),
        Some(Pattern::Post(path)) => ("POST".to_string(), path),
        Some(Pattern::Delete(path)) => {
            if !rule.body.is_empty() && !ctx.registry.allow_delete_body() {
                return Err(Error::DeleteWithBody {
                    method: ctx.fqmn.clone(),
                });
            }
            ("DELETE".to_string(), path)
        }
        Some(Pattern::Patch(path)) => ("PATCH".to_string(), path),
        Some(Pattern::Custom { kind, path }) => (kind.clone(), path),
    };

    let template = template::parse(path)?.compile();

    // A streaming request is written to the connection as one payload and
    // cannot also be split across URL captures.
    if ctx.client_streaming && !template.fields.is_empty() {
        return Err(Error::StreamingPathCapture {
            method: ctx.fqmn.clone(),
        });
    }

    let mut path_params = Vec::new();
    for field in &template.fields {
        path_params.push(new_param(ctx, field)?);
    }

    let body = new_body(ctx, &rule.body)?;
    let response_body = new_response_body(ctx, &rule.response_body)?;

    routes.insert(ctx.service, &verb, &template.template, &ctx.fqmn)?;

    Ok(Some(Binding {
        index,
        verb,
        template,
        path_params,
        body,
        response_body,
    }))
}

/// Resolve one captured field path into a path parameter. The terminal
/// field must fit in a URL segment: non-optional, and if message-typed,
/// one of the well-known wrapper types.
fn new_param(ctx: &MethodContext<'_>, path: &str) -> Result<Parameter, Error> {
    let components = resolve_field_path(ctx.registry, ctx.request, path, true)?;
    let target = match components.last() {
        Some(c) => c.target.clone(),
        None => {
            return Err(Error::UnknownField {
                path: path.to_string(),
                message: ctx.request.message.name.clone(),
            })
        }
    };
    if target.is_aggregate() {
        let type_name = target.type_name().unwrap_or_default();
        if is_well_known_type(type_name) {
            debug!("well known aggregate type {} as path parameter", type_name);
        } else {
            return Err(Error::AggregatePathParam {
                method: ctx.fqmn.clone(),
                path: path.to_string(),
            });
        }
    }
    Ok(Parameter {
        field_path: FieldPath(components),
        target,
    })
}

/// Body extraction rule: `""` = no body, `"*"` = whole request message,
/// otherwise a dotted path into the request type.
fn new_body(ctx: &MethodContext<'_>, path: &str) -> Result<Option<Body>, Error> {
    match path {
        "" => Ok(None),
        "*" => Ok(Some(Body {
            field_path: FieldPath::default(),
        })),
        _ => {
            let components = resolve_field_path(ctx.registry, ctx.request, path, false)?;
            Ok(Some(Body {
                field_path: FieldPath(components),
            }))
        }
    }
}

/// Response body rule: `""` and `"*"` both select the whole response.
fn new_response_body(ctx: &MethodContext<'_>, path: &str) -> Result<Option<Body>, Error> {
    match path {
        "" | "*" => Ok(None),
        _ => {
            let components = resolve_field_path(ctx.registry, ctx.response, path, false)?;
            Ok(Some(Body {
                field_path: FieldPath(components),
            }))
        }
    }
}

/// Resolve a dotted field path starting at `root`, crossing message and
/// file boundaries through the registry. `path_param` applies the
/// stricter path-parameter rules: optional fields are rejected. An empty
/// path resolves to the empty chain (whole-message semantics).
pub fn resolve_field_path<'r>(
    registry: &'r Registry,
    root: MessageRef<'r>,
    path: &str,
    path_param: bool,
) -> Result<Vec<FieldPathComponent>, Error> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let mut msg = root;
    let mut components: Vec<FieldPathComponent> = Vec::new();
    for (i, name) in path.split('.').enumerate() {
        if i > 0 {
            let prev = &components[i - 1].target;
            match prev.type_name() {
                Some(type_name) => {
                    msg = registry.lookup_msg(&msg.fqmn(), type_name)?;
                }
                None => {
                    return Err(Error::InvalidTraversal {
                        field: prev.name.clone(),
                        path: path.to_string(),
                    });
                }
            }
        }
        debug!("looking up {} in {}", name, msg.fqmn());
        let field = msg.message.field(name).ok_or_else(|| Error::UnknownField {
            path: path.to_string(),
            message: root.message.name.clone(),
        })?;
        if path_param && field.optional {
            return Err(Error::OptionalPathParam {
                field: field.name.clone(),
                path: path.to_string(),
            });
        }
        components.push(FieldPathComponent {
            name: name.to_string(),
            target: field.clone(),
        });
    }
    Ok(components)
}

/// Extract and validate the role annotation of a method, if present.
/// Absence is not an error; the first kebab-case violation is.
fn extract_role(md: &MethodDesc, fqmn: &str) -> Result<Option<Role>, Error> {
    let opts = match &md.options.role {
        Some(opts) => opts,
        None => return Ok(None),
    };
    validate_kebab_case("resource", &opts.resource, fqmn)?;
    validate_kebab_case("verb", &opts.verb, fqmn)?;
    for (i, scope) in opts.scopes.iter().enumerate() {
        validate_kebab_case(&format!("scope[{}]", i), scope, fqmn)?;
    }
    Ok(Some(Role {
        resource: opts.resource.clone(),
        verb: opts.verb.clone(),
        scopes: opts.scopes.clone(),
    }))
}

fn validate_kebab_case(field: &str, value: &str, method: &str) -> Result<(), Error> {
    // Empty values are allowed and skip validation.
    if value.is_empty() {
        return Ok(());
    }
    if !kebab_case().is_match(value) {
        return Err(Error::RoleFormat {
            method: method.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
