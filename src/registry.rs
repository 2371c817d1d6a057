//! Process-wide symbol registry for one compilation run.
//!
//! The registry is populated during the load phase (`add_file`,
//! `register_external_rule`, flag setters) and is read-only for the rest
//! of the run: the resolution entry points take `&Registry`, so no write
//! can happen once resolution starts.

use std::collections::{HashMap, HashSet};

use crate::descriptor::{qualify, File, Message, MethodDesc};
use crate::error::Error;
use crate::options::HttpRule;

/// A message together with its owning file, as returned by lookups.
/// The file gives the package context for resolving further type names
/// found inside the message.
#[derive(Debug, Clone, Copy)]
pub struct MessageRef<'a> {
    pub file: &'a File,
    pub message: &'a Message,
}

impl MessageRef<'_> {
    /// Fully-qualified message name.
    pub fn fqmn(&self) -> String {
        qualify(&self.file.package, &self.message.name)
    }
}

/// Symbol table over every loaded file, message, service, and method.
#[derive(Debug, Default)]
pub struct Registry {
    files: Vec<File>,
    /// message FQMN -> (file index, message index)
    msgs: HashMap<String, (usize, usize)>,
    /// service FQSN -> (file index, service index)
    svcs: HashMap<String, (usize, usize)>,
    /// method FQMN -> (file index, service index, method index)
    meths: HashMap<String, (usize, usize, usize)>,
    /// Externally supplied rules keyed by method FQMN, consulted before
    /// a method's inline rule.
    external_rules: HashMap<String, Vec<HttpRule>>,
    allow_delete_body: bool,
    generate_unbound_methods: bool,
    warn_on_unbound_methods: bool,
    standalone: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one file descriptor. Rejects duplicate file names, duplicate
    /// fully-qualified symbols, duplicate field names within a message,
    /// and unnamed services.
    pub fn add_file(&mut self, file: File) -> Result<(), Error> {
        if self.files.iter().any(|f| f.name == file.name) {
            return Err(Error::DuplicateFile { name: file.name });
        }
        let file_idx = self.files.len();

        for (mi, msg) in file.messages.iter().enumerate() {
            let mut seen = HashSet::new();
            for f in &msg.fields {
                if !seen.insert(f.name.as_str()) {
                    return Err(Error::DuplicateField {
                        field: f.name.clone(),
                        message: msg.name.clone(),
                    });
                }
            }
            let fqmn = qualify(&file.package, &msg.name);
            if self.msgs.insert(fqmn.clone(), (file_idx, mi)).is_some() {
                return Err(Error::DuplicateSymbol { name: fqmn });
            }
        }

        for (si, svc) in file.services.iter().enumerate() {
            if svc.name.is_empty() {
                return Err(Error::InvalidDescriptor {
                    reason: format!("unnamed service in {}", file.name),
                });
            }
            let fqsn = qualify(&file.package, &svc.name);
            if self.svcs.insert(fqsn.clone(), (file_idx, si)).is_some() {
                return Err(Error::DuplicateSymbol { name: fqsn.clone() });
            }
            for (mi, md) in svc.methods.iter().enumerate() {
                let fqmn = format!("{}.{}", fqsn, md.name);
                if self.meths.insert(fqmn.clone(), (file_idx, si, mi)).is_some() {
                    return Err(Error::DuplicateSymbol { name: fqmn });
                }
            }
        }

        self.files.push(file);
        Ok(())
    }

    /// Loaded files, in load order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    fn msg_ref(&self, fqmn: &str) -> Option<MessageRef<'_>> {
        self.msgs.get(fqmn).map(|&(fi, mi)| MessageRef {
            file: &self.files[fi],
            message: &self.files[fi].messages[mi],
        })
    }

    /// Resolve `name` to a message, relative to the dotted context
    /// `location` (a package or message FQMN). A leading dot marks `name`
    /// as fully qualified; otherwise ever-shorter prefixes of `location`
    /// are tried, innermost first, ending with the bare name.
    pub fn lookup_msg(&self, location: &str, name: &str) -> Result<MessageRef<'_>, Error> {
        if let Some(fq) = name.strip_prefix('.') {
            return self.msg_ref(fq).ok_or_else(|| Error::UnresolvedType {
                name: name.to_string(),
            });
        }
        let mut components: Vec<&str> = location.split('.').filter(|c| !c.is_empty()).collect();
        loop {
            let fqmn = if components.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", components.join("."), name)
            };
            if let Some(m) = self.msg_ref(&fqmn) {
                return Ok(m);
            }
            if components.pop().is_none() {
                return Err(Error::UnresolvedType {
                    name: name.to_string(),
                });
            }
        }
    }

    /// Look up a method declaration by fully-qualified method name.
    pub fn lookup_method(&self, fqmn: &str) -> Result<&MethodDesc, Error> {
        self.meths
            .get(fqmn)
            .map(|&(fi, si, mi)| &self.files[fi].services[si].methods[mi])
            .ok_or_else(|| Error::UnresolvedType {
                name: fqmn.to_string(),
            })
    }

    /// Register an externally supplied HTTP rule for the method named by
    /// `fqmn`. External rules are consumed before the method's inline
    /// rule, in registration order.
    pub fn register_external_rule(&mut self, fqmn: impl Into<String>, rule: HttpRule) {
        self.external_rules.entry(fqmn.into()).or_default().push(rule);
    }

    /// External rules registered for a method, if any.
    pub fn external_rules(&self, fqmn: &str) -> &[HttpRule] {
        self.external_rules
            .get(fqmn)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Permit DELETE bindings to carry a request body.
    pub fn set_allow_delete_body(&mut self, allow: bool) {
        self.allow_delete_body = allow;
    }

    pub fn allow_delete_body(&self) -> bool {
        self.allow_delete_body
    }

    /// Synthesize a default POST binding for methods without any rule.
    pub fn set_generate_unbound_methods(&mut self, generate: bool) {
        self.generate_unbound_methods = generate;
    }

    pub fn generate_unbound_methods(&self) -> bool {
        self.generate_unbound_methods
    }

    /// Log unbound methods at warning level instead of debug.
    pub fn set_warn_on_unbound_methods(&mut self, warn: bool) {
        self.warn_on_unbound_methods = warn;
    }

    pub fn warn_on_unbound_methods(&self) -> bool {
        self.warn_on_unbound_methods
    }

    /// Standalone mode: generated service identifiers carry the package
    /// prefix. Recorded on each resolved service for the emitters.
    pub fn set_standalone(&mut self, standalone: bool) {
        self.standalone = standalone;
    }

    pub fn standalone(&self) -> bool {
        self.standalone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Field, FieldKind};

    fn msg(name: &str) -> Message {
        Message {
            name: name.to_string(),
            fields: vec![Field {
                name: "id".to_string(),
                kind: FieldKind::Scalar,
                optional: false,
            }],
        }
    }

    fn file(name: &str, package: &str, messages: Vec<Message>) -> File {
        File {
            name: name.to_string(),
            package: package.to_string(),
            messages,
            services: Vec::new(),
        }
    }

    #[test]
    fn lookup_fully_qualified() {
        let mut r = Registry::new();
        r.add_file(file("a.def", "pkg.v1", vec![msg("Book")])).expect("load");
        let m = r.lookup_msg("", ".pkg.v1.Book").expect("lookup");
        assert_eq!(m.fqmn(), "pkg.v1.Book");
    }

    #[test]
    fn lookup_walks_context_prefixes() {
        let mut r = Registry::new();
        r.add_file(file("a.def", "pkg.v1", vec![msg("Book")])).expect("load");
        // Innermost prefix first: pkg.v1.Book resolves from a sibling context.
        let m = r.lookup_msg("pkg.v1.Shelf", "Book").expect("lookup");
        assert_eq!(m.fqmn(), "pkg.v1.Book");
        // Bare name resolves for unpackaged files.
        let mut r2 = Registry::new();
        r2.add_file(file("b.def", "", vec![msg("Loose")])).expect("load");
        assert!(r2.lookup_msg("pkg", "Loose").is_ok());
    }

    #[test]
    fn lookup_missing_type_fails() {
        let r = Registry::new();
        let err = r.lookup_msg("pkg", "Nope").expect_err("must fail");
        assert!(matches!(err, Error::UnresolvedType { .. }));
    }

    #[test]
    fn duplicate_file_and_symbol_rejected() {
        let mut r = Registry::new();
        r.add_file(file("a.def", "pkg", vec![msg("Book")])).expect("load");
        let err = r.add_file(file("a.def", "pkg", vec![])).expect_err("dup file");
        assert!(matches!(err, Error::DuplicateFile { .. }));
        let err = r.add_file(file("b.def", "pkg", vec![msg("Book")])).expect_err("dup symbol");
        assert!(matches!(err, Error::DuplicateSymbol { .. }));
    }

    #[test]
    fn duplicate_field_rejected() {
        let mut r = Registry::new();
        let mut m = msg("Book");
        m.fields.push(m.fields[0].clone());
        let err = r.add_file(file("a.def", "pkg", vec![m])).expect_err("dup field");
        assert!(matches!(err, Error::DuplicateField { .. }));
    }
}
