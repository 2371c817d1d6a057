//! Parse URL path templates into a segment AST and compile them into the
//! ordered list of captured field paths plus a canonical rendering.
//!
//! The grammar (see `grammar.pest`) covers literal segments, `*` and `**`
//! wildcards, `{field.path=pattern}` captures, and an optional trailing
//! `:verb`. Grammar-level validation (unbalanced braces, empty field
//! paths, duplicate captures, a misplaced `**`) happens at parse time,
//! so `compile` cannot fail.

use pest::Parser;
use pest_derive::Parser as PestParser;

use crate::error::Error;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct TemplateParser;

/// One element of a parsed path template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Matches exactly this token.
    Literal(String),
    /// `*`: matches exactly one path segment, uncaptured.
    Wildcard,
    /// `**`: matches the remaining path segments, uncaptured; permitted
    /// only as the final pattern element.
    DeepWildcard,
    /// `{field.path=pattern}`: matches `pattern` (default `*`) and binds
    /// the matched value to a field of the request message. The nested
    /// pattern contains no further captures.
    Capture {
        path: Vec<String>,
        pattern: Vec<Segment>,
    },
}

/// Parsed path template: ordered segments plus an optional trailing verb.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTemplate {
    pub segments: Vec<Segment>,
    pub verb: Option<String>,
}

/// Compiled template: captured field paths in declaration order and the
/// canonical rendering used as the duplicate-route key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    /// Dotted field paths of the capture groups, in declaration order.
    pub fields: Vec<String>,
    /// Canonical rendering; captures with the default `*` pattern render
    /// bare, so plain templates round-trip byte-for-byte.
    pub template: String,
    pub verb: Option<String>,
}

/// Parse a path template string.
pub fn parse(template: &str) -> Result<PathTemplate, Error> {
    let syntax = |reason: String| Error::TemplateSyntax {
        template: template.to_string(),
        reason,
    };
    let mut pairs = TemplateParser::parse(Rule::template, template)
        .map_err(|e| syntax(e.to_string()))?;
    let root = pairs.next().ok_or_else(|| syntax("empty parse".to_string()))?;

    let mut segments = Vec::new();
    let mut verb = None;
    for inner in root.into_inner() {
        match inner.as_rule() {
            Rule::segment => segments.push(build_segment(inner).map_err(&syntax)?),
            Rule::verb => verb = Some(inner.as_str().to_string()),
            _ => {}
        }
    }

    let parsed = PathTemplate { segments, verb };
    validate(&parsed).map_err(syntax)?;
    Ok(parsed)
}

fn build_segment(pair: pest::iterators::Pair<Rule>) -> Result<Segment, String> {
    let inner = pair.into_inner().next().ok_or("empty segment")?;
    match inner.as_rule() {
        Rule::deep_wildcard => Ok(Segment::DeepWildcard),
        Rule::wildcard => Ok(Segment::Wildcard),
        Rule::literal => Ok(Segment::Literal(inner.as_str().to_string())),
        Rule::capture => build_capture(inner),
        other => Err(format!("unexpected segment rule: {:?}", other)),
    }
}

fn build_capture(pair: pest::iterators::Pair<Rule>) -> Result<Segment, String> {
    let mut path = Vec::new();
    // A capture without an explicit pattern matches one segment.
    let mut pattern = vec![Segment::Wildcard];
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::field_path => {
                path = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::ident)
                    .map(|p| p.as_str().to_string())
                    .collect();
            }
            Rule::sub_pattern => {
                pattern = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::pattern_segment)
                    .map(build_pattern_segment)
                    .collect::<Result<_, _>>()?;
            }
            _ => {}
        }
    }
    if path.is_empty() {
        return Err("capture group with empty field path".to_string());
    }
    Ok(Segment::Capture { path, pattern })
}

fn build_pattern_segment(pair: pest::iterators::Pair<Rule>) -> Result<Segment, String> {
    let inner = pair.into_inner().next().ok_or("empty pattern segment")?;
    match inner.as_rule() {
        Rule::deep_wildcard => Ok(Segment::DeepWildcard),
        Rule::wildcard => Ok(Segment::Wildcard),
        Rule::literal => Ok(Segment::Literal(inner.as_str().to_string())),
        other => Err(format!("unexpected pattern rule: {:?}", other)),
    }
}

/// AST-level checks: duplicate capture field paths, and `**` anywhere but
/// the final pattern element (capture sub-patterns included).
fn validate(parsed: &PathTemplate) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for seg in &parsed.segments {
        if let Segment::Capture { path, .. } = seg {
            let dotted = path.join(".");
            if !seen.insert(dotted.clone()) {
                return Err(format!("duplicate capture of field {}", dotted));
            }
        }
    }

    let mut flat: Vec<&Segment> = Vec::new();
    for seg in &parsed.segments {
        match seg {
            Segment::Capture { pattern, .. } => flat.extend(pattern.iter()),
            other => flat.push(other),
        }
    }
    for (i, seg) in flat.iter().enumerate() {
        if matches!(seg, Segment::DeepWildcard) && i + 1 != flat.len() {
            return Err("`**` must be the final element of the template".to_string());
        }
    }
    Ok(())
}

impl PathTemplate {
    /// Flatten the AST into its compiled form.
    pub fn compile(&self) -> CompiledTemplate {
        let mut fields = Vec::new();
        for seg in &self.segments {
            if let Segment::Capture { path, .. } = seg {
                fields.push(path.join("."));
            }
        }
        CompiledTemplate {
            fields,
            template: self.render(),
            verb: self.verb.clone(),
        }
    }

    /// Canonical rendering of the template, verb suffix included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            out.push_str(&render_segment(seg));
        }
        if let Some(verb) = &self.verb {
            out.push(':');
            out.push_str(verb);
        }
        out
    }
}

fn render_segment(seg: &Segment) -> String {
    match seg {
        Segment::Literal(s) => s.clone(),
        Segment::Wildcard => "*".to_string(),
        Segment::DeepWildcard => "**".to_string(),
        Segment::Capture { path, pattern } => {
            let dotted = path.join(".");
            if matches!(pattern.as_slice(), [Segment::Wildcard]) {
                format!("{{{}}}", dotted)
            } else {
                let rendered: Vec<String> = pattern.iter().map(render_segment).collect();
                format!("{{{}={}}}", dotted, rendered.join("/"))
            }
        }
    }
}
