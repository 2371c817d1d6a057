//! Path template grammar tests: parse success/failure, AST shape, and
//! compile/render round-trips.

use restbind::template::{self, Segment};

// ==================== Valid templates ====================

#[test]
fn parse_single_literal() {
    let t = template::parse("/v1").expect("parse");
    assert_eq!(t.segments, vec![Segment::Literal("v1".to_string())]);
    assert!(t.verb.is_none());
}

#[test]
fn parse_literals_and_wildcards() {
    let t = template::parse("/v1/*/books/**").expect("parse");
    assert_eq!(t.segments.len(), 4);
    assert_eq!(t.segments[0], Segment::Literal("v1".to_string()));
    assert_eq!(t.segments[1], Segment::Wildcard);
    assert_eq!(t.segments[3], Segment::DeepWildcard);
}

#[test]
fn parse_capture_default_pattern() {
    let t = template::parse("/v1/{book_id}").expect("parse");
    match &t.segments[1] {
        Segment::Capture { path, pattern } => {
            assert_eq!(path, &vec!["book_id".to_string()]);
            assert_eq!(pattern, &vec![Segment::Wildcard]);
        }
        other => panic!("expected capture, got {:?}", other),
    }
}

#[test]
fn parse_capture_dotted_path_and_pattern() {
    let t = template::parse("/v1/{resource.id=shelves/*}").expect("parse");
    match &t.segments[1] {
        Segment::Capture { path, pattern } => {
            assert_eq!(path, &vec!["resource".to_string(), "id".to_string()]);
            assert_eq!(
                pattern,
                &vec![Segment::Literal("shelves".to_string()), Segment::Wildcard]
            );
        }
        other => panic!("expected capture, got {:?}", other),
    }
}

#[test]
fn parse_trailing_verb() {
    let t = template::parse("/v1/books/{book_id}:checkout").expect("parse");
    assert_eq!(t.verb.as_deref(), Some("checkout"));
    assert_eq!(t.segments.len(), 3);
}

#[test]
fn parse_deep_wildcard_inside_final_capture() {
    template::parse("/v1/{name=projects/**}").expect("parse");
}

#[test]
fn parse_multiple_captures() {
    let t = template::parse("/v1/{parent}/books/{book_id}").expect("parse");
    let captures: Vec<_> = t
        .segments
        .iter()
        .filter(|s| matches!(s, Segment::Capture { .. }))
        .collect();
    assert_eq!(captures.len(), 2);
}

// ==================== Syntax errors ====================

#[test]
fn reject_empty_template() {
    assert!(template::parse("").is_err());
    assert!(template::parse("/").is_err());
}

#[test]
fn reject_missing_leading_slash() {
    assert!(template::parse("v1/books").is_err());
}

#[test]
fn reject_empty_segment() {
    assert!(template::parse("/v1//books").is_err());
}

#[test]
fn reject_unbalanced_braces() {
    assert!(template::parse("/v1/{book_id").is_err());
    assert!(template::parse("/v1/book_id}").is_err());
    assert!(template::parse("/v1/{a={b}").is_err());
}

#[test]
fn reject_empty_capture() {
    assert!(template::parse("/v1/{}").is_err());
    assert!(template::parse("/v1/{=*}").is_err());
}

#[test]
fn reject_nested_capture_in_pattern() {
    assert!(template::parse("/v1/{a={b}}").is_err());
}

#[test]
fn reject_duplicate_captures() {
    let err = template::parse("/v1/{id}/books/{id}").expect_err("duplicate capture");
    assert!(err.to_string().contains("duplicate"), "got: {}", err);
}

#[test]
fn reject_misplaced_deep_wildcard() {
    assert!(template::parse("/v1/**/books").is_err());
    assert!(template::parse("/v1/{a=**/x}").is_err());
    assert!(template::parse("/v1/{a=**}/books").is_err());
    assert!(template::parse("/**/**").is_err());
}

#[test]
fn deep_wildcard_then_verb_is_allowed() {
    template::parse("/v1/files/**:download").expect("verb after ** parses");
}

#[test]
fn syntax_error_names_the_template() {
    let err = template::parse("/v1/{oops").expect_err("unbalanced brace");
    assert!(err.to_string().contains("/v1/{oops"), "got: {}", err);
}

// ==================== Compile and render ====================

#[test]
fn compile_collects_fields_in_order() {
    let c = template::parse("/v1/{parent}/books/{book_id}")
        .expect("parse")
        .compile();
    assert_eq!(c.fields, vec!["parent".to_string(), "book_id".to_string()]);
}

#[test]
fn compile_renders_canonical_template() {
    let src = "/v1/{parent}/books/{book_id}";
    let c = template::parse(src).expect("parse").compile();
    assert_eq!(c.template, src);
    assert!(c.verb.is_none());
}

#[test]
fn compile_renders_subpattern_and_verb() {
    let src = "/v1/{name=shelves/*/books/**}:export";
    let c = template::parse(src).expect("parse").compile();
    assert_eq!(c.template, src);
    assert_eq!(c.verb.as_deref(), Some("export"));
    assert_eq!(c.fields, vec!["name".to_string()]);
}

#[test]
fn compile_dotted_field_path() {
    let c = template::parse("/v1/{resource.path.id}").expect("parse").compile();
    assert_eq!(c.fields, vec!["resource.path.id".to_string()]);
}

#[test]
fn compile_is_stable_across_runs() {
    let src = "/v2/{parent=projects/*}/items/{item.id}:archive";
    let first = template::parse(src).expect("parse").compile();
    let second = template::parse(src).expect("parse").compile();
    assert_eq!(first, second);
}
