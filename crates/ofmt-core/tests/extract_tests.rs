use indexmap::IndexMap;

use ofmt_core::error::ExtractError;
use ofmt_core::parse;
use ofmt_core::transform::extract_paths;

const REFS: &str = include_str!("fixtures/refs.yaml");

fn targets(entries: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(path, methods)| {
            (
                path.to_string(),
                methods.iter().map(|method| method.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn missing_document_fails() {
    let err = extract_paths(None, &targets(&[("/a", &[])])).unwrap_err();
    assert_eq!(err, ExtractError::DocumentMissing);
}

#[test]
fn empty_targets_fail() {
    let spec = parse::from_yaml(REFS).expect("fixture should parse");
    let err = extract_paths(Some(&spec), &IndexMap::new()).unwrap_err();
    assert_eq!(err, ExtractError::NoMatchingPath);
}

#[test]
fn unknown_target_path_fails_when_nothing_matches() {
    let spec = parse::from_yaml(REFS).unwrap();
    let err = extract_paths(Some(&spec), &targets(&[("/missing", &[])])).unwrap_err();
    assert_eq!(err, ExtractError::NoMatchingPath);
}

#[test]
fn unknown_target_path_is_ignored_next_to_a_match() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/missing", &[]), ("/b", &[])])).unwrap();
    assert_eq!(out.paths.keys().collect::<Vec<_>>(), vec!["/b"]);
}

#[test]
fn wildcard_extracts_path_with_transitive_schemas() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/a", &[])])).unwrap();

    assert_eq!(out.paths.keys().collect::<Vec<_>>(), vec!["/a"]);
    let item = out.paths.get("/a").unwrap();
    assert!(item.get.is_some(), "wildcard keeps every method");
    assert!(item.delete.is_some());

    let components = out.components.as_ref().unwrap();
    assert_eq!(components.schemas.len(), 2);
    assert!(components.schemas.contains_key("Foo"));
    assert!(
        components.schemas.contains_key("Bar"),
        "Bar is reachable through Foo's properties"
    );
    assert!(
        !components.schemas.contains_key("Baz"),
        "unreachable schemas are not included"
    );

    // The `size` parameter is a pointer to an inline-complete component.
    assert_eq!(components.parameters.len(), 1);
    assert!(components.parameters.contains_key("size"));

    assert!(components.request_bodies.is_empty());
    assert!(components.responses.is_empty());
    assert!(components.headers.is_empty());
    assert!(components.security_schemes.is_empty());
}

#[test]
fn method_filter_keeps_only_listed_operations() {
    let spec = parse::from_yaml(REFS).unwrap();

    // Matching is case-insensitive.
    let out = extract_paths(Some(&spec), &targets(&[("/a", &["get"])])).unwrap();
    let item = out.paths.get("/a").unwrap();
    assert!(item.get.is_some());
    assert!(item.delete.is_none(), "unlisted methods are dropped");

    let out = extract_paths(Some(&spec), &targets(&[("/a", &["DELETE"])])).unwrap();
    let item = out.paths.get("/a").unwrap();
    assert!(item.get.is_none());
    assert!(item.delete.is_some());

    // Components referenced only by the dropped GET are not collected.
    let components = out.components.as_ref().unwrap();
    assert!(components.schemas.is_empty());
    assert!(components.parameters.is_empty());
}

#[test]
fn empty_method_strings_act_as_wildcard() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/a", &[""])])).unwrap();
    let item = out.paths.get("/a").unwrap();
    assert!(item.get.is_some());
    assert!(item.delete.is_some());
}

#[test]
fn closure_follows_every_reference_kind_and_terminates_on_cycles() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/c", &[])])).unwrap();
    let components = out.components.as_ref().unwrap();

    // Node references itself through items; the guard terminates the walk.
    assert!(components.schemas.contains_key("Node"));
    assert!(
        components.schemas.contains_key("Bar"),
        "reachable through Node.meta"
    );
    assert!(
        components.schemas.contains_key("Foo"),
        "reachable through the request body"
    );
    assert!(
        components.schemas.contains_key("Error"),
        "reachable through the BadRequest response"
    );
    assert_eq!(components.schemas.len(), 4);

    assert!(components.request_bodies.contains_key("CreateC"));
    assert!(components.responses.contains_key("BadRequest"));
    assert!(
        components.responses.contains_key("NotFound"),
        "a component aliasing another keeps both entries"
    );
    assert!(components.headers.contains_key("RequestId"));
    assert!(components.security_schemes.contains_key("api_key"));
}

#[test]
fn dangling_references_are_skipped_silently() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/dangling", &[])])).unwrap();

    assert_eq!(out.paths.len(), 1);
    let components = out.components.as_ref().unwrap();
    assert!(components.schemas.is_empty());
}

#[test]
fn root_metadata_is_preserved() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/b", &[])])).unwrap();

    assert_eq!(out.openapi, "3.0.3");
    assert_eq!(out.info.title, "Refs");
    assert_eq!(out.info.version, "2.0.0");
    assert_eq!(out.servers.len(), 1);
    assert!(out.tags.is_empty());
    assert!(out.security.is_none());
}

#[test]
fn retained_paths_keep_source_order() {
    let spec = parse::from_yaml(REFS).unwrap();
    // Target insertion order differs from document order on purpose.
    let out = extract_paths(Some(&spec), &targets(&[("/c", &[]), ("/a", &[])])).unwrap();
    assert_eq!(out.paths.keys().collect::<Vec<_>>(), vec!["/a", "/c"]);
}

#[test]
fn unrelated_components_are_never_included() {
    let spec = parse::from_yaml(REFS).unwrap();
    let out = extract_paths(Some(&spec), &targets(&[("/b", &[])])).unwrap();
    let components = out.components.as_ref().unwrap();

    assert_eq!(components.schemas.keys().collect::<Vec<_>>(), vec!["Baz"]);
    assert!(components.parameters.is_empty());
    assert!(components.request_bodies.is_empty());
    assert!(components.responses.is_empty());
    assert!(components.headers.is_empty());
    assert!(components.security_schemes.is_empty());
}

#[test]
fn source_document_is_not_mutated() {
    let spec = parse::from_yaml(REFS).unwrap();
    let before = spec.clone();
    let _ = extract_paths(Some(&spec), &targets(&[("/a", &[])])).unwrap();
    assert_eq!(before, spec);
}
