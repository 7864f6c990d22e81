use std::collections::HashSet;

use ofmt_core::parse;
use ofmt_core::parse::header::HeaderOrRef;
use ofmt_core::parse::parameter::ParameterOrRef;
use ofmt_core::parse::response::{Response, ResponseOrRef};
use ofmt_core::parse::schema::{Schema, SchemaOrRef};
use ofmt_core::parse::security::SecuritySchemeOrRef;
use ofmt_core::transform::strip_extensions;

const PETSTORE: &str = include_str!("fixtures/petstore-ext.yaml");

fn keep(keys: &[&str]) -> HashSet<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

fn inline_schema(schema: &SchemaOrRef) -> &Schema {
    match schema {
        SchemaOrRef::Schema(schema) => schema,
        SchemaOrRef::Ref { .. } => panic!("expected inline schema"),
    }
}

fn inline_response(response: &ResponseOrRef) -> &Response {
    match response {
        ResponseOrRef::Response(response) => response,
        ResponseOrRef::Ref { .. } => panic!("expected inline response"),
    }
}

#[test]
fn empty_keep_removes_extensions_everywhere() {
    let mut spec = parse::from_yaml(PETSTORE).expect("fixture should parse");
    strip_extensions(Some(&mut spec), &HashSet::new());

    assert!(spec.extensions.is_empty(), "root extensions should be gone");

    let pets = spec.paths.get("/pets").expect("should have /pets");
    assert!(pets.extensions.is_empty());

    let get = pets.get.as_ref().expect("should have GET");
    assert!(get.extensions.is_empty());

    let ok = inline_response(get.responses.get("200").expect("should have 200"));
    assert!(ok.extensions.is_empty());

    let next = match ok.headers.get("X-Next").expect("should have X-Next") {
        HeaderOrRef::Header(header) => header,
        HeaderOrRef::Ref { .. } => panic!("expected inline header"),
    };
    assert!(next.extensions.is_empty());
    assert!(
        inline_schema(next.schema.as_ref().unwrap())
            .extensions
            .is_empty()
    );

    let media = ok.content.get("application/json").unwrap();
    assert!(media.extensions.is_empty());
    assert!(
        inline_schema(media.schema.as_ref().unwrap())
            .extensions
            .is_empty()
    );

    let post = pets.post.as_ref().expect("should have POST");
    match post.request_body.as_ref().unwrap() {
        ofmt_core::parse::request_body::RequestBodyOrRef::RequestBody(body) => {
            assert!(body.extensions.is_empty());
        }
        _ => panic!("expected inline request body"),
    }

    let components = spec.components.as_ref().unwrap();

    let pet = inline_schema(components.schemas.get("Pet").unwrap());
    assert!(pet.extensions.is_empty());
    assert!(
        inline_schema(pet.properties.get("name").unwrap())
            .extensions
            .is_empty()
    );
    let tags = inline_schema(pet.properties.get("tags").unwrap());
    assert!(
        inline_schema(tags.items.as_ref().unwrap())
            .extensions
            .is_empty()
    );
    let variant = inline_schema(pet.properties.get("variant").unwrap());
    for branch in &variant.one_of {
        assert!(inline_schema(branch).extensions.is_empty());
    }

    let error = inline_response(components.responses.get("Error").unwrap());
    assert!(error.extensions.is_empty());
    let error_schema = inline_schema(
        error
            .content
            .get("application/json")
            .unwrap()
            .schema
            .as_ref()
            .unwrap(),
    );
    assert!(error_schema.extensions.is_empty());

    match components.headers.get("RateLimit").unwrap() {
        HeaderOrRef::Header(header) => {
            assert!(header.extensions.is_empty());
            assert!(
                inline_schema(header.schema.as_ref().unwrap())
                    .extensions
                    .is_empty()
            );
        }
        HeaderOrRef::Ref { .. } => panic!("expected inline header"),
    }

    match components.security_schemes.get("api_key").unwrap() {
        SecuritySchemeOrRef::SecurityScheme(scheme) => assert!(scheme.extensions.is_empty()),
        SecuritySchemeOrRef::Ref { .. } => panic!("expected inline scheme"),
    }
}

#[test]
fn allow_listed_extensions_survive() {
    let mut spec = parse::from_yaml(PETSTORE).unwrap();
    strip_extensions(Some(&mut spec), &keep(&["x-go-type"]));

    let components = spec.components.as_ref().unwrap();
    let pet = inline_schema(components.schemas.get("Pet").unwrap());
    assert!(pet.extensions.contains_key("x-go-type"));
    assert!(!pet.extensions.contains_key("x-internal"));

    let get = spec.paths.get("/pets").unwrap().get.as_ref().unwrap();
    assert!(get.extensions.contains_key("x-go-type"));
    assert!(!get.extensions.contains_key("x-ratelimit"));

    // Root extensions follow the allow-list too.
    assert!(!spec.extensions.contains_key("x-audience"));
}

#[test]
fn path_item_extensions_are_cleared_even_when_kept() {
    let mut spec = parse::from_yaml(PETSTORE).unwrap();
    strip_extensions(Some(&mut spec), &keep(&["x-path-owner"]));

    let pets = spec.paths.get("/pets").unwrap();
    assert!(
        pets.extensions.is_empty(),
        "path-level extensions ignore the allow-list"
    );
}

#[test]
fn parameter_schemas_are_not_descended() {
    let mut spec = parse::from_yaml(PETSTORE).unwrap();
    strip_extensions(Some(&mut spec), &HashSet::new());

    let components = spec.components.as_ref().unwrap();
    let limit = match components.parameters.get("Limit").unwrap() {
        ParameterOrRef::Parameter(parameter) => parameter,
        ParameterOrRef::Ref { .. } => panic!("expected inline parameter"),
    };
    assert!(limit.extensions.is_empty(), "own extensions are stripped");
    assert!(
        inline_schema(limit.schema.as_ref().unwrap())
            .extensions
            .contains_key("x-left-alone"),
        "parameter schemas are left untouched"
    );
}

#[test]
fn stripping_is_idempotent() {
    let mut spec = parse::from_yaml(PETSTORE).unwrap();
    let allow = keep(&["x-go-type"]);

    strip_extensions(Some(&mut spec), &allow);
    let once = spec.clone();
    strip_extensions(Some(&mut spec), &allow);

    assert_eq!(once, spec);
}

#[test]
fn none_document_is_a_noop() {
    strip_extensions(None, &HashSet::new());
    strip_extensions(None, &keep(&["x-go-type"]));
}

#[test]
fn document_without_extensions_is_unchanged() {
    let yaml = r#"
openapi: 3.0.0
info:
  title: Minimal API
  version: 0.1.0
paths:
  /health:
    get:
      summary: Health check
      responses:
        '200':
          description: OK
"#;
    let mut spec = parse::from_yaml(yaml).unwrap();
    let original = spec.clone();
    strip_extensions(Some(&mut spec), &HashSet::new());
    assert_eq!(original, spec);
}
