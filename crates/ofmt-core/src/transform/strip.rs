//! Extension stripping: a full-coverage walk over the document tree that
//! deletes `x-` vendor extension keys not present in an allow-list.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::parse::components::Components;
use crate::parse::header::{Header, HeaderOrRef};
use crate::parse::media_type::MediaType;
use crate::parse::operation::Operation;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::security::SecuritySchemeOrRef;
use crate::parse::spec::OpenApiSpec;

/// Remove every `x-` extension key not named in `keep` from every visited
/// location of the document, in place. A `None` document is a no-op.
///
/// Path-item extension containers are cleared unconditionally, ignoring
/// `keep`. That asymmetry is inherited behavior kept on purpose; see
/// DESIGN.md before changing it.
pub fn strip_extensions(spec: Option<&mut OpenApiSpec>, keep: &HashSet<String>) {
    let Some(spec) = spec else {
        return;
    };

    strip_map(&mut spec.extensions, keep);

    if let Some(components) = spec.components.as_mut() {
        strip_components(components, keep);
    }

    for item in spec.paths.values_mut() {
        clear_extensions(&mut item.extensions);
        for param in &mut item.parameters {
            strip_parameter(param, keep);
        }
        for (_, op) in item.operations_mut() {
            strip_operation(op, keep);
        }
    }
}

/// Drop `x-` keys not in `keep`; non-extension keys pass through.
fn strip_map(extensions: &mut IndexMap<String, serde_json::Value>, keep: &HashSet<String>) {
    extensions.retain(|key, _| !key.starts_with("x-") || keep.contains(key));
}

/// Drop every `x-` key regardless of the allow-list.
fn clear_extensions(extensions: &mut IndexMap<String, serde_json::Value>) {
    extensions.retain(|key, _| !key.starts_with("x-"));
}

fn strip_components(components: &mut Components, keep: &HashSet<String>) {
    for schema in components.schemas.values_mut() {
        strip_schema(schema, keep);
    }
    for response in components.responses.values_mut() {
        strip_response(response, keep);
    }
    for parameter in components.parameters.values_mut() {
        strip_parameter(parameter, keep);
    }
    for request_body in components.request_bodies.values_mut() {
        strip_request_body(request_body, keep);
    }
    for header in components.headers.values_mut() {
        strip_header(header, keep);
    }
    for scheme in components.security_schemes.values_mut() {
        if let SecuritySchemeOrRef::SecurityScheme(scheme) = scheme {
            strip_map(&mut scheme.extensions, keep);
        }
    }
}

fn strip_operation(op: &mut Operation, keep: &HashSet<String>) {
    strip_map(&mut op.extensions, keep);
    for param in &mut op.parameters {
        strip_parameter(param, keep);
    }
    if let Some(body) = op.request_body.as_mut() {
        strip_request_body(body, keep);
    }
    for response in op.responses.values_mut() {
        strip_response(response, keep);
    }
}

/// Parameters are stripped for their own extensions only; their schema is
/// deliberately not descended (inherited behavior).
fn strip_parameter(param: &mut ParameterOrRef, keep: &HashSet<String>) {
    if let ParameterOrRef::Parameter(param) = param {
        strip_map(&mut param.extensions, keep);
    }
}

fn strip_request_body(body: &mut RequestBodyOrRef, keep: &HashSet<String>) {
    if let RequestBodyOrRef::RequestBody(body) = body {
        strip_map(&mut body.extensions, keep);
        strip_content(&mut body.content, keep);
    }
}

fn strip_response(response: &mut ResponseOrRef, keep: &HashSet<String>) {
    if let ResponseOrRef::Response(response) = response {
        strip_map(&mut response.extensions, keep);
        for header in response.headers.values_mut() {
            strip_header(header, keep);
        }
        strip_content(&mut response.content, keep);
    }
}

fn strip_header(header: &mut HeaderOrRef, keep: &HashSet<String>) {
    if let HeaderOrRef::Header(header) = header {
        strip_header_value(header, keep);
    }
}

fn strip_header_value(header: &mut Header, keep: &HashSet<String>) {
    strip_map(&mut header.extensions, keep);
    if let Some(schema) = header.schema.as_mut() {
        strip_schema(schema, keep);
    }
}

fn strip_content(content: &mut IndexMap<String, MediaType>, keep: &HashSet<String>) {
    for media_type in content.values_mut() {
        strip_map(&mut media_type.extensions, keep);
        if let Some(schema) = media_type.schema.as_mut() {
            strip_schema(schema, keep);
        }
    }
}

fn strip_schema(schema: &mut SchemaOrRef, keep: &HashSet<String>) {
    if let SchemaOrRef::Schema(schema) = schema {
        strip_schema_value(schema, keep);
    }
}

// `$ref` arms are never followed, so recursion is bounded by the owned
// tree even when the reference graph is cyclic.
fn strip_schema_value(schema: &mut Schema, keep: &HashSet<String>) {
    strip_map(&mut schema.extensions, keep);

    for prop in schema.properties.values_mut() {
        strip_schema(prop, keep);
    }
    if let Some(items) = schema.items.as_mut() {
        strip_schema(items, keep);
    }
    for branch in &mut schema.all_of {
        strip_schema(branch, keep);
    }
    for branch in &mut schema.one_of {
        strip_schema(branch, keep);
    }
    for branch in &mut schema.any_of {
        strip_schema(branch, keep);
    }
}
