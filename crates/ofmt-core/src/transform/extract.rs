//! Path extraction: builds a self-contained sub-document limited to a set
//! of target paths, carrying along the transitive closure of component
//! definitions reachable from the retained operations.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::ExtractError;
use crate::parse::components::Components;
use crate::parse::header::HeaderOrRef;
use crate::parse::media_type::MediaType;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::reference::{ComponentKind, split_ref};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::security::SecuritySchemeOrRef;
use crate::parse::spec::OpenApiSpec;

/// Extract the paths named in `targets` into a fresh document.
///
/// Each target maps a path to the methods to keep; an empty method list is
/// a wildcard for every method defined on that path. Targets absent from
/// the source are ignored; a fully empty result is `NoMatchingPath`.
/// Root metadata (`openapi`, `info`, `servers`) is carried over, and the
/// output components hold exactly the definitions reachable from the
/// retained operations.
pub fn extract_paths(
    spec: Option<&OpenApiSpec>,
    targets: &IndexMap<String, Vec<String>>,
) -> Result<OpenApiSpec, ExtractError> {
    let spec = spec.ok_or(ExtractError::DocumentMissing)?;

    let empty = Components::default();
    let source = spec.components.as_ref().unwrap_or(&empty);

    let mut components = Components::default();
    let mut paths: IndexMap<String, _> = IndexMap::new();

    // Source iteration order drives output order, so retained paths keep
    // their relative position from the input document.
    for (path, item) in &spec.paths {
        let Some(methods) = targets.get(path) else {
            continue;
        };
        let wanted: HashSet<String> = methods
            .iter()
            .filter(|method| !method.is_empty())
            .map(|method| method.to_uppercase())
            .collect();

        let mut retained = item.clone();
        if !wanted.is_empty() {
            retained.retain_operations(|method| wanted.contains(method));
        }

        let mut collector = Collector {
            source,
            target: &mut components,
        };
        for param in &retained.parameters {
            collector.collect_parameter(param, None);
        }
        for (_, op) in retained.operations() {
            for param in &op.parameters {
                collector.collect_parameter(param, None);
            }
            if let Some(body) = &op.request_body {
                collector.collect_request_body(body, None);
            }
            for response in op.responses.values() {
                collector.collect_response(response, None);
            }
            for requirement in op.security.iter().flatten() {
                for scheme in requirement.keys() {
                    collector.collect_security_scheme(scheme);
                }
            }
        }

        paths.insert(path.clone(), retained);
    }

    if paths.is_empty() {
        return Err(ExtractError::NoMatchingPath);
    }

    Ok(OpenApiSpec {
        openapi: spec.openapi.clone(),
        info: spec.info.clone(),
        servers: spec.servers.clone(),
        paths,
        components: Some(components),
        tags: Vec::new(),
        security: None,
        extensions: IndexMap::new(),
    })
}

/// Copies reachable component definitions from `source` into `target`.
///
/// Every kind shares the same step: a key already present in the target
/// stops the walk (this is the cycle and duplicate guard), a key missing
/// from the source is skipped silently, and a fresh copy is recursed into
/// for its own nested references.
struct Collector<'a> {
    source: &'a Components,
    target: &'a mut Components,
}

/// The shared guarded-copy step. Returns the source entry only when a new
/// copy was made, so callers recurse at most once per key.
fn copy_component<'s, T: Clone>(
    target: &mut IndexMap<String, T>,
    source: &'s IndexMap<String, T>,
    key: &str,
) -> Option<&'s T> {
    if target.contains_key(key) {
        return None;
    }
    let Some(entry) = source.get(key) else {
        log::debug!("skipping dangling component reference: {key}");
        return None;
    };
    target.insert(key.to_owned(), entry.clone());
    Some(entry)
}

impl Collector<'_> {
    /// `origin` carries the pointer that led to an inline value, so a
    /// component whose definition is itself inline-complete still gets
    /// registered under its declaring key.
    fn collect_parameter(&mut self, param: &ParameterOrRef, origin: Option<&str>) {
        let source = self.source;
        match param {
            ParameterOrRef::Ref { ref_path } => {
                let Some((ComponentKind::Parameters, key)) = split_ref(ref_path) else {
                    return;
                };
                if let Some(entry) =
                    copy_component(&mut self.target.parameters, &source.parameters, key)
                {
                    self.collect_parameter(entry, Some(ref_path));
                }
            }
            ParameterOrRef::Parameter(parameter) => {
                if let Some(origin) = origin {
                    self.register_inline(origin, ComponentKind::Parameters, || param.clone());
                }
                if let Some(schema) = &parameter.schema {
                    self.collect_schema(schema);
                }
            }
        }
    }

    fn collect_request_body(&mut self, body: &RequestBodyOrRef, origin: Option<&str>) {
        let source = self.source;
        match body {
            RequestBodyOrRef::Ref { ref_path } => {
                let Some((ComponentKind::RequestBodies, key)) = split_ref(ref_path) else {
                    return;
                };
                if let Some(entry) =
                    copy_component(&mut self.target.request_bodies, &source.request_bodies, key)
                {
                    self.collect_request_body(entry, Some(ref_path));
                }
            }
            RequestBodyOrRef::RequestBody(request_body) => {
                if let Some(origin) = origin {
                    self.register_inline(origin, ComponentKind::RequestBodies, || body.clone());
                }
                self.collect_content_schemas(&request_body.content);
            }
        }
    }

    fn collect_response(&mut self, response: &ResponseOrRef, origin: Option<&str>) {
        let source = self.source;
        match response {
            ResponseOrRef::Ref { ref_path } => {
                let Some((ComponentKind::Responses, key)) = split_ref(ref_path) else {
                    return;
                };
                if let Some(entry) =
                    copy_component(&mut self.target.responses, &source.responses, key)
                {
                    self.collect_response(entry, Some(ref_path));
                }
            }
            ResponseOrRef::Response(resolved) => {
                if let Some(origin) = origin {
                    self.register_inline(origin, ComponentKind::Responses, || response.clone());
                }
                for header in resolved.headers.values() {
                    self.collect_header(header, None);
                }
                self.collect_content_schemas(&resolved.content);
            }
        }
    }

    fn collect_header(&mut self, header: &HeaderOrRef, origin: Option<&str>) {
        let source = self.source;
        match header {
            HeaderOrRef::Ref { ref_path } => {
                let Some((ComponentKind::Headers, key)) = split_ref(ref_path) else {
                    return;
                };
                if let Some(entry) = copy_component(&mut self.target.headers, &source.headers, key)
                {
                    self.collect_header(entry, Some(ref_path));
                }
            }
            HeaderOrRef::Header(resolved) => {
                if let Some(origin) = origin {
                    self.register_inline(origin, ComponentKind::Headers, || header.clone());
                }
                if let Some(schema) = &resolved.schema {
                    self.collect_schema(schema);
                }
            }
        }
    }

    fn collect_content_schemas(&mut self, content: &IndexMap<String, MediaType>) {
        for media in content.values() {
            if let Some(schema) = &media.schema {
                self.collect_schema(schema);
            }
        }
    }

    fn collect_schema(&mut self, schema: &SchemaOrRef) {
        let source = self.source;
        match schema {
            SchemaOrRef::Ref { ref_path } => {
                let Some((ComponentKind::Schemas, key)) = split_ref(ref_path) else {
                    return;
                };
                // A schema key already present in the output is never
                // reprocessed; that guard is what terminates the walk on
                // cyclic schema graphs.
                if let Some(entry) = copy_component(&mut self.target.schemas, &source.schemas, key)
                {
                    match entry {
                        SchemaOrRef::Schema(definition) => self.collect_schema_children(definition),
                        SchemaOrRef::Ref { .. } => self.collect_schema(entry),
                    }
                }
            }
            SchemaOrRef::Schema(definition) => self.collect_schema_children(definition),
        }
    }

    fn collect_schema_children(&mut self, schema: &Schema) {
        for property in schema.properties.values() {
            self.collect_schema(property);
        }
        if let Some(items) = &schema.items {
            self.collect_schema(items);
        }
        for branch in &schema.all_of {
            self.collect_schema(branch);
        }
        for branch in &schema.one_of {
            self.collect_schema(branch);
        }
        for branch in &schema.any_of {
            self.collect_schema(branch);
        }
    }

    /// Security requirements name their scheme directly, so collection is
    /// keyed by name rather than by `$ref`.
    fn collect_security_scheme(&mut self, name: &str) {
        let source = self.source;
        let entry = copy_component(
            &mut self.target.security_schemes,
            &source.security_schemes,
            name,
        );
        if let Some(SecuritySchemeOrRef::Ref { ref_path }) = entry {
            if let Some((ComponentKind::SecuritySchemes, key)) = split_ref(ref_path) {
                self.collect_security_scheme(key);
            }
        }
    }

    /// Register an inline definition under the key of the pointer that led
    /// to it, unless that key was already collected.
    fn register_inline<T, F>(&mut self, origin: &str, kind: ComponentKind, value: F)
    where
        F: FnOnce() -> T,
        Components: ComponentMap<T>,
    {
        let Some((found, key)) = split_ref(origin) else {
            return;
        };
        if found != kind {
            return;
        }
        let map = <Components as ComponentMap<T>>::map_mut(self.target);
        if !map.contains_key(key) {
            map.insert(key.to_owned(), value());
        }
    }
}

/// Access to the kind-specific mapping for a component value type. Lets the
/// inline-registration step stay generic over the six kinds.
trait ComponentMap<T> {
    fn map_mut(&mut self) -> &mut IndexMap<String, T>;
}

impl ComponentMap<ParameterOrRef> for Components {
    fn map_mut(&mut self) -> &mut IndexMap<String, ParameterOrRef> {
        &mut self.parameters
    }
}

impl ComponentMap<RequestBodyOrRef> for Components {
    fn map_mut(&mut self) -> &mut IndexMap<String, RequestBodyOrRef> {
        &mut self.request_bodies
    }
}

impl ComponentMap<ResponseOrRef> for Components {
    fn map_mut(&mut self) -> &mut IndexMap<String, ResponseOrRef> {
        &mut self.responses
    }
}

impl ComponentMap<HeaderOrRef> for Components {
    fn map_mut(&mut self) -> &mut IndexMap<String, HeaderOrRef> {
        &mut self.headers
    }
}
