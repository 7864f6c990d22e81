use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::security::SecurityRequirement;

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// A path item, with one operation slot per HTTP method. Storage keeps the
/// lowercase wire form; matching goes through the upper-cased names yielded
/// by [`PathItem::operations`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,

    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    /// Iterate the defined operations as `(METHOD, operation)` pairs, with
    /// the method name upper-cased for matching.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("GET", self.get.as_ref()),
            ("POST", self.post.as_ref()),
            ("PUT", self.put.as_ref()),
            ("DELETE", self.delete.as_ref()),
            ("PATCH", self.patch.as_ref()),
            ("OPTIONS", self.options.as_ref()),
            ("HEAD", self.head.as_ref()),
            ("TRACE", self.trace.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }

    /// Mutable variant of [`PathItem::operations`].
    pub fn operations_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Operation)> {
        [
            ("GET", self.get.as_mut()),
            ("POST", self.post.as_mut()),
            ("PUT", self.put.as_mut()),
            ("DELETE", self.delete.as_mut()),
            ("PATCH", self.patch.as_mut()),
            ("OPTIONS", self.options.as_mut()),
            ("HEAD", self.head.as_mut()),
            ("TRACE", self.trace.as_mut()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }

    /// Drop every operation whose upper-cased method name fails `keep`.
    pub fn retain_operations<F>(&mut self, keep: F)
    where
        F: Fn(&str) -> bool,
    {
        for (method, slot) in [
            ("GET", &mut self.get),
            ("POST", &mut self.post),
            ("PUT", &mut self.put),
            ("DELETE", &mut self.delete),
            ("PATCH", &mut self.patch),
            ("OPTIONS", &mut self.options),
            ("HEAD", &mut self.head),
            ("TRACE", &mut self.trace),
        ] {
            if !keep(method) {
                *slot = None;
            }
        }
    }
}
