use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Failures of path extraction. Dangling references and target paths absent
/// from the source are deliberately not errors — extraction is a best-effort
/// reducer and skips them silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("openapi document not found")]
    DocumentMissing,

    #[error("no path matched the requested targets")]
    NoMatchingPath,
}
