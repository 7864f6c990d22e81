use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Project configuration loaded from `.ofmt.yaml`. Values present here
/// take precedence over command-line flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FmtConfig {
    /// Path to the input OpenAPI document.
    pub input: Option<String>,
    /// Path to write the reduced document to.
    pub output: Option<String>,
    /// Output serialization format.
    pub format: Option<OutputFormat>,
    pub strip: StripConfig,
    pub split: SplitConfig,
}

/// On-disk output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Extension-stripping options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub enable: bool,
    /// Extension keys to retain everywhere (e.g. `x-go-type`).
    pub keep: Vec<String>,
}

/// Path-extraction options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub enable: bool,
    pub endpoints: Vec<Endpoint>,
}

/// A target path, optionally restricted to specific HTTP methods. An empty
/// method list keeps every method defined on the path.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub path: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".ofmt.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<FmtConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: FmtConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# ofmt configuration
input: openapi.yaml
output: openapi.out.yaml
format: yaml            # yaml | json

strip:
  enable: false
  keep: []
    # - x-go-type       # extensions to retain everywhere

split:
  enable: false
  endpoints: []
    # - path: /pets
    #   methods: [GET, POST]   # omit for every method
"#
}
