use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level project configuration loaded from `.apigen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApigenConfig {
    pub input: String,
    pub output: String,
    pub naming: NamingConfig,
    pub server: ServerOptions,
}

impl Default for ApigenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "generated".to_string(),
            naming: NamingConfig::default(),
            server: ServerOptions::default(),
        }
    }
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from resolved operation name (operationId or route-derived) to custom alias.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strategy: NamingStrategy::UseOperationId,
            aliases: IndexMap::new(),
        }
    }
}

/// How operation names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    UseOperationId,
    UseRouteBased,
}

/// Options for the generated Express server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerOptions {
    /// Package name for package.json (defaults to the slugified spec title).
    pub package_name: Option<String>,
    /// Repository URL for package.json.
    pub repository: Option<String>,
    /// Directory under the output root that holds TypeScript sources.
    pub source_dir: String,
    /// Emit a biome.json and format the output when biome is available.
    pub format: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            package_name: None,
            repository: None,
            source_dir: "src".to_string(),
            format: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apigen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApigenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: ApigenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apigen configuration — https://github.com/fionnbarrett/apigen
input: openapi.yaml
output: generated

naming:
  strategy: use_operation_id  # use_operation_id | use_route_based
  aliases: {}
    # createChatCompletion: chat     # operationId → custom name

server:
  # package_name: my-api-server   # custom npm package name (defaults to slugified spec title)
  # repository: https://github.com/you/your-repo
  source_dir: src
  format: true          # emit biome.json and format output when biome is available
"#
}
