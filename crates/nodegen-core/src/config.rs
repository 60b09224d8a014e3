use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ir::AuthType;

/// Top-level project configuration loaded from `.nodegen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodegenConfig {
    pub input: String,
    pub output: String,
    /// Directory holding intermediate artifacts such as the dereferenced spec.
    pub work_dir: String,
    pub service_name: Option<String>,
    pub node_color: String,
    pub auth_type: Option<AuthType>,
    /// Tags that never become resources.
    pub excluded_tags: Vec<String>,
    pub emit: EmitConfig,
}

impl Default for NodegenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.json".to_string(),
            output: "nodegen-output".to_string(),
            work_dir: ".nodegen".to_string(),
            service_name: None,
            node_color: DEFAULT_NODE_COLOR.to_string(),
            auth_type: None,
            excluded_tags: vec!["OAuth".to_string()],
            emit: EmitConfig::default(),
        }
    }
}

/// Options for the code-emission layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Emit `throw new Error(...)` branches for unknown resources and operations.
    pub error_branches: bool,
    /// `name` of the generated `package.json`, derived from the service name when unset.
    pub package_name: Option<String>,
    pub repository: Option<String>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".nodegen.yaml";

pub const DEFAULT_NODE_COLOR: &str = "#ffffff";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<NodegenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: NodegenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r##"# nodegen configuration
input: openapi.json
output: nodegen-output
work_dir: .nodegen         # the dereferenced spec is written here as _deref.json

# service_name: Lichess   # defaults to the spec's info.title
node_color: "#ffffff"
# auth_type: OAuth2       # OAuth2 | ApiKey | None, derived from securitySchemes when unset

excluded_tags:
  - OAuth

emit:
  error_branches: false   # throw on unknown resource/operation in the router
  # package_name: n8n-nodes-lichess
  # repository: https://github.com/me/n8n-nodes-lichess
"##
}
