use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operations::Operation;

/// Resource name → its operations, alphabetized on both levels.
pub type MainParams = IndexMap<String, Vec<Operation>>;

/// The intermediate representation consumed by the plugin templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodegenParams {
    pub meta_params: MetaParams,
    pub main_params: MainParams,
}

impl NodegenParams {
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.main_params.keys().map(String::as_str)
    }

    /// Find an operation by resource and operation id.
    pub fn find_operation(&self, resource: &str, operation_id: &str) -> Option<&Operation> {
        self.main_params
            .get(resource)?
            .iter()
            .find(|op| op.operation_id == operation_id)
    }

    pub fn operation_count(&self) -> usize {
        self.main_params.values().map(Vec::len).sum()
    }
}

/// Service-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaParams {
    pub service_name: String,
    pub auth_type: AuthType,
    pub node_color: String,
    #[serde(default)]
    pub api_url: String,
}

/// How the generated plugin authenticates against the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    OAuth2,
    ApiKey,
    #[default]
    None,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::OAuth2 => "OAuth2",
            AuthType::ApiKey => "ApiKey",
            AuthType::None => "None",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
