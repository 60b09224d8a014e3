use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::security::SecurityScheme;

/// Components object. Only the parts the normalizer reads are typed; reusable
/// schemas, parameters and bodies are already inlined by the dereferencer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, serde_json::Value>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}
