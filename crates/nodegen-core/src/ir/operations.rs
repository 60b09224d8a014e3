use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Body content types the plugin templates know how to send, in output order.
pub const BODY_CONTENT_TYPES: [&str; 3] = [FORM_URLENCODED, APPLICATION_JSON, TEXT_PLAIN];

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// PUT and PATCH modify an existing entity.
    pub fn is_update(&self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized operation of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub endpoint: String,
    pub request_method: HttpMethod,
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<OperationParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub request_body: Vec<RequestBodyGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<FieldCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_fields: Option<FieldCollection>,
}

impl Operation {
    pub fn new(endpoint: &str, request_method: HttpMethod, operation_id: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            request_method,
            operation_id: operation_id.to_string(),
            description: None,
            summary: None,
            parameters: Vec::new(),
            request_body: Vec::new(),
            operation_url: None,
            additional_fields: None,
            update_fields: None,
        }
    }

    pub fn params_in(&self, location: ParameterLocation) -> impl Iterator<Item = &OperationParameter> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    pub fn body_group(&self, name: BodyGroupName) -> Option<&RequestBodyGroup> {
        self.request_body.iter().find(|g| g.name == name)
    }
}

/// Parameter location. Only path and query parameters reach the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

/// A path or query parameter of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationParameter {
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub name: String,
    pub required: bool,
    pub schema: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Label of a request-body group; doubles as the UI collection name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyGroupName {
    Standard,
    #[serde(rename = "Additional Fields")]
    AdditionalFields,
    Filters,
    #[serde(rename = "Update Fields")]
    UpdateFields,
}

impl BodyGroupName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyGroupName::Standard => "Standard",
            BodyGroupName::AdditionalFields => "Additional Fields",
            BodyGroupName::Filters => "Filters",
            BodyGroupName::UpdateFields => "Update Fields",
        }
    }
}

impl fmt::Display for BodyGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request-body descriptor, keyed by content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBodyGroup {
    pub name: BodyGroupName,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: IndexMap<String, BodyContent>,
}

impl RequestBodyGroup {
    /// Property names across all content types, in output order.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for content in self.content.values() {
            if let Some(props) = content.properties() {
                names.extend(props.keys().map(String::as_str));
            }
        }
        names
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyContent {
    pub schema: serde_json::Value,
}

impl BodyContent {
    pub fn properties(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.schema.get("properties")?.as_object()
    }
}

/// A query-string collection (`Additional Fields`, `Update Fields`) of a custom-spec operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCollection {
    pub name: BodyGroupName,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
    pub default: serde_json::Value,
    pub options: Vec<OperationParameter>,
}

impl FieldCollection {
    pub fn new(name: BodyGroupName, options: Vec<OperationParameter>) -> Self {
        Self {
            name,
            field_type: "collection".to_string(),
            description: String::new(),
            default: serde_json::Value::Object(serde_json::Map::new()),
            options,
        }
    }
}
