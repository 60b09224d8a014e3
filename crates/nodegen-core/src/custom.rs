//! Staging of hand-written "custom" YAML schemas into nodegen params.
//!
//! A custom schema already names resources and operation ids; the stager only
//! expands field buckets into parameters, collections and request bodies.

use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{ParseError, TransformError};
use crate::ir::{
    BodyContent, BodyGroupName, FieldCollection, FORM_URLENCODED, HttpMethod, MainParams,
    MetaParams, NodegenParams, Operation, OperationParameter, ParameterLocation, RequestBodyGroup,
};
use crate::transform::naming::{escape_text, path_placeholders};

/// Top-level custom schema document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSpec {
    pub meta_params: MetaParams,
    pub main_params: IndexMap<String, Vec<CustomOperation>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOperation {
    pub endpoint: String,
    pub request_method: HttpMethod,
    pub operation_id: String,
    #[serde(default)]
    pub operation_url: Option<String>,
    #[serde(default)]
    pub required_fields: Option<FieldBucket>,
    #[serde(default)]
    pub additional_fields: Option<FieldBucket>,
    #[serde(default)]
    pub filters: Option<FieldBucket>,
    #[serde(default)]
    pub update_fields: Option<FieldBucket>,
}

/// Fields of one bucket, split by where they are sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBucket {
    #[serde(default)]
    pub query_string: IndexMap<String, FieldSpec>,
    #[serde(default)]
    pub request_body: IndexMap<String, FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
}

impl FieldSpec {
    fn description(&self) -> Option<String> {
        let text = open_links_in_new_tab(self.description.as_deref()?);
        escape_text(&text)
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String(self.field_type.clone()));
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        if self.field_type == "options" {
            if let Some(options) = &self.options {
                schema.insert("options".to_string(), options.clone());
            }
        }
        Value::Object(schema)
    }

    fn body_property(&self) -> Value {
        let mut property = self.schema();
        if let (Value::Object(map), Some(description)) = (&mut property, self.description()) {
            map.insert("description".to_string(), Value::String(description));
        }
        property
    }
}

/// Parse and stage a custom YAML schema.
pub fn from_yaml(input: &str) -> Result<NodegenParams, TransformError> {
    let spec: CustomSpec = serde_yaml_ng::from_str(input).map_err(ParseError::from)?;
    stage(spec)
}

/// Stage a parsed custom schema. Resources keep the order of the document.
pub fn stage(spec: CustomSpec) -> Result<NodegenParams, TransformError> {
    let mut main_params: MainParams = IndexMap::with_capacity(spec.main_params.len());

    for (resource, operations) in &spec.main_params {
        let mut staged = Vec::with_capacity(operations.len());
        for operation in operations {
            validate(resource, operation)?;
            staged.push(stage_operation(resource, operation));
        }
        main_params.insert(resource.clone(), staged);
    }

    let mut meta_params = spec.meta_params;
    meta_params.node_color = meta_params.node_color.replace("\\#", "#");

    Ok(NodegenParams {
        meta_params,
        main_params,
    })
}

/// Operations addressing a single entity must carry a route parameter.
fn validate(resource: &str, operation: &CustomOperation) -> Result<(), TransformError> {
    let needs_route_param = match operation.request_method {
        HttpMethod::Get => operation.operation_id != "getAll",
        HttpMethod::Delete | HttpMethod::Patch => true,
        _ => false,
    };
    if needs_route_param && !operation.endpoint.contains('{') {
        return Err(TransformError::Validation(format!(
            "{resource}.{} ({} {}) is missing a route parameter",
            operation.operation_id, operation.request_method, operation.endpoint
        )));
    }
    Ok(())
}

fn stage_operation(resource: &str, input: &CustomOperation) -> Operation {
    let mut operation = Operation::new(&input.endpoint, input.request_method, &input.operation_id);
    operation.description = Some(operation_description(resource, &input.operation_id));
    operation.operation_url = input.operation_url.clone();

    // path params
    let mut parameters: Vec<OperationParameter> = path_placeholders(&input.endpoint)
        .into_iter()
        .map(|name| path_parameter(name, resource, &input.operation_id))
        .collect();

    // qs params (required)
    if let Some(bucket) = &input.required_fields {
        parameters.extend(query_parameters(&bucket.query_string, true));
    }

    // qs params (filters)
    if let Some(bucket) = &input.filters {
        parameters.extend(query_parameters(&bucket.query_string, false));
    }
    operation.parameters = parameters;

    operation.additional_fields = collection(BodyGroupName::AdditionalFields, input.additional_fields.as_ref());
    operation.update_fields = collection(BodyGroupName::UpdateFields, input.update_fields.as_ref());

    // request bodies
    let buckets = [
        (BodyGroupName::Standard, true, &input.required_fields),
        (BodyGroupName::AdditionalFields, false, &input.additional_fields),
        (BodyGroupName::Filters, false, &input.filters),
        (BodyGroupName::UpdateFields, false, &input.update_fields),
    ];
    operation.request_body = buckets
        .into_iter()
        .filter_map(|(name, required, bucket)| {
            body_group(name, required, &bucket.as_ref()?.request_body)
        })
        .collect();

    operation
}

/// `getAll` → `Retrieve all user accounts`, otherwise `Create a user account`.
fn operation_description(resource: &str, operation_id: &str) -> String {
    let spaced = spaced_words(resource);
    if operation_id == "getAll" {
        return format!("Retrieve all {spaced}s");
    }
    let article = if resource.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    };
    format!("{} {article} {spaced}", capitalize(operation_id))
}

fn path_parameter(name: String, resource: &str, operation_id: &str) -> OperationParameter {
    let verb = match operation_id {
        "create" | "update" | "delete" => Some(operation_id),
        "get" => Some("retrieve"),
        _ => None,
    };
    OperationParameter {
        location: ParameterLocation::Path,
        name,
        required: true,
        schema: json!({ "type": "string", "default": "" }),
        description: verb.map(|verb| format!("ID of the {} to {verb}", spaced_words(resource))),
    }
}

fn query_parameters(fields: &IndexMap<String, FieldSpec>, required: bool) -> Vec<OperationParameter> {
    fields
        .iter()
        .map(|(name, field)| OperationParameter {
            location: ParameterLocation::Query,
            name: name.clone(),
            required,
            schema: field.schema(),
            description: field.description(),
        })
        .collect()
}

fn collection(name: BodyGroupName, bucket: Option<&FieldBucket>) -> Option<FieldCollection> {
    let options = query_parameters(&bucket?.query_string, false);
    if options.is_empty() {
        return None;
    }
    Some(FieldCollection::new(name, options))
}

fn body_group(
    name: BodyGroupName,
    required: bool,
    fields: &IndexMap<String, FieldSpec>,
) -> Option<RequestBodyGroup> {
    if fields.is_empty() {
        return None;
    }
    let mut properties: Vec<(String, Value)> = fields
        .iter()
        .map(|(key, field)| (key.clone(), field.body_property()))
        .collect();
    properties.sort_by(|a, b| a.0.cmp(&b.0));
    let properties: Map<String, Value> = properties.into_iter().collect();

    let mut content = IndexMap::new();
    content.insert(
        FORM_URLENCODED.to_string(),
        BodyContent {
            schema: json!({ "type": "object", "properties": properties }),
        },
    );
    Some(RequestBodyGroup {
        name,
        required,
        description: None,
        content,
    })
}

/// `<a href="x">` → `<a href="x" target="_blank">`, first link only.
fn open_links_in_new_tab(description: &str) -> String {
    if description.contains("<a href=") {
        description.replacen("\">", "\" target=\"_blank\">", 1)
    } else {
        description.to_string()
    }
}

fn spaced_words(resource: &str) -> String {
    resource.to_snake_case().replace('_', " ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r##"
metaParams:
  serviceName: Acme
  authType: ApiKey
  nodeColor: \#ff6600
  apiUrl: https://api.acme.test
mainParams:
  userAccount:
    - endpoint: /accounts
      requestMethod: GET
      operationId: getAll
      filters:
        queryString:
          status:
            type: options
            default: active
            options: [active, closed]
    - endpoint: /accounts/{accountId}
      requestMethod: PATCH
      operationId: update
      updateFields:
        queryString:
          notify:
            type: boolean
            default: false
        requestBody:
          nickname:
            type: string
            description: See <a href="https://acme.test/docs">docs</a>
          alias:
            type: string
    - endpoint: /accounts
      requestMethod: POST
      operationId: create
      operationUrl: https://acme.test/docs/create
      requiredFields:
        queryString:
          region:
            type: string
            default: eu
        requestBody:
          name:
            type: string
            default: ""
      additionalFields:
        queryString:
          trace:
            type: boolean
  item:
    - endpoint: /items/{itemId}
      requestMethod: GET
      operationId: get
"##;

    fn staged() -> NodegenParams {
        from_yaml(SCHEMA).unwrap()
    }

    #[test]
    fn test_meta_params_unescaped() {
        let params = staged();
        assert_eq!(params.meta_params.node_color, "#ff6600");
        assert_eq!(params.meta_params.service_name, "Acme");
        assert_eq!(params.meta_params.api_url, "https://api.acme.test");
    }

    #[test]
    fn test_resources_keep_document_order() {
        let params = staged();
        let names: Vec<&str> = params.resource_names().collect();
        assert_eq!(names, vec!["userAccount", "item"]);
    }

    #[test]
    fn test_article_follows_first_letter() {
        assert_eq!(operation_description("item", "delete"), "Delete an item");
        assert_eq!(operation_description("widget", "create"), "Create a widget");
        assert_eq!(operation_description("userAccount", "update"), "Update an user account");
    }

    #[test]
    fn test_descriptions() {
        let params = staged();
        let get_all = params.find_operation("userAccount", "getAll").unwrap();
        assert_eq!(get_all.description.as_deref(), Some("Retrieve all user accounts"));
        let create = params.find_operation("userAccount", "create").unwrap();
        assert_eq!(create.description.as_deref(), Some("Create an user account"));
        let get = params.find_operation("item", "get").unwrap();
        assert_eq!(get.description.as_deref(), Some("Get an item"));
        assert_eq!(get.parameters[0].description.as_deref(), Some("ID of the item to retrieve"));
    }

    #[test]
    fn test_filters_become_optional_query_params() {
        let params = staged();
        let get_all = params.find_operation("userAccount", "getAll").unwrap();
        assert_eq!(get_all.parameters.len(), 1);
        let status = &get_all.parameters[0];
        assert_eq!(status.location, ParameterLocation::Query);
        assert!(!status.required);
        assert_eq!(
            status.schema,
            json!({ "type": "options", "default": "active", "options": ["active", "closed"] })
        );
    }

    #[test]
    fn test_update_fields_collection_and_body() {
        let params = staged();
        let update = params.find_operation("userAccount", "update").unwrap();

        assert_eq!(update.parameters[0].name, "accountId");
        assert_eq!(
            update.parameters[0].description.as_deref(),
            Some("ID of the user account to update")
        );

        let fields = update.update_fields.as_ref().unwrap();
        assert_eq!(fields.name, BodyGroupName::UpdateFields);
        assert_eq!(fields.field_type, "collection");
        assert_eq!(fields.options[0].name, "notify");

        let body = update.body_group(BodyGroupName::UpdateFields).unwrap();
        assert!(!body.required);
        assert_eq!(body.property_names(), vec!["alias", "nickname"]);
        let nickname = &body.content[FORM_URLENCODED].schema["properties"]["nickname"];
        assert_eq!(
            nickname["description"],
            "See <a href=\"https://acme.test/docs\" target=\"_blank\">docs</a>"
        );
    }

    #[test]
    fn test_required_fields() {
        let params = staged();
        let create = params.find_operation("userAccount", "create").unwrap();
        assert_eq!(create.operation_url.as_deref(), Some("https://acme.test/docs/create"));

        let region = &create.parameters[0];
        assert_eq!(region.name, "region");
        assert!(region.required);

        let standard = create.body_group(BodyGroupName::Standard).unwrap();
        assert!(standard.required);
        assert_eq!(standard.property_names(), vec!["name"]);

        let additional = create.additional_fields.as_ref().unwrap();
        assert_eq!(additional.options[0].name, "trace");
        assert!(create.body_group(BodyGroupName::AdditionalFields).is_none());
    }

    #[test]
    fn test_missing_route_param_rejected() {
        let yaml = r##"
metaParams: { serviceName: Acme, authType: None, nodeColor: "#fff" }
mainParams:
  item:
    - { endpoint: /items, requestMethod: DELETE, operationId: delete }
"##;
        let err = from_yaml(yaml).unwrap_err();
        assert!(matches!(err, TransformError::Validation(_)));
        assert!(err.to_string().contains("item.delete"));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = from_yaml("mainParams: [").unwrap_err();
        assert!(matches!(err, TransformError::Parse(ParseError::Yaml(_))));
    }
}
