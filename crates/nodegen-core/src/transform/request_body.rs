use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::ir::{BodyContent, BodyGroupName, RequestBodyGroup, BODY_CONTENT_TYPES, TEXT_PLAIN};
use crate::parse::request_body::RequestBody;

use super::context::OperationContext;
use super::fields::{sanitize_schema, split_required};
use super::naming::{camel_case, escape_text};
use super::schema_merge::resolve_composition;

const DEFAULT_TEXT_PROPERTY: &str = "text";

/// Split a request body into the `Standard` descriptor (required properties)
/// and the `Additional Fields` / `Update Fields` descriptor (the rest).
///
/// Content types without properties in a descriptor are left out, and so are
/// descriptors without content types.
pub fn normalize_request_body(ctx: &OperationContext<'_>, body: &RequestBody) -> Vec<RequestBodyGroup> {
    let mut standard: IndexMap<String, BodyContent> = IndexMap::new();
    let mut extra: IndexMap<String, BodyContent> = IndexMap::new();

    for content_type in BODY_CONTENT_TYPES {
        let Some(media) = body.content.get(content_type) else {
            continue;
        };

        let (required, optional) = if content_type == TEXT_PLAIN {
            text_plain_properties(body)
        } else {
            let Some(schema) = &media.schema else {
                continue;
            };
            let schema = sanitize_schema(&resolve_composition(schema), ctx.method);
            split_required(&schema)
        };

        if !required.is_empty() {
            standard.insert(content_type.to_string(), object_content(required, true));
        }
        if !optional.is_empty() {
            extra.insert(content_type.to_string(), object_content(optional, false));
        }
    }

    for content_type in body.content.keys() {
        if !BODY_CONTENT_TYPES.contains(&content_type.as_str()) {
            log::debug!(
                "{} {}: ignoring {content_type} request body",
                ctx.method,
                ctx.endpoint
            );
        }
    }

    let description = body.description.as_deref().and_then(escape_text);
    let extra_name = if ctx.method.is_update() {
        BodyGroupName::UpdateFields
    } else {
        BodyGroupName::AdditionalFields
    };

    let mut groups = Vec::with_capacity(2);
    if !standard.is_empty() {
        groups.push(RequestBodyGroup {
            name: BodyGroupName::Standard,
            required: body.required,
            description: description.clone(),
            content: standard,
        });
    }
    if !extra.is_empty() {
        groups.push(RequestBodyGroup {
            name: extra_name,
            required: false,
            description,
            content: extra,
        });
    }
    groups
}

/// A plain-text body is a single string property named after the first word
/// of the body description.
fn text_plain_properties(body: &RequestBody) -> (Map<String, Value>, Map<String, Value>) {
    let name = body
        .description
        .as_deref()
        .and_then(|d| d.split_whitespace().next())
        .map(|word| camel_case(&word.to_lowercase()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TEXT_PROPERTY.to_string());

    let mut props = Map::new();
    props.insert(name, json!({ "type": "string" }));
    if body.required {
        (props, Map::new())
    } else {
        (Map::new(), props)
    }
}

fn object_content(properties: Map<String, Value>, required: bool) -> BodyContent {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    if required {
        let names: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
        schema.insert("required".to_string(), Value::Array(names));
    }
    schema.insert("properties".to_string(), Value::Object(properties));
    BodyContent {
        schema: Value::Object(schema),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{APPLICATION_JSON, FORM_URLENCODED, HttpMethod};
    use crate::parse::operation::{Operation, PathItem};

    fn body(value: Value) -> RequestBody {
        serde_json::from_value(value).unwrap()
    }

    fn run(method: HttpMethod, body: &RequestBody) -> Vec<RequestBodyGroup> {
        let item = PathItem::default();
        let op: Operation = serde_json::from_value(json!({})).unwrap();
        let ctx = OperationContext {
            endpoint: "/widgets",
            method,
            resource: "widget",
            path_item: &item,
            operation: &op,
        };
        normalize_request_body(&ctx, body)
    }

    fn widget_body() -> RequestBody {
        body(json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string" },
                            "color": { "type": "string", "enum": ["red", "blue"] }
                        }
                    }
                }
            }
        }))
    }

    #[test]
    fn test_required_optional_split() {
        let groups = run(HttpMethod::Post, &widget_body());
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].name, BodyGroupName::Standard);
        assert!(groups[0].required);
        assert_eq!(groups[0].property_names(), vec!["name"]);
        assert_eq!(
            groups[0].content[APPLICATION_JSON].schema["required"],
            json!(["name"])
        );

        assert_eq!(groups[1].name, BodyGroupName::AdditionalFields);
        assert!(!groups[1].required);
        assert_eq!(groups[1].property_names(), vec!["color"]);
        assert_eq!(
            groups[1].content[APPLICATION_JSON].schema["properties"]["color"]["type"],
            "options"
        );
    }

    #[test]
    fn test_update_fields_for_patch() {
        let groups = run(HttpMethod::Patch, &widget_body());
        assert_eq!(groups[1].name, BodyGroupName::UpdateFields);
    }

    #[test]
    fn test_empty_groups_omitted() {
        let all_optional = body(json!({
            "content": {
                "application/x-www-form-urlencoded": {
                    "schema": { "type": "object", "properties": { "note": { "type": "string" } } }
                },
                "application/xml": { "schema": { "type": "object" } }
            }
        }));
        let groups = run(HttpMethod::Post, &all_optional);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, BodyGroupName::AdditionalFields);
        assert_eq!(groups[0].content.keys().collect::<Vec<_>>(), vec![FORM_URLENCODED]);

        let no_props = body(json!({ "content": { "application/json": { "schema": { "type": "object" } } } }));
        assert!(run(HttpMethod::Post, &no_props).is_empty());
    }

    #[test]
    fn test_text_plain_property() {
        let required = body(json!({
            "description": "Message to post",
            "required": true,
            "content": { "text/plain": { "schema": { "type": "string" } } }
        }));
        let groups = run(HttpMethod::Post, &required);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].property_names(), vec!["message"]);
        assert_eq!(groups[0].description.as_deref(), Some("Message to post"));

        let anonymous = body(json!({ "content": { "text/plain": {} } }));
        let groups = run(HttpMethod::Post, &anonymous);
        assert_eq!(groups[0].name, BodyGroupName::AdditionalFields);
        assert_eq!(groups[0].property_names(), vec!["text"]);
    }

    #[test]
    fn test_all_of_body_merged_before_split() {
        let merged = body(json!({
            "content": {
                "application/json": {
                    "schema": {
                        "allOf": [
                            { "type": "object", "required": ["id"], "properties": { "id": { "type": "string" } } },
                            { "properties": { "tags": { "type": "array" } } }
                        ]
                    }
                }
            }
        }));
        let groups = run(HttpMethod::Post, &merged);
        assert_eq!(groups[0].property_names(), vec!["id"]);
        assert_eq!(groups[1].property_names(), vec!["tags"]);
    }
}
