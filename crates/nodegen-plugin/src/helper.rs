use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase, ToTitleCase};
use nodegen_core::ir::AuthType;
use serde_json::Value;

/// UI field type for a schema.
///
/// - `integer` → `number`
/// - `date-time` format, or a name containing the word `date` → `dateTime`
/// - object with properties → `collection` for the synthetic `query`
///   parameter, `fixedCollection` otherwise
/// - object without properties → `json`
/// - array → type of its items
pub fn adjust_type(schema: &Value, name: &str) -> String {
    let schema_type = schema.get("type").and_then(Value::as_str).unwrap_or("string");
    let has_properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|p| !p.is_empty());

    if schema_type == "integer" {
        return "number".to_string();
    }
    if schema.get("format").and_then(Value::as_str) == Some("date-time") || names_a_date(name) {
        return "dateTime".to_string();
    }
    match schema_type {
        "object" if has_properties && name == "query" => "collection".to_string(),
        "object" if has_properties => "fixedCollection".to_string(),
        "object" => "json".to_string(),
        "array" => match schema.get("items") {
            Some(items) if items.get("type").is_some() => adjust_type(items, name),
            _ => "string".to_string(),
        },
        other => other.to_string(),
    }
}

fn names_a_date(name: &str) -> bool {
    name.to_snake_case().split('_').any(|word| word == "date")
}

/// TypeScript literal of a field's default value.
pub fn default_value(schema: &Value) -> String {
    let schema_type = schema.get("type").and_then(Value::as_str).unwrap_or("string");

    match schema.get("default") {
        Some(Value::Bool(b)) => return b.to_string(),
        Some(Value::Number(n)) => return n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => {
            return match schema_type {
                // string defaults on numeric fields are invalid input
                "number" | "integer" => "0".to_string(),
                _ => quote(s),
            };
        }
        _ => {}
    }

    match schema_type {
        "number" | "integer" => "0".to_string(),
        "boolean" => "false".to_string(),
        "options" => schema
            .get("options")
            .and_then(Value::as_array)
            .and_then(|options| options.first())
            .map(literal)
            .unwrap_or_else(|| "''".to_string()),
        "object" if schema.get("properties").is_some() => "{}".to_string(),
        "array" => "[]".to_string(),
        _ => "''".to_string(),
    }
}

/// A JSON scalar as a TypeScript literal.
pub fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Single-quote a string for TypeScript.
///
/// A backslash and the character after it are kept as one escape sequence,
/// so text already escaped upstream passes through unchanged. A trailing lone
/// backslash is doubled, bare quotes and line breaks are escaped.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            },
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Display name of a field: `user_id` → `User ID`, `ANIMAL.TYPE` → `Animal Type`.
pub fn title_case(name: &str) -> String {
    let mut base = name.replace(['.', '_'], " ").trim().to_string();
    if base.to_uppercase() == base {
        base = base.to_lowercase();
    }
    base.to_title_case()
        .split(' ')
        .map(|word| if word == "Id" { "ID" } else { word })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of the collection nested in a fixed collection: `owner` → `ownerFields`,
/// `owner_info` → `owner_info_fields`.
pub fn add_fields_suffix(key: &str) -> String {
    if key.contains('_') {
        format!("{key}_fields")
    } else {
        format!("{key}Fields")
    }
}

/// `/users/{user_id}/orders` → `/users/${userId}/orders`, matching the
/// variables the api call declares for path parameters.
pub fn to_template_literal(endpoint: &str) -> String {
    let mut out = String::with_capacity(endpoint.len() + 8);
    let mut rest = endpoint;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                out.push_str("${");
                out.push_str(&variable_name(&after[..end]));
                out.push('}');
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Name of the TypeScript variable holding a parameter.
pub fn variable_name(name: &str) -> String {
    let camel = name.to_lower_camel_case();
    if camel.is_empty() { name.to_string() } else { camel }
}

/// Credential type the node requests: `widgetStoreOAuth2Api`, `widgetStoreApi`.
pub fn credentials_name(service_name: &str, auth_type: AuthType) -> String {
    let suffix = match auth_type {
        AuthType::OAuth2 => "OAuth2Api",
        _ => "Api",
    };
    format!("{}{suffix}", service_name.to_lower_camel_case())
}

/// Name of the request helper in `GenericFunctions.ts`.
pub fn api_request_name(service_name: &str) -> String {
    format!("{}ApiRequest", service_name.to_lower_camel_case())
}

/// Name of the pagination helper in `GenericFunctions.ts`.
pub fn api_request_all_items_name(service_name: &str) -> String {
    format!("{}AllItems", api_request_name(service_name))
}

/// Class and file name of the node: `Widget Store` → `WidgetStore`.
pub fn node_class_name(service_name: &str) -> String {
    service_name.to_pascal_case()
}

/// Value of an operation in the node's `operation` selector.
pub fn operation_value(operation_id: &str) -> String {
    operation_id.to_lower_camel_case()
}

/// Label of an operation in the node's `operation` selector: `getAll` → `Get All`.
pub fn operation_name(operation_id: &str) -> String {
    operation_id.to_title_case()
}

pub fn placeholder(collection: &str) -> &'static str {
    if collection == "Filters" {
        "Add Filter"
    } else {
        "Add Field"
    }
}

pub fn has_min_max(schema: &Value) -> bool {
    schema.get("minimum").is_some() && schema.get("maximum").is_some()
}
