use serde_json::{Map, Value};

use crate::ir::HttpMethod;

use super::naming::{camel_case, escape_text};

/// Rewrite a schema into the shape the plugin templates expect:
///
/// - property names become lowerCamelCase (the `required` list follows along);
/// - `enum` becomes `type: "options"` with an `options` list;
/// - properties whose `readOnly`/`writeOnly` flag contradicts the direction of
///   the operation are dropped;
/// - descriptions are whitespace-normalized and quote-escaped;
/// - properties are sorted by name.
///
/// Applies recursively to nested properties and array items.
pub fn sanitize_schema(schema: &Value, method: HttpMethod) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };
    let mut out = map.clone();

    rewrite_enum(&mut out);

    match out.get("description").and_then(Value::as_str).map(escape_text) {
        Some(Some(escaped)) => {
            out.insert("description".to_string(), Value::String(escaped));
        }
        Some(None) => {
            out.remove("description");
        }
        None => {}
    }

    if let Some(Value::Object(props)) = map.get("properties") {
        let mut renamed: Vec<(String, Value)> = Vec::with_capacity(props.len());
        for (name, prop) in props {
            if !is_visible(prop, method) {
                log::debug!("dropping property {name}: not applicable to {method}");
                continue;
            }
            let new_name = camel_case(name);
            if renamed.iter().any(|(existing, _)| *existing == new_name) {
                log::warn!("property {name} collides with {new_name} after renaming, keeping the later one");
                renamed.retain(|(existing, _)| *existing != new_name);
            }
            renamed.push((new_name, sanitize_schema(prop, method)));
        }
        renamed.sort_by(|a, b| a.0.cmp(&b.0));
        out.insert(
            "properties".to_string(),
            Value::Object(renamed.into_iter().collect()),
        );
    }

    if let Some(Value::Array(required)) = map.get("required") {
        let required: Vec<Value> = required
            .iter()
            .filter_map(Value::as_str)
            .map(|name| Value::String(camel_case(name)))
            .collect();
        out.insert("required".to_string(), Value::Array(required));
    }

    if let Some(items) = map.get("items") {
        out.insert("items".to_string(), sanitize_schema(items, method));
    }

    Value::Object(out)
}

/// `enum: [..]` → `type: "options", options: [..]`.
pub fn rewrite_enum(schema: &mut Map<String, Value>) {
    if let Some(values) = schema.remove("enum") {
        schema.insert("type".to_string(), Value::String("options".to_string()));
        schema.insert("options".to_string(), values);
    }
}

/// `readOnly` fields only make sense on GET, `writeOnly` fields everywhere else.
fn is_visible(prop: &Value, method: HttpMethod) -> bool {
    let flag = |key: &str| prop.get(key).and_then(Value::as_bool).unwrap_or(false);
    if method == HttpMethod::Get {
        !flag("writeOnly")
    } else {
        !flag("readOnly")
    }
}

/// Partition the properties of a sanitized object schema by its `required` list.
/// Returns `(required, optional)`.
pub fn split_required(schema: &Value) -> (Map<String, Value>, Map<String, Value>) {
    let required_names: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut required = Map::new();
    let mut optional = Map::new();
    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            if required_names.contains(&name.as_str()) {
                required.insert(name.clone(), prop.clone());
            } else {
                optional.insert(name.clone(), prop.clone());
            }
        }
    }
    (required, optional)
}
