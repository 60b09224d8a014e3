use serde_json::{Map, Value};

/// Resolve `allOf` / `anyOf` / `oneOf` throughout a schema, bottom-up.
///
/// - `allOf`: every sub-schema is deep-merged into one object (see [`deep_merge`]),
///   then the keys next to `allOf` are merged on top.
/// - `oneOf` / `anyOf`: only the first variant survives; sibling keys such as
///   `description` are kept on top of it.
///
/// Nested unions inside `properties` and `items` are resolved before their parent.
pub fn resolve_composition(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    for key in ["oneOf", "anyOf"] {
        if let Some(first) = map.get(key).and_then(Value::as_array).and_then(|v| v.first()) {
            let mut resolved = resolve_composition(first);
            deep_merge(&mut resolved, resolve_composition(&without(map, key)));
            return resolved;
        }
    }

    if let Some(Value::Array(parts)) = map.get("allOf") {
        let mut merged = Value::Object(Map::new());
        for part in parts {
            deep_merge(&mut merged, resolve_composition(part));
        }
        deep_merge(&mut merged, resolve_composition(&without(map, "allOf")));
        return merged;
    }

    let mut resolved = map.clone();
    if let Some(Value::Object(props)) = map.get("properties") {
        let props = props
            .iter()
            .map(|(name, prop)| (name.clone(), resolve_composition(prop)))
            .collect();
        resolved.insert("properties".to_string(), Value::Object(props));
    }
    if let Some(items) = map.get("items") {
        let items = match items {
            Value::Array(list) => Value::Array(list.iter().map(resolve_composition).collect()),
            single => resolve_composition(single),
        };
        resolved.insert("items".to_string(), items);
    }
    Value::Object(resolved)
}

/// Merge `source` into `target`: objects merge key by key, arrays on the same
/// key are concatenated, anything else is overwritten by `source`.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => target.extend(source),
        (target, source) => *target = source,
    }
}

fn without(map: &Map<String, Value>, key: &str) -> Value {
    let mut rest = map.clone();
    rest.remove(key);
    Value::Object(rest)
}
