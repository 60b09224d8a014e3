//! Field definitions (`INodeProperties`) of the resource description files.

use indexmap::IndexMap;
use nodegen_core::ir::{BodyGroupName, Operation, OperationParameter};
use serde_json::{Map, Value};

use super::Lines;
use crate::helper::{
    add_fields_suffix, adjust_type, default_value, has_min_max, literal, operation_name,
    operation_value, placeholder, quote, title_case, variable_name,
};

/// Resource and operation a field is shown for.
#[derive(Debug, Clone)]
pub struct Show<'a> {
    pub resource: &'a str,
    pub operation: String,
}

impl<'a> Show<'a> {
    pub fn new(resource: &'a str, operation_id: &str) -> Self {
        Self {
            resource,
            operation: operation_value(operation_id),
        }
    }

    fn push(&self, lines: &mut Lines, return_all: Option<bool>) {
        lines.open("displayOptions: {");
        lines.open("show: {");
        lines.line(format!("resource: ['{}'],", self.resource));
        lines.line(format!("operation: ['{}'],", self.operation));
        if let Some(flag) = return_all {
            lines.line(format!("returnAll: [{flag}],"));
        }
        lines.close("},");
        lines.close("},");
    }
}

/// Entries of the `operation` selector, alphabetized by operation id.
pub fn operation_options(lines: &mut Lines, operations: &[Operation]) {
    let mut sorted: Vec<&Operation> = operations.iter().collect();
    sorted.sort_by(|a, b| a.operation_id.cmp(&b.operation_id));

    for operation in sorted {
        lines.open("{");
        lines.line(format!("name: '{}',", operation_name(&operation.operation_id)));
        lines.line(format!("value: '{}',", operation_value(&operation.operation_id)));
        if let Some(description) = &operation.description {
            lines.line(format!("description: {},", quote(description)));
        }
        if let Some(summary) = &operation.summary {
            lines.line(format!("action: {},", quote(summary)));
        }
        lines.close("},");
    }
}

/// Every field of one operation: parameters, `returnAll`/`limit` for `getAll`,
/// required body properties, then one collection per optional group.
pub fn operation_fields(lines: &mut Lines, resource: &str, operation: &Operation) {
    let show = Show::new(resource, &operation.operation_id);

    for param in &operation.parameters {
        field(lines, &param.name, &parameter_schema(param), param.required, Some(&show));
    }

    if operation.operation_id == "getAll" {
        get_all_additions(lines, &show);
    }

    if let Some(standard) = operation.body_group(BodyGroupName::Standard) {
        for (name, schema) in group_properties(standard.content.values().map(|c| &c.schema)) {
            field(lines, &name, &schema, true, Some(&show));
        }
    }

    for (name, options) in collections(operation) {
        collection(lines, name, &options, &show);
    }
}

/// Optional groups of an operation keyed by their UI collection, merging the
/// query-string collections of custom schemas with same-named body groups.
pub fn collections(operation: &Operation) -> IndexMap<BodyGroupName, Vec<(String, Value)>> {
    let mut out: IndexMap<BodyGroupName, Vec<(String, Value)>> = IndexMap::new();

    for group in &operation.request_body {
        if group.name == BodyGroupName::Standard {
            continue;
        }
        let entry = out.entry(group.name).or_default();
        for (name, schema) in group_properties(group.content.values().map(|c| &c.schema)) {
            push_unique(entry, name, schema);
        }
    }

    for fields in [&operation.additional_fields, &operation.update_fields]
        .into_iter()
        .flatten()
    {
        let entry = out.entry(fields.name).or_default();
        for option in &fields.options {
            push_unique(entry, option.name.clone(), parameter_schema(option));
        }
    }

    for entry in out.values_mut() {
        entry.sort_by(|a, b| a.0.cmp(&b.0));
    }
    out
}

fn push_unique(entry: &mut Vec<(String, Value)>, name: String, schema: Value) {
    if !entry.iter().any(|(existing, _)| *existing == name) {
        entry.push((name, schema));
    }
}

/// Properties across the content types of a body group; the first content
/// type declaring a name wins.
fn group_properties<'a>(schemas: impl Iterator<Item = &'a Value>) -> Vec<(String, Value)> {
    let mut out: Vec<(String, Value)> = Vec::new();
    for schema in schemas {
        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            for (name, prop) in props {
                push_unique(&mut out, name.clone(), prop.clone());
            }
        }
    }
    out
}

/// The parameter schema with the parameter's own description folded in.
fn parameter_schema(param: &OperationParameter) -> Value {
    let mut schema = match &param.schema {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    if let Some(description) = &param.description {
        schema.insert("description".to_string(), Value::String(description.clone()));
    }
    Value::Object(schema)
}

/// One field definition; objects with properties recurse into fixed collections.
pub fn field(lines: &mut Lines, key: &str, schema: &Value, required: bool, show: Option<&Show>) {
    let field_type = adjust_type(schema, key);
    let description = schema.get("description").and_then(Value::as_str);
    let properties = schema.get("properties").and_then(Value::as_object);

    lines.open("{");
    lines.line(format!("displayName: '{}',", title_case(key)));
    lines.line(format!("name: '{key}',"));

    match (field_type.as_str(), properties) {
        ("fixedCollection", Some(props)) => {
            lines.line(format!("placeholder: 'Add {} Field',", title_case(key)));
            lines.line("type: 'fixedCollection',");
            lines.line("default: {},");
            push_common(lines, required, description, show);
            lines.open("options: [");
            lines.open("{");
            lines.line(format!("displayName: '{} Fields',", title_case(key)));
            lines.line(format!("name: '{}',", add_fields_suffix(key)));
            lines.open("values: [");
            for (sub_key, sub_schema) in props {
                field(lines, sub_key, sub_schema, false, None);
            }
            lines.close("],");
            lines.close("},");
            lines.close("],");
        }
        ("collection", Some(props)) => {
            lines.line(format!("placeholder: '{}',", placeholder(key)));
            lines.line("type: 'collection',");
            lines.line("default: {},");
            push_common(lines, required, description, show);
            lines.open("options: [");
            for (sub_key, sub_schema) in props {
                field(lines, sub_key, sub_schema, false, None);
            }
            lines.close("],");
        }
        (field_type, _) => {
            lines.line(format!("type: '{field_type}',"));
            push_type_options(lines, schema);
            if field_type == "options" {
                push_options(lines, schema);
            }
            lines.line(format!("default: {},", default_value(schema)));
            push_common(lines, required, description, show);
        }
    }

    lines.close("},");
}

fn push_common(lines: &mut Lines, required: bool, description: Option<&str>, show: Option<&Show>) {
    if required {
        lines.line("required: true,");
    }
    if let Some(description) = description {
        lines.line(format!("description: {},", quote(description)));
    }
    if let Some(show) = show {
        show.push(lines, None);
    }
}

fn push_type_options(lines: &mut Lines, schema: &Value) {
    let is_array = schema.get("type").and_then(Value::as_str) == Some("array");
    if !has_min_max(schema) && !is_array {
        return;
    }
    lines.open("typeOptions: {");
    if has_min_max(schema) {
        lines.line(format!("minValue: {},", schema["minimum"]));
        lines.line(format!("maxValue: {},", schema["maximum"]));
    }
    if is_array {
        lines.line("multipleValues: true,");
    }
    lines.close("},");
}

fn push_options(lines: &mut Lines, schema: &Value) {
    let Some(options) = schema.get("options").and_then(Value::as_array) else {
        return;
    };
    lines.open("options: [");
    for option in options {
        let label = match option {
            Value::String(s) => title_case(s),
            other => other.to_string(),
        };
        lines.open("{");
        lines.line(format!("name: '{label}',"));
        lines.line(format!("value: {},", literal(option)));
        lines.close("},");
    }
    lines.close("],");
}

/// A UI collection (`Additional Fields`, `Update Fields`, `Filters`).
pub fn collection(lines: &mut Lines, name: BodyGroupName, options: &[(String, Value)], show: &Show) {
    lines.open("{");
    lines.line(format!("displayName: '{name}',"));
    lines.line(format!("name: '{}',", variable_name(name.as_str())));
    lines.line("type: 'collection',");
    lines.line(format!("placeholder: '{}',", placeholder(name.as_str())));
    lines.line("default: {},");
    show.push(lines, None);
    lines.open("options: [");
    for (key, schema) in options {
        field(lines, key, schema, false, None);
    }
    lines.close("],");
    lines.close("},");
}

/// `returnAll` and `limit` fields of a `getAll` operation.
pub fn get_all_additions(lines: &mut Lines, show: &Show) {
    lines.open("{");
    lines.line("displayName: 'Return All',");
    lines.line("name: 'returnAll',");
    lines.line("type: 'boolean',");
    lines.line("default: false,");
    lines.line("description: 'Whether to return all results or only up to a given limit',");
    show.push(lines, None);
    lines.close("},");

    lines.open("{");
    lines.line("displayName: 'Limit',");
    lines.line("name: 'limit',");
    lines.line("type: 'number',");
    lines.line("default: 50,");
    lines.line("description: 'Max number of results to return',");
    lines.open("typeOptions: {");
    lines.line("minValue: 1,");
    lines.close("},");
    show.push(lines, Some(false));
    lines.close("},");
}
