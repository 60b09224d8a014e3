use serde_json::{Map, Value, json};

use crate::ir::{OperationParameter, ParameterLocation};
use crate::parse::parameter::{Parameter, ParameterLocation as SpecLocation};

use super::context::OperationContext;
use super::fields::sanitize_schema;
use super::naming::{escape_text, path_placeholders};
use super::schema_merge::resolve_composition;

/// Name of the synthetic object collecting every optional query parameter.
pub const QUERY_OBJECT_NAME: &str = "query";

/// Build the parameter list of an operation: path parameters in placeholder
/// order, then required query parameters, then the synthetic `query` object.
pub fn normalize_parameters(ctx: &OperationContext<'_>) -> Vec<OperationParameter> {
    let declared = effective_parameters(ctx);

    let mut out = path_parameters(ctx, &declared);

    let mut optional: Vec<&Parameter> = Vec::new();
    for param in &declared {
        match param.location {
            SpecLocation::Path => {}
            SpecLocation::Query if param.required => out.push(OperationParameter {
                location: ParameterLocation::Query,
                name: param.name.clone(),
                required: true,
                schema: parameter_schema(param, ctx),
                description: param.description.as_deref().and_then(escape_text),
            }),
            SpecLocation::Query => optional.push(param),
            SpecLocation::Header | SpecLocation::Cookie => {
                log::debug!(
                    "{} {}: ignoring {:?} parameter {}",
                    ctx.method,
                    ctx.endpoint,
                    param.location,
                    param.name
                );
            }
        }
    }

    if !optional.is_empty() {
        out.push(query_object(&optional, ctx));
    }
    out
}

/// Path-level parameters overridden by operation-level ones with the same
/// `(name, in)`, in declaration order.
fn effective_parameters<'a>(ctx: &OperationContext<'a>) -> Vec<&'a Parameter> {
    let own = &ctx.operation.parameters;
    let mut params: Vec<&'a Parameter> = ctx
        .path_item
        .parameters
        .iter()
        .filter(|shared| {
            !own.iter()
                .any(|p| p.name == shared.name && p.location == shared.location)
        })
        .collect();
    params.extend(own.iter());
    params
}

/// One required parameter per `{placeholder}`; declared path parameters that
/// match no placeholder are dropped.
fn path_parameters(ctx: &OperationContext<'_>, declared: &[&Parameter]) -> Vec<OperationParameter> {
    let placeholders = path_placeholders(ctx.endpoint);

    for param in declared {
        if param.location == SpecLocation::Path && !placeholders.contains(&param.name) {
            log::warn!(
                "{} {}: path parameter {} has no placeholder, dropping it",
                ctx.method,
                ctx.endpoint,
                param.name
            );
        }
    }

    placeholders
        .into_iter()
        .map(|name| {
            let found = declared
                .iter()
                .find(|p| p.location == SpecLocation::Path && p.name == name);
            match found {
                Some(param) => OperationParameter {
                    location: ParameterLocation::Path,
                    schema: parameter_schema(param, ctx),
                    description: param.description.as_deref().and_then(escape_text),
                    name,
                    required: true,
                },
                None => {
                    log::debug!(
                        "{} {}: synthesizing undeclared path parameter {name}",
                        ctx.method,
                        ctx.endpoint
                    );
                    OperationParameter {
                        location: ParameterLocation::Path,
                        name,
                        required: true,
                        schema: json!({ "type": "string" }),
                        description: None,
                    }
                }
            }
        })
        .collect()
}

fn parameter_schema(param: &Parameter, ctx: &OperationContext<'_>) -> Value {
    match &param.schema {
        Some(schema) => sanitize_schema(&resolve_composition(schema), ctx.method),
        None => json!({ "type": "string" }),
    }
}

/// Merge optional query parameters into one object parameter. Properties keep
/// their wire names since they are sent verbatim in the query string.
fn query_object(params: &[&Parameter], ctx: &OperationContext<'_>) -> OperationParameter {
    let mut entries: Vec<(String, Value)> = params
        .iter()
        .map(|param| {
            let mut schema = parameter_schema(param, ctx);
            if let (Value::Object(map), Some(text)) = (
                &mut schema,
                param.description.as_deref().and_then(escape_text),
            ) {
                map.insert("description".to_string(), Value::String(text));
            }
            (param.name.clone(), schema)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.dedup_by(|a, b| a.0 == b.0);

    let properties: Map<String, Value> = entries.into_iter().collect();
    OperationParameter {
        location: ParameterLocation::Query,
        name: QUERY_OBJECT_NAME.to_string(),
        required: false,
        schema: json!({ "type": "object", "properties": properties }),
        description: None,
    }
}
