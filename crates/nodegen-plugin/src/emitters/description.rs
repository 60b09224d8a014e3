//! `descriptions/<Resource>Description.ts`: the operation selector and the
//! fields of one resource.

use minijinja::context;
use nodegen_core::GeneratorError;
use nodegen_core::ir::{NodegenParams, Operation};

use super::dividers::description_divider;
use super::fields::{operation_fields, operation_options};
use super::imports::description_module;
use super::{Lines, render};
use crate::helper::{operation_value, variable_name};

pub fn emit_resource_description(
    resource: &str,
    operations: &[Operation],
) -> Result<String, GeneratorError> {
    let default_operation = operations
        .iter()
        .map(|op| op.operation_id.as_str())
        .min()
        .ok_or_else(|| GeneratorError::MissingValue(format!("operations of resource `{resource}`")))?;

    let mut options = Lines::new(3);
    operation_options(&mut options, operations);

    let field_blocks: Vec<String> = operations
        .iter()
        .map(|operation| {
            let mut lines = Lines::new(1);
            lines.block(&description_divider(resource, &operation.operation_id));
            operation_fields(&mut lines, resource, operation);
            lines.finish()
        })
        .collect();

    render(
        "description.ts.j2",
        include_str!("../../templates/description.ts.j2"),
        context! {
            resource => resource,
            var => variable_name(resource),
            operation_options => options.finish(),
            default_operation => operation_value(default_operation),
            field_blocks => field_blocks,
        },
    )
}

/// `descriptions/index.ts` re-exporting every resource module.
pub fn emit_description_index(params: &NodegenParams) -> String {
    let mut out = String::new();
    for resource in params.resource_names() {
        out.push_str(&format!("export * from './{}';\n", description_module(resource)));
    }
    out
}

#[cfg(test)]
mod tests {
    use nodegen_core::ir::{HttpMethod, OperationParameter, ParameterLocation};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resource_description() {
        let mut get = Operation::new("/widgets/{id}", HttpMethod::Get, "get");
        get.parameters.push(OperationParameter {
            location: ParameterLocation::Path,
            name: "id".to_string(),
            required: true,
            schema: json!({"type": "string"}),
            description: Some("ID of the widget".to_string()),
        });
        let get_all = Operation::new("/widgets", HttpMethod::Get, "getAll");

        let out = emit_resource_description("widget", &[get, get_all]).unwrap();
        assert!(out.starts_with("import type { INodeProperties } from 'n8n-workflow';"));
        assert!(out.contains("export const widgetOperations: INodeProperties[] = ["));
        assert!(out.contains("\t\t\t{\n\t\t\t\tname: 'Get',\n\t\t\t\tvalue: 'get',"));
        assert!(out.contains("\t\tdefault: 'get',"));
        assert!(out.contains("export const widgetFields: INodeProperties[] = ["));
        assert!(out.contains("\t\tdescription: 'ID of the widget',"));
        assert!(out.contains("\t\tname: 'returnAll',"));
        assert!(out.contains(&format!("\t// {}widget: getAll", " ".repeat(10))));
    }

    #[test]
    fn test_resource_without_operations() {
        let err = emit_resource_description("widget", &[]).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingValue(_)));
    }
}
