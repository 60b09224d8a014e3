//! `<Service>.node.ts`: node description plus the `execute` router.

use minijinja::context;
use nodegen_core::GeneratorError;
use nodegen_core::ir::{AuthType, NodegenParams};
use serde::Serialize;

use super::api_call::api_call;
use super::branches::{operation_branch, operation_close, push_branch, resource_branch, resource_close};
use super::dividers::{operation_divider, resource_divider};
use super::imports::{description_imports, generic_function_imports, workflow_imports};
use super::{Lines, render};
use crate::helper::{credentials_name, node_class_name, title_case, variable_name};

#[derive(Serialize)]
struct ResourceOption {
    name: String,
    value: String,
    var: String,
}

pub fn emit_node(params: &NodegenParams, error_branches: bool) -> Result<String, GeneratorError> {
    let meta = &params.meta_params;
    let resources: Vec<ResourceOption> = params
        .resource_names()
        .map(|resource| ResourceOption {
            name: title_case(resource),
            value: resource.to_string(),
            var: variable_name(resource),
        })
        .collect();
    let default_resource = resources
        .first()
        .map(|r| r.value.clone())
        .ok_or_else(|| GeneratorError::MissingValue("resources".to_string()))?;

    let credentials = match meta.auth_type {
        AuthType::None => None,
        auth => Some(credentials_name(&meta.service_name, auth)),
    };
    let class_name = node_class_name(&meta.service_name);

    render(
        "node.ts.j2",
        include_str!("../../templates/node.ts.j2"),
        context! {
            workflow_imports => workflow_imports(error_branches),
            generic_imports => generic_function_imports(params),
            description_imports => description_imports(params),
            node_name => variable_name(&class_name),
            class_name => class_name,
            service_name => meta.service_name,
            node_color => meta.node_color,
            credentials => credentials,
            api_url => meta.api_url,
            resources => resources,
            default_resource => default_resource,
            router => router(params, error_branches)?,
        },
    )
}

/// The resource/operation `if` chains of `execute`, one api call per operation.
pub fn router(params: &NodegenParams, error_branches: bool) -> Result<String, GeneratorError> {
    let service = &params.meta_params.service_name;
    let mut lines = Lines::new(3);

    for (r_index, (resource, operations)) in params.main_params.iter().enumerate() {
        if operations.is_empty() {
            return Err(GeneratorError::MissingValue(format!(
                "operations of resource `{resource}`"
            )));
        }
        push_branch(&mut lines, r_index, resource_branch(r_index, resource));
        lines.block(&resource_divider(resource));

        for (o_index, operation) in operations.iter().enumerate() {
            push_branch(&mut lines, o_index, operation_branch(o_index, &operation.operation_id));
            lines.block(&operation_divider(
                resource,
                &operation.operation_id,
                operation.operation_url.as_deref(),
            ));
            api_call(&mut lines, service, resource, operation)?;
        }
        operation_close(&mut lines, error_branches);
    }

    if lines.is_empty() {
        return Err(GeneratorError::MissingValue("resources".to_string()));
    }
    resource_close(&mut lines, error_branches);
    Ok(lines.finish())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use nodegen_core::ir::{HttpMethod, MetaParams, Operation};

    use super::*;

    fn params(auth_type: AuthType) -> NodegenParams {
        let mut main_params = IndexMap::new();
        main_params.insert(
            "health".to_string(),
            vec![Operation::new("/health", HttpMethod::Get, "getHealth")],
        );
        main_params.insert(
            "widget".to_string(),
            vec![
                Operation::new("/widgets", HttpMethod::Post, "create"),
                Operation::new("/widgets", HttpMethod::Get, "getAll"),
            ],
        );
        NodegenParams {
            meta_params: MetaParams {
                service_name: "Widget Store".to_string(),
                auth_type,
                node_color: "#336699".to_string(),
                api_url: "https://widgets.test".to_string(),
            },
            main_params,
        }
    }

    #[test]
    fn test_router_chains() {
        let out = router(&params(AuthType::None), false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "\t\t\tif (resource === 'health') {");
        assert!(out.contains("\n\t\t\t} else if (resource === 'widget') {\n"));
        assert!(out.contains("\n\t\t\t\tif (operation === 'create') {\n"));
        assert!(out.contains("\n\t\t\t\t} else if (operation === 'getAll') {\n"));
        assert_eq!(lines.last(), Some(&"\t\t\t}"));
        assert!(!out.contains("NodeOperationError"));
    }

    #[test]
    fn test_router_error_branches() {
        let out = router(&params(AuthType::None), true).unwrap();
        assert_eq!(out.matches("Unknown operation").count(), 2);
        assert_eq!(out.matches("Unknown resource").count(), 1);
    }

    #[test]
    fn test_node_file() {
        let out = emit_node(&params(AuthType::OAuth2), true).unwrap();
        assert!(out.contains("export class WidgetStore implements INodeType {"));
        assert!(out.contains("\t\tname: 'widgetStore',"));
        assert!(out.contains(r#"subtitle: '={{$parameter["operation"] + ": " + $parameter["resource"]}}',"#));
        assert!(out.contains("\t\t\t\tname: 'widgetStoreOAuth2Api',"));
        assert!(out.contains("\t\t\tbaseURL: 'https://widgets.test',"));
        assert!(out.contains("\t\t\tcolor: '#336699',"));
        assert!(out.contains("\t\t\t...widgetOperations,\n\t\t\t...widgetFields,"));
        assert!(out.contains("import { NodeOperationError } from 'n8n-workflow';"));
    }

    #[test]
    fn test_node_quotes_meta_strings() {
        let mut p = params(AuthType::None);
        p.meta_params.service_name = r#"Bob's "Best" Widgets"#.to_string();
        p.meta_params.api_url = "https://bob.test/it's".to_string();
        let out = emit_node(&p, false).unwrap();
        assert!(out.contains(r#"displayName: 'Bob\'s "Best" Widgets',"#));
        assert!(out.contains(r#"description: 'Consume the Bob\'s "Best" Widgets API',"#));
        assert!(out.contains(r#"baseURL: 'https://bob.test/it\'s',"#));
    }

    #[test]
    fn test_node_without_credentials() {
        let out = emit_node(&params(AuthType::None), false).unwrap();
        assert!(!out.contains("credentials:"));
    }

    #[test]
    fn test_empty_resource_is_missing_value() {
        let mut p = params(AuthType::None);
        p.main_params.insert("empty".to_string(), Vec::new());
        assert!(matches!(router(&p, false), Err(GeneratorError::MissingValue(_))));

        p.main_params.clear();
        assert!(matches!(emit_node(&p, false), Err(GeneratorError::MissingValue(_))));
    }
}
