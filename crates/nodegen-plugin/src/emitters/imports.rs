use heck::ToPascalCase;
use nodegen_core::ir::NodegenParams;

use crate::helper::{api_request_all_items_name, api_request_name, variable_name};

/// `import { ... } from './GenericFunctions';`, with the pagination helper
/// only when some resource has a `getAll` operation.
pub fn generic_function_imports(params: &NodegenParams) -> String {
    let service = &params.meta_params.service_name;
    let mut names = vec![api_request_name(service)];
    let paginates = params
        .main_params
        .values()
        .flatten()
        .any(|op| op.operation_id == "getAll");
    if paginates {
        names.push(api_request_all_items_name(service));
    }
    import_block(&names, "./GenericFunctions", false)
}

/// Types and errors of `n8n-workflow` used by the node file.
pub fn workflow_imports(error_branches: bool) -> String {
    let types = [
        "IDataObject",
        "IExecuteFunctions",
        "INodeExecutionData",
        "INodeType",
        "INodeTypeDescription",
    ]
    .map(String::from);
    let mut out = import_block(&types, "n8n-workflow", true);
    if error_branches {
        out.push('\n');
        out.push_str("import { NodeOperationError } from 'n8n-workflow';");
    }
    out
}

/// `<resource>Operations` and `<resource>Fields` of every resource.
pub fn description_imports(params: &NodegenParams) -> String {
    let names: Vec<String> = params
        .resource_names()
        .flat_map(|resource| {
            let var = variable_name(resource);
            [format!("{var}Fields"), format!("{var}Operations")]
        })
        .collect();
    import_block(&names, "./descriptions", false)
}

/// File name (without extension) of a resource's description module.
pub fn description_module(resource: &str) -> String {
    format!("{}Description", resource.to_pascal_case())
}

fn import_block(names: &[String], from: &str, type_only: bool) -> String {
    let keyword = if type_only { "import type" } else { "import" };
    let mut out = format!("{keyword} {{\n");
    for name in names {
        out.push('\t');
        out.push_str(name);
        out.push_str(",\n");
    }
    out.push_str(&format!("}} from '{from}';"));
    out
}
