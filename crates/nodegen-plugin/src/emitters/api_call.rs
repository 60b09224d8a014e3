//! The request each operation branch of the router performs.

use nodegen_core::GeneratorError;
use nodegen_core::ir::{BodyGroupName, Operation, ParameterLocation};
use nodegen_core::transform::naming::path_placeholders;

use super::Lines;
use super::fields::collections;
use crate::helper::{
    api_request_all_items_name, api_request_name, to_template_literal, variable_name,
};

/// Push the statements of one operation: read its parameters, fill `qs` and
/// `body`, then call the service's request helper.
pub fn api_call(
    lines: &mut Lines,
    service_name: &str,
    resource: &str,
    operation: &Operation,
) -> Result<(), GeneratorError> {
    for placeholder in path_placeholders(&operation.endpoint) {
        let declared = operation
            .params_in(ParameterLocation::Path)
            .any(|p| p.name == placeholder);
        if !declared {
            return Err(GeneratorError::MissingValue(format!(
                "path parameter `{placeholder}` of {resource}.{}",
                operation.operation_id
            )));
        }
        lines.line(format!(
            "const {} = this.getNodeParameter('{placeholder}', i) as string;",
            variable_name(&placeholder)
        ));
    }

    lines.line("const qs: IDataObject = {};");
    lines.line("const body: IDataObject = {};");

    for param in operation.params_in(ParameterLocation::Query) {
        let is_object = param.schema.get("properties").is_some();
        if param.required || !is_object {
            lines.line(format!(
                "qs['{0}'] = this.getNodeParameter('{0}', i);",
                param.name
            ));
        } else {
            let var = variable_name(&param.name);
            lines.line(format!(
                "const {var} = this.getNodeParameter('{}', i) as IDataObject;",
                param.name
            ));
            lines.line(format!("Object.assign(qs, {var});"));
        }
    }

    if let Some(standard) = operation.body_group(BodyGroupName::Standard) {
        let mut seen: Vec<&str> = Vec::new();
        for name in standard.property_names() {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            lines.line(format!("body['{name}'] = this.getNodeParameter('{name}', i);"));
        }
    }

    for name in collections(operation).keys() {
        push_collection(lines, operation, *name);
    }

    let endpoint = to_template_literal(&operation.endpoint);
    let method = operation.request_method.as_str();
    let request = api_request_name(service_name);

    if operation.operation_id == "getAll" {
        lines.line("const returnAll = this.getNodeParameter('returnAll', i) as boolean;");
        lines.open("if (returnAll) {");
        lines.line(format!(
            "responseData = await {}.call(this, '{method}', `{endpoint}`, body, qs);",
            api_request_all_items_name(service_name)
        ));
        lines.reopen("} else {");
        lines.line("qs.limit = this.getNodeParameter('limit', i) as number;");
        lines.line(format!(
            "responseData = await {request}.call(this, '{method}', `{endpoint}`, body, qs);"
        ));
        lines.close("}");
    } else {
        lines.line(format!(
            "responseData = await {request}.call(this, '{method}', `{endpoint}`, body, qs);"
        ));
    }
    Ok(())
}

/// Spread a UI collection into `body`, `qs`, or both when a custom schema
/// splits it across the query string and the body.
fn push_collection(lines: &mut Lines, operation: &Operation, name: BodyGroupName) {
    let var = variable_name(name.as_str());
    let in_body = operation.body_group(name).is_some();
    let query_keys: Vec<&str> = [&operation.additional_fields, &operation.update_fields]
        .into_iter()
        .flatten()
        .filter(|fields| fields.name == name)
        .flat_map(|fields| fields.options.iter().map(|o| o.name.as_str()))
        .collect();

    lines.line(format!(
        "const {var} = this.getNodeParameter('{var}', i) as IDataObject;"
    ));
    match (in_body, query_keys.is_empty()) {
        (true, true) => lines.line(format!("Object.assign(body, {var});")),
        (false, _) => lines.line(format!("Object.assign(qs, {var});")),
        (true, false) => {
            let keys: Vec<String> = query_keys.iter().map(|k| format!("'{k}'")).collect();
            lines.open(format!("for (const key of Object.keys({var})) {{"));
            lines.open(format!("if ([{}].includes(key)) {{", keys.join(", ")));
            lines.line(format!("qs[key] = {var}[key];"));
            lines.reopen("} else {");
            lines.line(format!("body[key] = {var}[key];"));
            lines.close("}");
            lines.close("}");
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use nodegen_core::ir::{
        BodyContent, FieldCollection, HttpMethod, OperationParameter, RequestBodyGroup,
    };
    use serde_json::json;

    use super::*;

    fn path_param(name: &str) -> OperationParameter {
        OperationParameter {
            location: ParameterLocation::Path,
            name: name.to_string(),
            required: true,
            schema: json!({"type": "string"}),
            description: None,
        }
    }

    fn emit(operation: &Operation) -> String {
        let mut lines = Lines::new(0);
        api_call(&mut lines, "Widget Store", "widget", operation).unwrap();
        lines.finish()
    }

    #[test]
    fn test_get_by_id() {
        let mut op = Operation::new("/users/{user_id}", HttpMethod::Get, "get");
        op.parameters.push(path_param("user_id"));
        insta::assert_snapshot!(emit(&op), @r"
        const userId = this.getNodeParameter('user_id', i) as string;
        const qs: IDataObject = {};
        const body: IDataObject = {};
        responseData = await widgetStoreApiRequest.call(this, 'GET', `/users/${userId}`, body, qs);
        ");
    }

    #[test]
    fn test_create_with_body_and_query() {
        let mut op = Operation::new("/widgets", HttpMethod::Post, "create");
        op.parameters.push(OperationParameter {
            location: ParameterLocation::Query,
            name: "dry_run".to_string(),
            required: true,
            schema: json!({"type": "boolean"}),
            description: None,
        });
        op.parameters.push(OperationParameter {
            location: ParameterLocation::Query,
            name: "query".to_string(),
            required: false,
            schema: json!({"type": "object", "properties": {"verbose": {"type": "boolean"}}}),
            description: None,
        });
        let schema = |props: serde_json::Value| json!({"type": "object", "properties": props});
        for (name, props) in [
            (BodyGroupName::Standard, json!({"name": {"type": "string"}})),
            (BodyGroupName::AdditionalFields, json!({"color": {"type": "string"}})),
        ] {
            let mut content = IndexMap::new();
            content.insert("application/json".to_string(), BodyContent { schema: schema(props) });
            op.request_body.push(RequestBodyGroup {
                name,
                required: name == BodyGroupName::Standard,
                description: None,
                content,
            });
        }

        insta::assert_snapshot!(emit(&op), @r"
        const qs: IDataObject = {};
        const body: IDataObject = {};
        qs['dry_run'] = this.getNodeParameter('dry_run', i);
        const query = this.getNodeParameter('query', i) as IDataObject;
        Object.assign(qs, query);
        body['name'] = this.getNodeParameter('name', i);
        const additionalFields = this.getNodeParameter('additionalFields', i) as IDataObject;
        Object.assign(body, additionalFields);
        responseData = await widgetStoreApiRequest.call(this, 'POST', `/widgets`, body, qs);
        ");
    }

    #[test]
    fn test_get_all_paginates() {
        let op = Operation::new("/widgets", HttpMethod::Get, "getAll");
        let out = emit(&op);
        assert!(out.contains("const returnAll = this.getNodeParameter('returnAll', i) as boolean;"));
        assert!(out.contains("await widgetStoreApiRequestAllItems.call(this, 'GET', `/widgets`, body, qs);"));
        assert!(out.contains("\tqs.limit = this.getNodeParameter('limit', i) as number;"));
    }

    #[test]
    fn test_collection_split_between_query_and_body() {
        let mut op = Operation::new("/widgets/{id}", HttpMethod::Patch, "update");
        op.parameters.push(path_param("id"));
        let mut content = IndexMap::new();
        content.insert(
            "application/x-www-form-urlencoded".to_string(),
            BodyContent {
                schema: json!({"type": "object", "properties": {"nickname": {"type": "string"}}}),
            },
        );
        op.request_body.push(RequestBodyGroup {
            name: BodyGroupName::UpdateFields,
            required: false,
            description: None,
            content,
        });
        op.update_fields = Some(FieldCollection::new(
            BodyGroupName::UpdateFields,
            vec![OperationParameter {
                location: ParameterLocation::Query,
                name: "notify".to_string(),
                required: false,
                schema: json!({"type": "boolean"}),
                description: None,
            }],
        ));

        let out = emit(&op);
        assert!(out.contains("for (const key of Object.keys(updateFields)) {"));
        assert!(out.contains("\tif (['notify'].includes(key)) {"));
        assert!(out.contains("\t\tbody[key] = updateFields[key];"));
    }

    #[test]
    fn test_missing_path_parameter_is_an_error() {
        let op = Operation::new("/widgets/{id}", HttpMethod::Delete, "delete");
        let mut lines = Lines::new(0);
        let err = api_call(&mut lines, "Widget Store", "widget", &op).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingValue(msg) if msg.contains("`id`")));
    }
}
