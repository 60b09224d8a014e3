use std::fs;

use nodegen_core::ir::NodegenParams;
use nodegen_core::{CodeGenerator, GeneratedFile, custom, parse, transform};
use nodegen_plugin::{PluginGenerator, PluginOptions};

const WIDGET_STORE: &str = include_str!("fixtures/widget-store.yaml");
const ACME_CUSTOM: &str = include_str!("fixtures/acme-custom.yaml");

fn widget_store() -> NodegenParams {
    let spec = parse::from_yaml(WIDGET_STORE).unwrap();
    transform::normalize(&spec).unwrap()
}

fn generate(params: &NodegenParams, options: &PluginOptions) -> Vec<GeneratedFile> {
    PluginGenerator.generate(params, options).unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("missing {path}"))
        .content
}

#[test]
fn generates_expected_file_set() {
    let files = generate(&widget_store(), &PluginOptions::default());
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "nodegen-params.json",
            "WidgetStore.node.ts",
            "descriptions/HealthDescription.ts",
            "descriptions/PartDescription.ts",
            "descriptions/UserAccountDescription.ts",
            "descriptions/WidgetDescription.ts",
            "descriptions/index.ts",
            "GenericFunctions.imports.ts",
            "package.json",
        ]
    );
}

#[test]
fn params_dump_round_trips() {
    let params = widget_store();
    let files = generate(&params, &PluginOptions::default());
    let dumped: NodegenParams = serde_json::from_str(file(&files, "nodegen-params.json")).unwrap();
    assert_eq!(dumped, params);
}

#[test]
fn node_file_routes_every_operation() {
    let params = widget_store();
    let files = generate(&params, &PluginOptions::default());
    let node = file(&files, "WidgetStore.node.ts");

    assert_eq!(node.matches("responseData = await widgetStoreApiRequest.call(").count(), params.operation_count());
    assert!(node.contains("if (resource === 'health') {"));
    assert!(node.contains("} else if (resource === 'widget') {"));
    assert!(node.contains("name: 'widgetStoreOAuth2Api',"));
    assert!(node.contains("baseURL: 'https://eu.widgets.test/v1',"));
    assert!(node.contains("`/widgets/${id}/parts/${partId}`"));
    assert!(node.contains("const accountId = this.getNodeParameter('accountId', i) as string;"));
    assert!(node.contains("widgetStoreApiRequestAllItems.call(this, 'GET', `/widgets`, body, qs);"));
    assert!(!node.contains("legacy"));
    assert!(!node.contains("NodeOperationError"));
}

#[test]
fn error_branches_option() {
    let options = PluginOptions {
        error_branches: true,
        ..PluginOptions::default()
    };
    let files = generate(&widget_store(), &options);
    let node = file(&files, "WidgetStore.node.ts");
    assert!(node.contains("import { NodeOperationError } from 'n8n-workflow';"));
    assert!(node.contains("`Unknown resource: ${resource}`"));
}

#[test]
fn widget_description_fields() {
    let files = generate(&widget_store(), &PluginOptions::default());
    let widget = file(&files, "descriptions/WidgetDescription.ts");

    assert!(widget.contains("export const widgetOperations: INodeProperties[] = ["));
    assert!(widget.contains("value: 'getAll',"));
    assert!(widget.contains("description: 'The widget\\'s name',"));
    assert!(widget.contains("displayName: 'Update Fields',"));
    assert!(widget.contains("displayName: 'Additional Fields',"));
    assert!(widget.contains("name: 'returnAll',"));
    assert!(widget.contains("type: 'options',"));
    assert!(!widget.contains("undefined"));
}

#[test]
fn description_index_and_imports() {
    let files = generate(&widget_store(), &PluginOptions::default());
    let index = file(&files, "descriptions/index.ts");
    assert_eq!(index.lines().count(), 4);
    assert!(index.contains("export * from './UserAccountDescription';"));

    let imports = file(&files, "GenericFunctions.imports.ts");
    assert!(imports.contains("\twidgetStoreApiRequestAllItems,\n"));
}

#[test]
fn custom_schema_generation() {
    let params = custom::from_yaml(ACME_CUSTOM).unwrap();
    let files = generate(&params, &PluginOptions::default());

    let node = file(&files, "Acme.node.ts");
    assert!(node.contains("name: 'acmeApi',"));
    assert!(node.contains("color: '#ff6600',"));
    assert!(node.contains("qs['status'] = this.getNodeParameter('status', i);"));
    assert!(node.contains("if (['notify'].includes(key)) {"));
    assert!(node.contains("Object.assign(qs, additionalFields);"));
    assert!(node.contains("// https://acme.test/docs/create"));

    let accounts = file(&files, "descriptions/UserAccountDescription.ts");
    assert!(accounts.contains("target=\"_blank\""));
    assert!(accounts.contains("description: 'ID of the user account to update',"));
}

#[test]
fn writes_files_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let files = generate(&widget_store(), &PluginOptions::default());
    for f in &files {
        let path = dir.path().join(&f.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &f.content).unwrap();
    }

    assert!(dir.path().join("descriptions/WidgetDescription.ts").is_file());
    let package: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap()).unwrap();
    assert_eq!(package["name"], "n8n-nodes-widget-store");
}
