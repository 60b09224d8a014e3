use nodegen_core::config::EmitConfig;
use nodegen_core::ir::NodegenParams;
use nodegen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters;
use crate::emitters::imports::description_module;
use crate::helper::node_class_name;

/// File holding the JSON dump of the nodegen params.
pub const PARAMS_FILE_NAME: &str = "nodegen-params.json";

/// Options for the emitted plugin package.
#[derive(Debug, Clone, Default)]
pub struct PluginOptions {
    /// Throw on unknown resources and operations in the router.
    pub error_branches: bool,
    pub package_name: Option<String>,
    pub repository: Option<String>,
}

impl From<&EmitConfig> for PluginOptions {
    fn from(emit: &EmitConfig) -> Self {
        Self {
            error_branches: emit.error_branches,
            package_name: emit.package_name.clone(),
            repository: emit.repository.clone(),
        }
    }
}

/// Plugin fragment generator for a workflow-automation community node.
pub struct PluginGenerator;

impl CodeGenerator for PluginGenerator {
    type Config = PluginOptions;

    fn generate(
        &self,
        params: &NodegenParams,
        config: &PluginOptions,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let class_name = node_class_name(&params.meta_params.service_name);

        let mut files = vec![
            GeneratedFile {
                path: PARAMS_FILE_NAME.to_string(),
                content: serde_json::to_string_pretty(params)?,
            },
            GeneratedFile {
                path: format!("{class_name}.node.ts"),
                content: emitters::node::emit_node(params, config.error_branches)?,
            },
        ];

        for (resource, operations) in &params.main_params {
            log::debug!("emitting description of {resource} ({} operations)", operations.len());
            files.push(GeneratedFile {
                path: format!("descriptions/{}.ts", description_module(resource)),
                content: emitters::description::emit_resource_description(resource, operations)?,
            });
        }

        files.extend([
            GeneratedFile {
                path: "descriptions/index.ts".to_string(),
                content: emitters::description::emit_description_index(params),
            },
            GeneratedFile {
                path: "GenericFunctions.imports.ts".to_string(),
                content: emitters::imports::generic_function_imports(params),
            },
            GeneratedFile {
                path: "package.json".to_string(),
                content: emitters::package_json::emit_package_json(&params.meta_params, config)?,
            },
        ]);

        Ok(files)
    }
}
