use heck::ToPascalCase;
use minijinja::context;
use nodegen_core::GeneratorError;
use nodegen_core::ir::{AuthType, MetaParams};

use super::render;
use crate::generator::PluginOptions;
use crate::helper::{credentials_name, node_class_name};

/// Emit the `package.json` of the community-node package.
pub fn emit_package_json(
    meta: &MetaParams,
    options: &PluginOptions,
) -> Result<String, GeneratorError> {
    let name = options
        .package_name
        .clone()
        .unwrap_or_else(|| format!("n8n-nodes-{}", slugify(&meta.service_name)));

    let credentials = match meta.auth_type {
        AuthType::None => None,
        auth => Some(credentials_name(&meta.service_name, auth).to_pascal_case()),
    };

    render(
        "package.json.j2",
        include_str!("../../templates/package.json.j2"),
        context! {
            name => name,
            service_name => meta.service_name,
            repository => options.repository,
            credentials => credentials,
            class_name => node_class_name(&meta.service_name),
        },
    )
}

/// Convert a title to a kebab-case package name.
fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    // Collapse consecutive dashes and trim
    let mut result = String::new();
    let mut prev_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !prev_dash && !result.is_empty() {
                result.push('-');
            }
            prev_dash = true;
        } else {
            result.push(c);
            prev_dash = false;
        }
    }

    result.trim_end_matches('-').to_string()
}
